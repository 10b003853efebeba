// lib.rs - cooccur library root

//! # cooccur - Trans co-occurrence likelihood engine for VUS classification
//!
//! This library estimates, from a population cohort's genotype data, how
//! likely each variant of uncertain significance (VUS) in a disease gene is
//! to be pathogenic. It counts how often each VUS co-occurs in trans with a
//! known pathogenic variant, scores the counts with a Bayesian-style
//! likelihood ratio, and runs Hardy-Weinberg zygosity checks per variant.
//!
//! ## Features
//!
//! - **Parallel cohort scan**: balanced contiguous partitions, one worker
//!   each, merged by disjoint union
//! - **Phase-aware co-occurrence**: unphased (same gene) and phased
//!   (complementary copies / homozygous alternate) consistency tests
//! - **Likelihood scoring**: cohort-derived benign prior against a
//!   literature-fixed per-gene pathogenic prior
//! - **Zygosity statistics**: per-variant Hardy-Weinberg chi-square with
//!   optional Yates correction, joined with population allele frequencies
//! - **Cohort cache**: lz4-compressed classified-cohort snapshots for reuse
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use cooccur::prelude::*;
//! use std::path::Path;
//!
//! let labels = SignificanceLabels::default();
//! let reference = ReferenceSets::from_table(
//!     Path::new("reference.tsv"),
//!     "clinical_significance",
//!     "coordinates_grch38",
//!     &labels,
//! )?;
//! let matrix = GenotypeMatrix::from_file(Path::new("genotypes.tsv"))?;
//! let annotation = AnnotationTable::from_file(Path::new("annotation.tsv"), "110")?;
//!
//! let cohort = classify_cohort(&matrix, &reference, &annotation, 13, "BRCA2", 4)?;
//! let counts = aggregate(&cohort, &annotation, true);
//! let scored = score_cohort(&counts, &cohort, None, 0.001, 0.01);
//! # Ok::<(), String>(())
//! ```

// Re-export all main modules
pub mod annotation;
pub mod cli;
pub mod core;
pub mod data;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::annotation::{AnnotationConfig, AnnotationTable, GeneResolver, MemoResolver};
    pub use crate::cli::{validate_args, Args, Config, GenomeBuild, ValidationResult};
    pub use crate::core::{aggregate, classify_cohort, divide, score_cohort};
    pub use crate::core::{homozygous_vus, likelihood_ratio, phase_consistent};
    pub use crate::core::{CohortAggregate, HardyWeinbergRecord, LikelihoodRecord};
    pub use crate::data::{Classification, GenotypeCall, Variant};
    pub use crate::data::{CohortCache, CohortMap, Individual};
    pub use crate::data::{FrequencyTable, GenotypeMatrix, PopulationFrequency};
    pub use crate::data::{ReferenceSets, SignificanceLabels};
    pub use crate::output::{write_pair_log, write_report};
}

// Re-export main types at the root level for convenience
pub use crate::annotation::{AnnotationTable, GeneResolver};
pub use crate::cli::{Args, Config, ValidationResult};
pub use crate::core::{CohortAggregate, LikelihoodRecord};
pub use crate::data::{CohortMap, GenotypeMatrix, ReferenceSets, Variant};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!(
        "cooccur v{} - Trans co-occurrence likelihood engine",
        VERSION
    )
}
