// mod.rs - Core logic module

pub mod cooccurrence;
pub mod hardy_weinberg;
pub mod likelihood;
pub mod partition;

// Re-export main types for convenience
pub use cooccurrence::{aggregate, phase_consistent, CohortAggregate};
pub use hardy_weinberg::{homozygous_vus, HardyWeinbergRecord, CHI_SQUARE_CRITICAL};
pub use likelihood::{cohort_prior, likelihood_ratio, score_cohort, LikelihoodRecord};
pub use partition::{classify_cohort, divide, partition_ranges};
