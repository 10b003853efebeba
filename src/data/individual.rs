// individual.rs - Per-individual classified calls and the cohort cache

use crate::data::variant::{Classification, GenotypeCall, Variant};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// One cohort member's classified genotype calls. Built by a partition
/// worker and never mutated after the fan-in merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Individual {
    pub id: String,
    pub benign: Vec<GenotypeCall>,
    pub pathogenic: Vec<GenotypeCall>,
    pub vus: Vec<GenotypeCall>,
}

impl Individual {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn push(&mut self, classification: Classification, variant: Variant, zygosity: u8) {
        let call = GenotypeCall::new(variant, zygosity);
        match classification {
            Classification::Benign => self.benign.push(call),
            Classification::Pathogenic => self.pathogenic.push(call),
            Classification::Vus => self.vus.push(call),
        }
    }

    pub fn calls(&self, classification: Classification) -> &[GenotypeCall] {
        match classification {
            Classification::Benign => &self.benign,
            Classification::Pathogenic => &self.pathogenic,
            Classification::Vus => &self.vus,
        }
    }

    pub fn total_calls(&self) -> usize {
        self.benign.len() + self.pathogenic.len() + self.vus.len()
    }
}

/// Merged cohort mapping: individual id -> classified record
pub type CohortMap = HashMap<String, Individual>;

/// Cohort cache metadata, checked before a cached scan is reused
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CohortCacheMetadata {
    pub version: String,
    pub created: String,
    pub build: String,
    pub release: String,
    pub chromosome: u32,
    pub gene: String,
    pub cohort_size: usize,
    pub user_note: Option<String>,
}

/// Persisted form of the merged cohort map: lz4-compressed JSON
#[derive(Debug, Serialize, Deserialize)]
pub struct CohortCache {
    pub metadata: CohortCacheMetadata,
    pub cohort: CohortMap,
}

impl CohortCache {
    pub fn new(
        cohort: CohortMap,
        build: &str,
        release: &str,
        chromosome: u32,
        gene: &str,
        user_note: Option<String>,
    ) -> Self {
        let cohort_size = cohort.len();
        Self {
            metadata: CohortCacheMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                created: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                build: build.to_string(),
                release: release.to_string(),
                chromosome,
                gene: gene.to_string(),
                cohort_size,
                user_note,
            },
            cohort,
        }
    }

    /// Save to an lz4-compressed JSON file
    pub fn save(&self, cache_path: &str) -> Result<(), String> {
        println!("💾 Saving cohort cache to {}...", cache_path);
        let start = Instant::now();

        let serialized =
            serde_json::to_vec(self).map_err(|e| format!("Failed to serialize cohort cache: {}", e))?;
        let compressed = lz4_flex::compress_prepend_size(&serialized);
        std::fs::write(cache_path, compressed)
            .map_err(|e| format!("Failed to write cohort cache '{}': {}", cache_path, e))?;

        println!(
            "✅ Cohort cache saved: {} individuals in {:.2}s",
            self.metadata.cohort_size,
            start.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Load from an lz4-compressed JSON file
    pub fn load(cache_path: &str) -> Result<Self, String> {
        let compressed = std::fs::read(cache_path)
            .map_err(|e| format!("Failed to read cohort cache '{}': {}", cache_path, e))?;
        let decompressed = lz4_flex::decompress_size_prepended(&compressed)
            .map_err(|e| format!("Failed to decompress cohort cache: {}", e))?;
        serde_json::from_slice(&decompressed)
            .map_err(|e| format!("Failed to deserialize cohort cache: {}", e))
    }

    /// A cached scan is only reusable when it was produced by the same
    /// build, release, chromosome and gene
    pub fn is_compatible(&self, build: &str, release: &str, chromosome: u32, gene: &str) -> bool {
        self.metadata.build == build
            && self.metadata.release == release
            && self.metadata.chromosome == chromosome
            && self.metadata.gene == gene
    }
}
