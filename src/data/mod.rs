// mod.rs - Data model and table loaders

pub mod individual;
pub mod matrix;
pub mod popfreq;
pub mod reference;
pub mod variant;

// Re-export main types for convenience
pub use individual::{CohortCache, CohortMap, Individual};
pub use matrix::{GenotypeMatrix, Locus};
pub use popfreq::{FrequencyTable, PopulationFrequency};
pub use reference::{ReferenceSets, SignificanceLabels};
pub use variant::{Classification, GenotypeCall, Variant};
