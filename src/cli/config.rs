// config.rs - Configuration file support

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    // Input/Output
    pub reference: Option<String>,
    pub genotypes: Option<String>,
    pub annotation: Option<String>,
    pub frequencies: Option<String>,
    pub output: Option<String>,

    // Analysis target
    pub build: Option<String>,
    pub release: Option<String>,
    pub chromosome: Option<u32>,
    pub gene: Option<String>,
    pub phased: Option<bool>,

    // Priors and cutoffs
    pub p2: Option<f64>,
    pub rarity_cutoff: Option<f64>,
    pub yates: Option<bool>,
    /// Literature-fixed per-gene priors for p2; the gene of interest is
    /// looked up here unless --p2 overrides it
    #[serde(default)]
    pub p2_priors: HashMap<String, f64>,

    // Reference table columns and significance label sets
    pub significance_column: Option<String>,
    pub coordinate_column: Option<String>,
    #[serde(default)]
    pub pathogenic_labels: Vec<String>,
    #[serde(default)]
    pub benign_labels: Vec<String>,
    #[serde(default)]
    pub uncertain_labels: Vec<String>,

    // Performance
    pub workers: Option<usize>,
    pub cache_file: Option<String>,
    pub cache_note: Option<String>,

    // Flags
    pub force_recompute: Option<bool>,
    pub dry_run: Option<bool>,
    pub pair_log: Option<String>,
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# cooccur.toml - Configuration file for cooccur
# Command line arguments will override these settings

# =============================================================================
# INPUT/OUTPUT
# =============================================================================

# Reference variant-significance table (.tsv)
reference = "/path/to/reference.tsv"

# Cohort genotype matrix (.tsv)
genotypes = "/path/to/genotypes.tsv"

# Gene annotation table (.tsv)
annotation = "/path/to/annotation.tsv"

# Population allele-frequency reference (.tsv, optional)
# frequencies = "/path/to/frequencies.tsv"

# Output report file (.json)
output = "report.json"

# =============================================================================
# ANALYSIS TARGET
# =============================================================================

# Genome build: grch37, grch38
build = "grch38"

# Genome annotation release
release = "110"

# Target chromosome and gene
chromosome = 13
gene = "BRCA2"

# Treat genotypes as phased for the co-occurrence test
phased = false

# =============================================================================
# PRIORS AND CUTOFFS
# =============================================================================

# Rarity cutoff on cohort and population frequencies
rarity_cutoff = 0.01

# Apply the Yates continuity correction to the Hardy-Weinberg test
yates = false

# Literature-fixed per-gene priors (probability a VUS is pathogenic AND the
# carrier has a pathogenic variant in trans); --p2 overrides the lookup
[p2_priors]
BRCA1 = 0.0005
BRCA2 = 0.001

# =============================================================================
# REFERENCE TABLE
# =============================================================================

# significance_column = "clinical_significance"
# coordinate_column = "coordinates_grch38"

# Significance labels per category (defaults shown)
# pathogenic_labels = ["Pathogenic", "Likely pathogenic", "Pathogenic/Likely pathogenic"]
# benign_labels = ["Benign", "Likely benign", "Benign/Likely benign"]
# uncertain_labels = ["Uncertain significance", "Conflicting interpretations", ""]

# =============================================================================
# PERFORMANCE
# =============================================================================

# Number of partition workers (omit for auto-detection)
# workers = 8

# Cohort cache file for fast reuse (.lz4 extension)
# cache_file = "cohort.lz4"

# User note to save with the cohort cache
# cache_note = "My analysis run"

# =============================================================================
# FLAGS
# =============================================================================

# Force recomputation ignoring cache compatibility
force_recompute = false

# Validate inputs without computation (dry run)
dry_run = false

# Write every co-occurring (VUS, pathogenic, individual) triple to a CSV log
# pair_log = "pairs.csv"
"#
        .to_string()
    }
}
