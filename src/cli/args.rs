// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// cooccur - Trans co-occurrence likelihood engine for VUS classification
pub struct Args {
    /// path to the reference variant-significance table (.tsv)
    #[argh(option)]
    pub reference: Option<String>,

    /// path to the cohort genotype matrix (.tsv)
    #[argh(option)]
    pub genotypes: Option<String>,

    /// path to the gene annotation table (.tsv)
    #[argh(option)]
    pub annotation: Option<String>,

    /// path to the population allele-frequency reference (.tsv, optional)
    #[argh(option)]
    pub frequencies: Option<String>,

    /// output report file (.json)
    #[argh(option)]
    pub output: Option<String>,

    /// genome build: grch37, grch38 (default: grch38)
    #[argh(option)]
    pub build: Option<String>,

    /// genome annotation release (default: 110)
    #[argh(option)]
    pub release: Option<String>,

    /// target chromosome
    #[argh(option)]
    pub chromosome: Option<u32>,

    /// gene of interest
    #[argh(option)]
    pub gene: Option<String>,

    /// treat genotypes as phased for the co-occurrence test
    #[argh(switch)]
    pub phased: bool,

    /// number of partition workers (default: auto-detect)
    #[argh(option)]
    pub workers: Option<usize>,

    /// rarity cutoff on cohort and population frequencies (default: 0.01)
    #[argh(option)]
    pub rarity_cutoff: Option<f64>,

    /// override the per-gene prior p2 (probability of a pathogenic VUS
    /// co-occurring in trans)
    #[argh(option)]
    pub p2: Option<f64>,

    /// clinical-significance column name (default: clinical_significance)
    #[argh(option)]
    pub significance_column: Option<String>,

    /// coordinate column name (default: derived from --build, e.g.
    /// coordinates_grch38)
    #[argh(option)]
    pub coordinate_column: Option<String>,

    /// apply the Yates continuity correction to the Hardy-Weinberg test
    #[argh(switch)]
    pub yates: bool,

    /// cohort cache file path for fast reuse (.lz4 extension)
    #[argh(option)]
    pub cache_file: Option<String>,

    /// user note to save with the cohort cache for future reference
    #[argh(option)]
    pub cache_note: Option<String>,

    /// force recomputation ignoring cache compatibility (start fresh)
    #[argh(switch)]
    pub force_recompute: bool,

    /// write every co-occurring (VUS, pathogenic, individual) triple to a
    /// CSV log
    #[argh(option)]
    pub pair_log: Option<String>,

    /// validate inputs without computation (dry run)
    #[argh(switch)]
    pub dry_run: bool,

    /// path to TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// generate sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
