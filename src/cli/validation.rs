// validation.rs - Input validation utilities

use crate::cli::args::Args;
use crate::cli::config::Config;
use crate::data::reference::SignificanceLabels;
use std::str::FromStr;

/// Genome builds the reference table carries coordinate columns for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenomeBuild {
    Grch37,
    Grch38,
}

impl GenomeBuild {
    /// Default coordinate column name in the reference and frequency tables
    pub fn coordinate_column(&self) -> &'static str {
        match self {
            GenomeBuild::Grch37 => "coordinates_grch37",
            GenomeBuild::Grch38 => "coordinates_grch38",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GenomeBuild::Grch37 => "grch37",
            GenomeBuild::Grch38 => "grch38",
        }
    }
}

impl FromStr for GenomeBuild {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "grch37" | "hg19" => Ok(GenomeBuild::Grch37),
            "grch38" | "hg38" => Ok(GenomeBuild::Grch38),
            other => Err(format!(
                "Invalid genome build '{}'. Use: grch37, grch38",
                other
            )),
        }
    }
}

/// Validated, typed analysis parameters derived from args + config, with
/// built-in defaults applied after the config merge
pub struct ValidationResult {
    pub build: GenomeBuild,
    pub release: String,
    pub chromosome: u32,
    pub gene: String,
    pub coordinate_column: String,
    pub significance_column: String,
    pub labels: SignificanceLabels,
    pub p2: f64,
    pub rarity_cutoff: f64,
    pub workers: usize,
}

/// Validate all command line arguments before any data is read.
/// Configuration errors are the one class of failure that must surface
/// immediately as a hard error.
pub fn validate_args(args: &Args, config: &Config) -> Result<ValidationResult, String> {
    let build = match &args.build {
        Some(build) => GenomeBuild::from_str(build)?,
        None => GenomeBuild::Grch38,
    };
    let release = args.release.clone().unwrap_or_else(|| "110".to_string());

    let chromosome = args
        .chromosome
        .ok_or("--chromosome is required")?;
    let gene = args
        .gene
        .clone()
        .ok_or("--gene is required")?;
    if gene.trim().is_empty() {
        return Err("--gene must not be empty".to_string());
    }

    let rarity_cutoff = args.rarity_cutoff.unwrap_or(0.01);
    if rarity_cutoff <= 0.0 || rarity_cutoff > 1.0 {
        return Err(format!(
            "--rarity-cutoff must be in (0, 1], got {}",
            rarity_cutoff
        ));
    }

    if let Some(workers) = args.workers {
        if workers == 0 {
            return Err("--workers must be at least 1".to_string());
        }
    }
    let workers = args.workers.unwrap_or_else(rayon::current_num_threads);

    // p2: explicit override wins, then the per-gene prior table
    let p2 = match args.p2 {
        Some(p2) => p2,
        None => *config.p2_priors.get(&gene).ok_or_else(|| {
            format!(
                "No p2 prior configured for gene '{}'; add it to [p2_priors] or pass --p2",
                gene
            )
        })?,
    };
    if p2 <= 0.0 || p2 >= 1.0 {
        return Err(format!("p2 prior must be in (0, 1), got {}", p2));
    }

    let coordinate_column = args
        .coordinate_column
        .clone()
        .unwrap_or_else(|| build.coordinate_column().to_string());
    let significance_column = args
        .significance_column
        .clone()
        .unwrap_or_else(|| "clinical_significance".to_string());

    let labels = if config.pathogenic_labels.is_empty()
        && config.benign_labels.is_empty()
        && config.uncertain_labels.is_empty()
    {
        SignificanceLabels::default()
    } else {
        SignificanceLabels::from_lists(
            &config.pathogenic_labels,
            &config.benign_labels,
            &config.uncertain_labels,
        )
    };

    // Input files must exist up front; a missing path should not surface
    // halfway through the pipeline
    for (flag, path) in [
        ("--reference", &args.reference),
        ("--genotypes", &args.genotypes),
        ("--annotation", &args.annotation),
        ("--frequencies", &args.frequencies),
    ] {
        if let Some(path) = path {
            if !std::path::Path::new(path).exists() {
                return Err(format!("{} file '{}' does not exist", flag, path));
            }
        }
    }

    Ok(ValidationResult {
        build,
        release,
        chromosome,
        gene,
        coordinate_column,
        significance_column,
        labels,
        p2,
        rarity_cutoff,
        workers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            reference: None,
            genotypes: None,
            annotation: None,
            frequencies: None,
            output: Some("out.json".to_string()),
            build: None,
            release: None,
            chromosome: Some(13),
            gene: Some("BRCA2".to_string()),
            phased: false,
            workers: None,
            rarity_cutoff: None,
            p2: Some(0.001),
            significance_column: None,
            coordinate_column: None,
            yates: false,
            cache_file: None,
            cache_note: None,
            force_recompute: false,
            pair_log: None,
            dry_run: false,
            config: None,
            generate_config: false,
        }
    }

    #[test]
    fn test_valid_args() {
        let result = validate_args(&base_args(), &Config::default()).unwrap();
        assert_eq!(result.build, GenomeBuild::Grch38);
        assert_eq!(result.release, "110");
        assert_eq!(result.coordinate_column, "coordinates_grch38");
        assert_eq!(result.significance_column, "clinical_significance");
        assert_eq!(result.chromosome, 13);
        assert_eq!(result.p2, 0.001);
        assert_eq!(result.rarity_cutoff, 0.01);
        assert!(result.workers >= 1);
    }

    #[test]
    fn test_missing_required_args_fail_fast() {
        let mut args = base_args();
        args.chromosome = None;
        assert!(validate_args(&args, &Config::default()).is_err());

        let mut args = base_args();
        args.gene = None;
        assert!(validate_args(&args, &Config::default()).is_err());
    }

    #[test]
    fn test_invalid_build_rejected() {
        let mut args = base_args();
        args.build = Some("grch99".to_string());
        assert!(validate_args(&args, &Config::default()).is_err());
    }

    #[test]
    fn test_p2_from_prior_table() {
        let mut args = base_args();
        args.p2 = None;
        let mut config = Config::default();
        config.p2_priors.insert("BRCA2".to_string(), 0.002);
        let result = validate_args(&args, &config).unwrap();
        assert_eq!(result.p2, 0.002);

        // No table entry and no override is a configuration error
        let result = validate_args(&args, &Config::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_bounds_checks() {
        let mut args = base_args();
        args.rarity_cutoff = Some(0.0);
        assert!(validate_args(&args, &Config::default()).is_err());

        let mut args = base_args();
        args.p2 = Some(1.0);
        assert!(validate_args(&args, &Config::default()).is_err());

        let mut args = base_args();
        args.workers = Some(0);
        assert!(validate_args(&args, &Config::default()).is_err());
    }

    #[test]
    fn test_build_selects_coordinate_column() {
        let mut args = base_args();
        args.build = Some("grch37".to_string());
        let result = validate_args(&args, &Config::default()).unwrap();
        assert_eq!(result.coordinate_column, "coordinates_grch37");

        // Explicit override wins
        let mut args = base_args();
        args.coordinate_column = Some("custom_coords".to_string());
        let result = validate_args(&args, &Config::default()).unwrap();
        assert_eq!(result.coordinate_column, "custom_coords");
    }
}
