// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file.
    /// CLI arguments take precedence over config file values.
    pub fn merge_with_config(mut self, config: &Config) -> Self {
        // Input/Output
        if self.reference.is_none() {
            self.reference = config.reference.clone();
        }
        if self.genotypes.is_none() {
            self.genotypes = config.genotypes.clone();
        }
        if self.annotation.is_none() {
            self.annotation = config.annotation.clone();
        }
        if self.frequencies.is_none() {
            self.frequencies = config.frequencies.clone();
        }
        if self.output.is_none() {
            self.output = config.output.clone();
        }

        // Analysis target
        if self.build.is_none() {
            self.build = config.build.clone();
        }
        if self.release.is_none() {
            self.release = config.release.clone();
        }
        if self.chromosome.is_none() {
            self.chromosome = config.chromosome;
        }
        if self.gene.is_none() {
            self.gene = config.gene.clone();
        }

        // Priors and cutoffs
        if self.p2.is_none() {
            self.p2 = config.p2;
        }
        if self.rarity_cutoff.is_none() {
            self.rarity_cutoff = config.rarity_cutoff;
        }

        // Reference table columns
        if self.significance_column.is_none() {
            self.significance_column = config.significance_column.clone();
        }
        if self.coordinate_column.is_none() {
            self.coordinate_column = config.coordinate_column.clone();
        }

        // Performance
        if self.workers.is_none() {
            self.workers = config.workers;
        }
        if self.cache_file.is_none() {
            self.cache_file = config.cache_file.clone();
        }
        if self.cache_note.is_none() {
            self.cache_note = config.cache_note.clone();
        }
        if self.pair_log.is_none() {
            self.pair_log = config.pair_log.clone();
        }

        // Flags (CLI flags take precedence, config only sets if not explicitly set)
        if !self.phased && config.phased.unwrap_or(false) {
            self.phased = true;
        }
        if !self.yates && config.yates.unwrap_or(false) {
            self.yates = true;
        }
        if !self.force_recompute && config.force_recompute.unwrap_or(false) {
            self.force_recompute = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }

    /// Load configuration and merge with CLI args; the config is also
    /// returned because it carries the p2 prior table and label sets
    pub fn with_config_file(self, config_path: &str) -> Result<(Self, Config), String> {
        let config = Config::from_file(config_path)?;
        Ok((self.merge_with_config(&config), config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> Args {
        Args {
            reference: None,
            genotypes: None,
            annotation: None,
            frequencies: None,
            output: None,
            build: None,
            release: None,
            chromosome: None,
            gene: None,
            phased: false,
            workers: None,
            rarity_cutoff: None,
            p2: None,
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
    fn test_config_fills_unset_values() {
        let mut config = Config::default();
        config.build = Some("grch37".to_string());
        config.release = Some("104".to_string());
        config.rarity_cutoff = Some(0.05);
        config.gene = Some("BRCA1".to_string());

        let merged = empty_args().merge_with_config(&config);
        assert_eq!(merged.build.as_deref(), Some("grch37"));
        assert_eq!(merged.release.as_deref(), Some("104"));
        assert_eq!(merged.rarity_cutoff, Some(0.05));
        assert_eq!(merged.gene.as_deref(), Some("BRCA1"));
    }

    #[test]
    fn test_explicit_cli_values_beat_config() {
        // A CLI value equal to the built-in default is still explicit and
        // must survive the merge
        let mut args = empty_args();
        args.build = Some("grch38".to_string());
        args.rarity_cutoff = Some(0.01);
        args.phased = true;

        let mut config = Config::default();
        config.build = Some("grch37".to_string());
        config.rarity_cutoff = Some(0.05);
        config.phased = Some(false);

        let merged = args.merge_with_config(&config);
        assert_eq!(merged.build.as_deref(), Some("grch38"));
        assert_eq!(merged.rarity_cutoff, Some(0.01));
        assert!(merged.phased);
    }
}
