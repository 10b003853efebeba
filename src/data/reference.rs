// reference.rs - Reference variant-significance table classifier

use crate::data::variant::{coordinate_regex, Classification, Variant};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Known variants split into the three classification sets. A variant
/// belongs to at most one set; significance labels matching none of the
/// configured categories are dropped from all three.
#[derive(Debug, Default)]
pub struct ReferenceSets {
    pub benign: HashSet<Variant>,
    pub pathogenic: HashSet<Variant>,
    pub vus: HashSet<Variant>,
}

/// String-membership rules mapping a clinical-significance label to a
/// classification set
#[derive(Debug, Clone)]
pub struct SignificanceLabels {
    pub pathogenic: HashSet<String>,
    pub benign: HashSet<String>,
    pub uncertain: HashSet<String>,
}

impl Default for SignificanceLabels {
    fn default() -> Self {
        let set = |labels: &[&str]| labels.iter().map(|s| s.to_string()).collect();
        Self {
            pathogenic: set(&["Pathogenic", "Likely pathogenic", "Pathogenic/Likely pathogenic"]),
            benign: set(&["Benign", "Likely benign", "Benign/Likely benign"]),
            // Unannotated rows carry an empty significance field
            uncertain: set(&["Uncertain significance", "Conflicting interpretations", ""]),
        }
    }
}

impl SignificanceLabels {
    pub fn from_lists(pathogenic: &[String], benign: &[String], uncertain: &[String]) -> Self {
        Self {
            pathogenic: pathogenic.iter().cloned().collect(),
            benign: benign.iter().cloned().collect(),
            uncertain: uncertain.iter().cloned().collect(),
        }
    }
}

impl ReferenceSets {
    pub fn total(&self) -> usize {
        self.benign.len() + self.pathogenic.len() + self.vus.len()
    }

    /// Classify a cohort-observed variant against the reference sets.
    /// Variants absent from every set are novel and default to VUS.
    pub fn classify(&self, variant: &Variant) -> Classification {
        self.classify_known(variant).unwrap_or(Classification::Vus)
    }

    /// Membership lookup without the novel-variant fallback
    pub fn classify_known(&self, variant: &Variant) -> Option<Classification> {
        if self.pathogenic.contains(variant) {
            Some(Classification::Pathogenic)
        } else if self.benign.contains(variant) {
            Some(Classification::Benign)
        } else if self.vus.contains(variant) {
            Some(Classification::Vus)
        } else {
            None
        }
    }

    /// Load a tab-delimited reference table. `coordinate_column` selects the
    /// genome-build-specific column holding `chr<N>:g.<pos>:<ref>><alt>`
    /// strings; `significance_column` holds the clinical label. Rows with a
    /// malformed coordinate are skipped with a warning; rows whose label
    /// matches no configured category are silently excluded from all sets.
    pub fn from_table(
        file_path: &Path,
        significance_column: &str,
        coordinate_column: &str,
        labels: &SignificanceLabels,
    ) -> Result<Self, String> {
        let file = File::open(file_path)
            .map_err(|e| format!("Failed to open reference table '{}': {}", file_path.display(), e))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or("Empty reference table")?
            .map_err(|e| format!("Failed to read header: {}", e))?;
        let header: Vec<&str> = header_line.split('\t').collect();

        let sig_idx = header
            .iter()
            .position(|&c| c == significance_column)
            .ok_or_else(|| format!("Reference table has no '{}' column", significance_column))?;
        let coord_idx = header
            .iter()
            .position(|&c| c == coordinate_column)
            .ok_or_else(|| format!("Reference table has no '{}' column", coordinate_column))?;

        let re = coordinate_regex();
        let mut sets = ReferenceSets::default();
        let mut skipped = 0usize;
        let mut unmatched = 0usize;
        let mut conflicts = 0usize;

        for (line_num, line) in lines.enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 2, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() <= sig_idx.max(coord_idx) {
                eprintln!(
                    "⚠️  Reference row {} has {} columns, expected at least {}; skipped",
                    line_num + 2,
                    parts.len(),
                    sig_idx.max(coord_idx) + 1
                );
                skipped += 1;
                continue;
            }

            let variant = match Variant::from_coordinate_with(&re, parts[coord_idx]) {
                Ok(v) => v,
                Err(_) => {
                    // Malformed coordinate: drop the row, never abort the load
                    skipped += 1;
                    continue;
                }
            };

            let significance = parts[sig_idx].trim();
            let target = if labels.pathogenic.contains(significance) {
                Classification::Pathogenic
            } else if labels.benign.contains(significance) {
                Classification::Benign
            } else if labels.uncertain.contains(significance) {
                Classification::Vus
            } else {
                unmatched += 1;
                continue;
            };

            // Keep the first label seen: a variant belongs to at most one set
            if sets.classify_known(&variant).is_some_and(|c| c != target) {
                eprintln!(
                    "⚠️  Row {}: conflicting significance '{}' for {}; keeping the first label",
                    line_num + 2,
                    significance,
                    variant
                );
                conflicts += 1;
                continue;
            }
            match target {
                Classification::Pathogenic => sets.pathogenic.insert(variant),
                Classification::Benign => sets.benign.insert(variant),
                Classification::Vus => sets.vus.insert(variant),
            };
        }

        println!(
            "✅ Reference table loaded: {} pathogenic, {} benign, {} VUS ({} unmatched labels, {} malformed rows skipped, {} conflicting labels)",
            sets.pathogenic.len(),
            sets.benign.len(),
            sets.vus.len(),
            unmatched,
            skipped,
            conflicts
        );
        Ok(sets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_table(tag: &str, rows: &[&str]) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("cooccur_ref_{}_{}.tsv", tag, std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "gene\tclinical_significance\tcoordinates_grch38").unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        path
    }

    #[test]
    fn test_classification_sets_disjoint_and_idempotent() {
        let path = write_table("disjoint", &[
            "BRCA2\tPathogenic\tchr13:g.100:A>G",
            "BRCA2\tBenign\tchr13:g.200:C>T",
            "BRCA2\tUncertain significance\tchr13:g.300:G>A",
            "BRCA2\tnot a real label\tchr13:g.400:T>C",
            "BRCA2\tPathogenic\tbroken-coordinate",
        ]);
        let labels = SignificanceLabels::default();
        let first =
            ReferenceSets::from_table(&path, "clinical_significance", "coordinates_grch38", &labels)
                .unwrap();
        let second =
            ReferenceSets::from_table(&path, "clinical_significance", "coordinates_grch38", &labels)
                .unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(first.pathogenic.len(), 1);
        assert_eq!(first.benign.len(), 1);
        assert_eq!(first.vus.len(), 1);
        // Unmatched label and malformed row excluded entirely
        assert_eq!(first.total(), 3);
        // Idempotent: no hidden state between loads
        assert_eq!(first.pathogenic, second.pathogenic);
        assert_eq!(first.benign, second.benign);
        assert_eq!(first.vus, second.vus);
    }

    #[test]
    fn test_conflicting_labels_keep_first_occurrence() {
        let path = write_table("conflict", &[
            "BRCA2\tPathogenic\tchr13:g.100:A>G",
            "BRCA2\tBenign\tchr13:g.100:A>G",
            "BRCA2\tBenign\tchr13:g.200:C>T",
            "BRCA2\tBenign\tchr13:g.200:C>T",
        ]);
        let labels = SignificanceLabels::default();
        let sets =
            ReferenceSets::from_table(&path, "clinical_significance", "coordinates_grch38", &labels)
                .unwrap();
        std::fs::remove_file(&path).ok();

        // Conflicting relabel dropped, same-label duplicate is harmless
        assert!(sets.pathogenic.contains(&Variant::new(13, 100, "A", "G")));
        assert!(!sets.benign.contains(&Variant::new(13, 100, "A", "G")));
        assert!(sets.benign.contains(&Variant::new(13, 200, "C", "T")));
        assert_eq!(sets.total(), 2);
    }

    #[test]
    fn test_novel_variant_classifies_as_vus() {
        use crate::data::variant::Classification;
        let sets = ReferenceSets::default();
        let novel = Variant::new(13, 999, "A", "T");
        assert_eq!(sets.classify(&novel), Classification::Vus);
    }
}
