// hardy_weinberg.rs - Zygosity tallies and Hardy-Weinberg goodness of fit

use crate::data::individual::CohortMap;
use crate::data::popfreq::{FrequencyTable, PopulationFrequency};
use crate::data::variant::{Classification, Variant};
use serde::Serialize;
use std::collections::HashMap;

/// Chi-square critical value at alpha = 0.05 with one degree of freedom
pub const CHI_SQUARE_CRITICAL: f64 = 3.84;

/// Observed genotype counts for one variant across the cohort.
/// `hom_ref` is inferred: every individual not carrying the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GenotypeCounts {
    pub hom_ref: usize,
    pub het: usize,
    pub hom_alt: usize,
}

impl GenotypeCounts {
    pub fn total(&self) -> usize {
        self.hom_ref + self.het + self.hom_alt
    }
}

/// Hardy-Weinberg test result for one variant
#[derive(Debug, Clone, Serialize)]
pub struct HardyWeinbergRecord {
    pub counts: GenotypeCounts,
    pub p: f64,
    pub q: f64,
    pub chi_square: f64,
    pub in_equilibrium: bool,
    pub frequency: PopulationFrequency,
}

/// Tally observed het / hom-alt genotypes per variant for one
/// classification; hom-ref is the remainder of the cohort
pub fn genotype_counts(
    cohort: &CohortMap,
    classification: Classification,
) -> HashMap<Variant, GenotypeCounts> {
    let cohort_size = cohort.len();
    let mut tallies: HashMap<Variant, (usize, usize)> = HashMap::new();

    for individual in cohort.values() {
        for call in individual.calls(classification) {
            let entry = tallies.entry(call.variant.clone()).or_insert((0, 0));
            if call.zygosity == 3 {
                entry.1 += 1;
            } else {
                entry.0 += 1;
            }
        }
    }

    tallies
        .into_iter()
        .map(|(variant, (het, hom_alt))| {
            let counts = GenotypeCounts {
                hom_ref: cohort_size.saturating_sub(het + hom_alt),
                het,
                hom_alt,
            };
            (variant, counts)
        })
        .collect()
}

/// Chi-square goodness of fit against Hardy-Weinberg expected genotype
/// frequencies, df = 1. A zero expected count makes the test degenerate and
/// yields chi-square 0 (accept) rather than a division error.
pub fn chi_square(counts: &GenotypeCounts, yates: bool) -> f64 {
    let n = counts.total() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let p = (2.0 * counts.hom_ref as f64 + counts.het as f64) / (2.0 * n);
    let q = 1.0 - p;

    let expected = [n * p * p, 2.0 * p * q * n, n * q * q];
    let observed = [
        counts.hom_ref as f64,
        counts.het as f64,
        counts.hom_alt as f64,
    ];

    if expected.iter().any(|&e| e == 0.0) {
        return 0.0;
    }

    observed
        .iter()
        .zip(&expected)
        .map(|(&obs, &exp)| {
            let deviation = if yates {
                ((obs - exp).abs() - 0.5).max(0.0)
            } else {
                (obs - exp).abs()
            };
            deviation * deviation / exp
        })
        .sum()
}

/// Allele frequencies implied by the genotype counts: `p` for the reference
/// allele, `q = 1 - p` for the alternate
pub fn allele_frequencies(counts: &GenotypeCounts) -> (f64, f64) {
    let n = counts.total() as f64;
    if n == 0.0 {
        return (0.0, 0.0);
    }
    let p = (2.0 * counts.hom_ref as f64 + counts.het as f64) / (2.0 * n);
    (p, 1.0 - p)
}

/// Run the Hardy-Weinberg test per variant for one classification and
/// annotate each record with its population frequency
pub fn test_class(
    cohort: &CohortMap,
    classification: Classification,
    frequencies: Option<&FrequencyTable>,
    yates: bool,
) -> HashMap<Variant, HardyWeinbergRecord> {
    genotype_counts(cohort, classification)
        .into_iter()
        .map(|(variant, counts)| {
            let (p, q) = allele_frequencies(&counts);
            let chi = chi_square(&counts, yates);
            let frequency = frequencies
                .map(|table| table.max_frequency(&variant))
                .unwrap_or_else(PopulationFrequency::absent);
            let record = HardyWeinbergRecord {
                counts,
                p,
                q,
                chi_square: chi,
                in_equilibrium: chi <= CHI_SQUARE_CRITICAL,
                frequency,
            };
            (variant, record)
        })
        .collect()
}

/// Hardy-Weinberg records for VUS observed homozygous alternate at least
/// once: the zygosity signal the final report keys on
pub fn homozygous_vus(
    cohort: &CohortMap,
    frequencies: Option<&FrequencyTable>,
    yates: bool,
) -> HashMap<Variant, HardyWeinbergRecord> {
    let mut records = test_class(cohort, Classification::Vus, frequencies, yates);
    records.retain(|_, record| record.counts.hom_alt > 0);
    println!(
        "✅ Homozygous-VUS statistics: {} variants tested",
        records.len()
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::individual::Individual;

    #[test]
    fn test_equilibrium_accepts() {
        // p = q = 0.5 exactly: AA = aa = n/4, Aa = n/2
        let counts = GenotypeCounts {
            hom_ref: 250,
            het: 500,
            hom_alt: 250,
        };
        let chi = chi_square(&counts, false);
        assert!(chi.abs() < 1e-9);
        assert!(chi <= CHI_SQUARE_CRITICAL);
        let (p, q) = allele_frequencies(&counts);
        assert!((p - 0.5).abs() < 1e-12);
        assert!((q - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_all_hom_alt_is_degenerate_accept() {
        // p = 0, q = 1: expected AA and Aa are zero, test is degenerate
        let counts = GenotypeCounts {
            hom_ref: 0,
            het: 0,
            hom_alt: 100,
        };
        assert_eq!(chi_square(&counts, false), 0.0);
        let (p, q) = allele_frequencies(&counts);
        assert_eq!(p, 0.0);
        assert_eq!(q, 1.0);
    }

    #[test]
    fn test_disequilibrium_rejected() {
        // Strong heterozygote deficit: all carriers homozygous
        let counts = GenotypeCounts {
            hom_ref: 900,
            het: 0,
            hom_alt: 100,
        };
        let chi = chi_square(&counts, false);
        assert!(chi > CHI_SQUARE_CRITICAL);
    }

    #[test]
    fn test_yates_correction_shrinks_chi_square() {
        let counts = GenotypeCounts {
            hom_ref: 40,
            het: 40,
            hom_alt: 20,
        };
        let plain = chi_square(&counts, false);
        let corrected = chi_square(&counts, true);
        assert!(corrected < plain);
        assert!(corrected >= 0.0);
    }

    #[test]
    fn test_empty_cohort_chi_square_zero() {
        let counts = GenotypeCounts {
            hom_ref: 0,
            het: 0,
            hom_alt: 0,
        };
        assert_eq!(chi_square(&counts, false), 0.0);
    }

    #[test]
    fn test_genotype_counts_infer_hom_ref() {
        let v = Variant::new(13, 100, "A", "G");
        let mut cohort = CohortMap::new();
        let mut i1 = Individual::new("i1");
        i1.push(Classification::Vus, v.clone(), 1);
        cohort.insert(i1.id.clone(), i1);
        let mut i2 = Individual::new("i2");
        i2.push(Classification::Vus, v.clone(), 3);
        cohort.insert(i2.id.clone(), i2);
        cohort.insert("i3".to_string(), Individual::new("i3"));

        let counts = genotype_counts(&cohort, Classification::Vus);
        assert_eq!(
            counts[&v],
            GenotypeCounts {
                hom_ref: 1,
                het: 1,
                hom_alt: 1
            }
        );

        let hom = homozygous_vus(&cohort, None, false);
        assert!(hom.contains_key(&v));
        assert_eq!(hom[&v].counts.hom_alt, 1);
    }

    #[test]
    fn test_homozygous_vus_requires_hom_alt() {
        let v = Variant::new(13, 100, "A", "G");
        let mut cohort = CohortMap::new();
        let mut i1 = Individual::new("i1");
        i1.push(Classification::Vus, v, 1);
        cohort.insert(i1.id.clone(), i1);

        let hom = homozygous_vus(&cohort, None, false);
        assert!(hom.is_empty());
    }
}
