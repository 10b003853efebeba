// likelihood.rs - Likelihood ratio scoring for VUS pathogenicity

use crate::core::cooccurrence::CohortAggregate;
use crate::data::individual::CohortMap;
use crate::data::popfreq::{FrequencyTable, PopulationFrequency};
use crate::data::variant::Variant;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Per-VUS likelihood evidence: the priors, the counts they were combined
/// with, the resulting ratio, population frequency context, and the
/// pathogenic variants the VUS was observed co-occurring with.
#[derive(Debug, Clone, Serialize)]
pub struct LikelihoodRecord {
    pub p1: f64,
    pub p2: f64,
    pub n: usize,
    pub k: usize,
    pub likelihood_ratio: f64,
    pub frequency: PopulationFrequency,
    pub cohort_frequency: f64,
    pub pathogenic_partners: Vec<Variant>,
    pub rare: bool,
}

/// Cohort-derived prior: half the fraction of cohort members the distinct
/// observed benign variants would account for. Computed once per run.
pub fn cohort_prior(cohort: &CohortMap) -> f64 {
    if cohort.is_empty() {
        return 0.0;
    }
    let distinct_benign: HashSet<&Variant> = cohort
        .values()
        .flat_map(|ind| ind.benign.iter().map(|call| &call.variant))
        .collect();
    0.5 * distinct_benign.len() as f64 / cohort.len() as f64
}

/// Likelihood ratio of the "VUS is pathogenic" hypothesis (co-occurrence
/// probability `p2`) against the "VUS is benign" hypothesis (`p1`), given
/// `k` co-occurrences in `n` observations. A numerically zero denominator
/// yields the smallest positive float rather than a division error.
pub fn likelihood_ratio(p1: f64, p2: f64, n: usize, k: usize) -> f64 {
    let k = k as i32;
    let nk = (n - k as usize) as i32;
    let numerator = p2.powi(k) * (1.0 - p2).powi(nk);
    let denominator = p1.powi(k) * (1.0 - p1).powi(nk);
    if denominator == 0.0 {
        return f64::MIN_POSITIVE;
    }
    numerator / denominator
}

/// Score every VUS with observed co-occurrence. Entries with `k == 0` carry
/// no evidence and are excluded entirely. The rare flag is set when either
/// the cohort carrier frequency or the maximum population allele frequency
/// falls below `rarity_cutoff`.
pub fn score_cohort(
    aggregate: &CohortAggregate,
    cohort: &CohortMap,
    frequencies: Option<&FrequencyTable>,
    p2: f64,
    rarity_cutoff: f64,
) -> HashMap<Variant, LikelihoodRecord> {
    let p1 = cohort_prior(cohort);
    let cohort_size = cohort.len();
    let mut records = HashMap::new();

    for (vus, &n) in &aggregate.n {
        let k = match aggregate.k.get(vus) {
            Some(&k) if k > 0 => k,
            _ => continue,
        };

        let frequency = frequencies
            .map(|table| table.max_frequency(vus))
            .unwrap_or_else(PopulationFrequency::absent);
        let cohort_frequency = if cohort_size > 0 {
            n as f64 / cohort_size as f64
        } else {
            0.0
        };
        let rare = cohort_frequency < rarity_cutoff || frequency.frequency < rarity_cutoff;

        records.insert(
            vus.clone(),
            LikelihoodRecord {
                p1,
                p2,
                n,
                k,
                likelihood_ratio: likelihood_ratio(p1, p2, n, k),
                frequency,
                cohort_frequency,
                pathogenic_partners: aggregate.partners(vus),
                rare,
            },
        );
    }

    println!(
        "✅ Likelihood table: {} VUS scored (p1={:.6}, p2={:.6})",
        records.len(),
        p1,
        p2
    );
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::individual::Individual;
    use crate::data::variant::Classification;

    fn variant(position: u64) -> Variant {
        Variant::new(13, position, "A", "G")
    }

    #[test]
    fn test_ratio_is_deterministic() {
        let a = likelihood_ratio(0.01, 0.05, 10, 2);
        let b = likelihood_ratio(0.01, 0.05, 10, 2);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_ratio_exceeds_one_when_p2_dominates() {
        // One co-occurrence in two observations with p2 > p1
        let ratio = likelihood_ratio(0.001, 0.01, 2, 1);
        assert!(ratio > 1.0);
    }

    #[test]
    fn test_ratio_underflow_sentinel() {
        // p1 = 1 forces the (1-p1) factor to zero
        let ratio = likelihood_ratio(1.0, 0.5, 10, 2);
        assert_eq!(ratio, f64::MIN_POSITIVE);
    }

    #[test]
    fn test_cohort_prior() {
        let mut cohort = CohortMap::new();
        let mut i1 = Individual::new("i1");
        i1.push(Classification::Benign, variant(100), 1);
        i1.push(Classification::Benign, variant(200), 1);
        cohort.insert(i1.id.clone(), i1);
        let mut i2 = Individual::new("i2");
        // Same benign variant again: distinct count stays 2
        i2.push(Classification::Benign, variant(100), 3);
        cohort.insert(i2.id.clone(), i2);
        cohort.insert("i3".to_string(), Individual::new("i3"));
        cohort.insert("i4".to_string(), Individual::new("i4"));

        // 0.5 * 2 distinct benign / 4 individuals
        assert!((cohort_prior(&cohort) - 0.25).abs() < 1e-12);
        assert_eq!(cohort_prior(&CohortMap::new()), 0.0);
    }

    #[test]
    fn test_score_excludes_k_zero() {
        let mut agg = CohortAggregate::default();
        agg.n.insert(variant(100), 2);
        agg.k.insert(variant(100), 1);
        agg.n.insert(variant(300), 5); // observed but never co-occurring
        agg.pairs
            .entry((variant(100), variant(200)))
            .or_default()
            .push("i1".to_string());

        let mut cohort = CohortMap::new();
        for id in ["i1", "i2", "i3"] {
            cohort.insert(id.to_string(), Individual::new(id));
        }

        let records = score_cohort(&agg, &cohort, None, 0.01, 0.05);
        assert_eq!(records.len(), 1);
        let record = &records[&variant(100)];
        assert_eq!(record.n, 2);
        assert_eq!(record.k, 1);
        assert_eq!(record.pathogenic_partners, vec![variant(200)]);
        // No frequency table: population frequency absent, cohort carrier
        // frequency 2/3 above the cutoff, population side below it
        assert!(record.rare);
        assert!(record.likelihood_ratio > 0.0);
    }
}
