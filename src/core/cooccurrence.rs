// cooccurrence.rs - Phase-aware co-occurrence aggregation

use crate::annotation::{GeneResolver, MemoResolver};
use crate::data::individual::CohortMap;
use crate::data::variant::{is_homozygous_alt, Variant};
use std::collections::HashMap;
use std::time::Instant;

/// Cohort-wide co-occurrence counts. For every VUS, `n` is the number of
/// distinct individuals carrying it (any zygosity) and `k` the number whose
/// carriage is phase-consistent with at least one pathogenic variant in the
/// same gene; `pairs` records which individuals exhibit each specific
/// (VUS, pathogenic) pairing. Invariant: `0 <= k[v] <= n[v]`.
#[derive(Debug, Default)]
pub struct CohortAggregate {
    pub n: HashMap<Variant, usize>,
    pub k: HashMap<Variant, usize>,
    pub pairs: HashMap<(Variant, Variant), Vec<String>>,
}

impl CohortAggregate {
    /// Pathogenic variants a given VUS was seen co-occurring with
    pub fn partners(&self, vus: &Variant) -> Vec<Variant> {
        let mut partners: Vec<Variant> = self
            .pairs
            .keys()
            .filter(|(v, _)| v == vus)
            .map(|(_, pathogenic)| pathogenic.clone())
            .collect();
        partners.sort_by_key(|v| (v.chromosome, v.position, v.to_string()));
        partners
    }
}

/// Phase-consistency test for one (VUS, pathogenic) pair of calls.
///
/// Unphased mode: parental origin is unknowable, so any same-gene pairing
/// counts. Phased mode additionally requires the VUS to be homozygous
/// alternate (present on both copies, hence necessarily on the pathogenic
/// copy) or the two heterozygous calls to sit on complementary copies
/// (zygosity codes 1 and 2 in opposite combination).
pub fn phase_consistent(
    same_gene: bool,
    phased: bool,
    vus_zygosity: u8,
    pathogenic_zygosity: u8,
) -> bool {
    if !same_gene {
        return false;
    }
    if !phased {
        return true;
    }
    if is_homozygous_alt(vus_zygosity) {
        return true;
    }
    matches!(
        (vus_zygosity, pathogenic_zygosity),
        (1, 2) | (2, 1)
    )
}

/// Aggregate co-occurrence over the merged cohort map. A single pass per
/// individual over the VUS × pathogenic cross product; gene resolution is
/// memoized per distinct variant position across individuals and pairs.
pub fn aggregate<R: GeneResolver + ?Sized>(
    cohort: &CohortMap,
    resolver: &R,
    phased: bool,
) -> CohortAggregate {
    let start = Instant::now();
    let mut memo = MemoResolver::new(resolver);
    let mut agg = CohortAggregate::default();

    // Deterministic iteration keeps pair lists reproducible across runs
    let mut ids: Vec<&String> = cohort.keys().collect();
    ids.sort();

    let mut crossings = 0usize;
    for id in ids {
        let individual = &cohort[id];
        for vus_call in &individual.vus {
            *agg.n.entry(vus_call.variant.clone()).or_insert(0) += 1;

            let mut cooccurred = false;
            for pathogenic_call in &individual.pathogenic {
                crossings += 1;
                let same_gene = memo.share_gene(
                    (vus_call.variant.chromosome, vus_call.variant.position),
                    (
                        pathogenic_call.variant.chromosome,
                        pathogenic_call.variant.position,
                    ),
                );
                if phase_consistent(
                    same_gene,
                    phased,
                    vus_call.zygosity,
                    pathogenic_call.zygosity,
                ) {
                    cooccurred = true;
                    agg.pairs
                        .entry((vus_call.variant.clone(), pathogenic_call.variant.clone()))
                        .or_default()
                        .push(individual.id.clone());
                }
            }
            // At most one increment per individual per VUS keeps k <= n even
            // for carriers of several pathogenic partners
            if cooccurred {
                *agg.k.entry(vus_call.variant.clone()).or_insert(0) += 1;
            }
        }
    }

    println!(
        "✅ Co-occurrence aggregated: {} VUS observed, {} with co-occurrence, {} pair checks ({:.2}s)",
        agg.n.len(),
        agg.k.len(),
        crossings,
        start.elapsed().as_secs_f64()
    );
    agg
}
