// partition.rs - Parallel genotype partitioning and classification

use crate::annotation::{AnnotationTable, MemoResolver};
use crate::data::individual::{CohortMap, Individual};
use crate::data::matrix::GenotypeMatrix;
use crate::data::reference::ReferenceSets;
use crate::data::variant::zygosity_code;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::ops::Range;
use std::time::Instant;

/// Split `total` items into `workers` contiguous group sizes differing by at
/// most 1; the first `total % workers` groups take the extra element.
pub fn divide(total: usize, workers: usize) -> Vec<usize> {
    if workers == 0 {
        return Vec::new();
    }
    let base = total / workers;
    let remainder = total % workers;
    (0..workers)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

/// Contiguous index ranges corresponding to `divide(total, workers)`
pub fn partition_ranges(total: usize, workers: usize) -> Vec<Range<usize>> {
    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for size in divide(total, workers) {
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Scan one contiguous slice of individuals over the entire locus matrix.
/// Each worker owns its resolver memo; the matrix is shared read-only.
fn scan_partition(
    matrix: &GenotypeMatrix,
    reference: &ReferenceSets,
    annotation: &AnnotationTable,
    chromosome: u32,
    gene: &str,
    individuals: Range<usize>,
) -> Result<CohortMap, String> {
    let mut resolver = MemoResolver::new(annotation);
    let mut local = CohortMap::with_capacity(individuals.len());

    // Every assigned individual appears in the result, carriers or not:
    // cohort size is the number of individuals processed
    for idx in individuals.clone() {
        let id = &matrix.individuals[idx];
        local.insert(id.clone(), Individual::new(id));
    }

    for (row, locus) in matrix.loci.iter().enumerate() {
        let variant = &locus.variant;
        if variant.chromosome != chromosome {
            continue;
        }
        if !resolver.in_gene(variant.chromosome, variant.position, gene) {
            continue;
        }
        let classification = reference.classify(variant);

        for idx in individuals.clone() {
            let (a1, a2) = matrix.cells[row][idx];
            let code = zygosity_code(a1, a2);
            if code == 0 {
                continue;
            }
            let id = &matrix.individuals[idx];
            local
                .get_mut(id)
                .ok_or_else(|| format!("Partition lost individual '{}'", id))?
                .push(classification, variant.clone(), code);
        }
    }

    Ok(local)
}

/// Fan out the cohort over `workers` parallel partitions, classify every
/// genotype call against the reference sets, and merge the disjoint results.
/// Any worker error aborts the stage: counts over a partial cohort are
/// meaningless.
pub fn classify_cohort(
    matrix: &GenotypeMatrix,
    reference: &ReferenceSets,
    annotation: &AnnotationTable,
    chromosome: u32,
    gene: &str,
    workers: usize,
) -> Result<CohortMap, String> {
    if workers == 0 {
        return Err("Worker count must be at least 1".to_string());
    }
    let total = matrix.individuals.len();
    if total == 0 {
        return Err("Genotype matrix has no individuals".to_string());
    }

    let start = Instant::now();
    let ranges = partition_ranges(total, workers);
    println!(
        "🧬 Classifying cohort: {} individuals across {} workers ({} loci)",
        total,
        workers,
        matrix.loci.len()
    );

    let progress = ProgressBar::new(workers as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} partitions")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    // One task per partition: disjoint contiguous slices, single blocking
    // collect as the join barrier, no partial results
    let results: Result<Vec<CohortMap>, String> = ranges
        .into_par_iter()
        .map(|range| {
            let local = scan_partition(matrix, reference, annotation, chromosome, gene, range);
            progress.inc(1);
            local
        })
        .collect();
    progress.finish_and_clear();

    let partials = results?;

    // Keys are disjoint by construction, so the merge is a plain union
    let mut cohort = CohortMap::with_capacity(total);
    for partial in partials {
        cohort.extend(partial);
    }

    let classified: usize = cohort.values().map(|ind| ind.total_calls()).sum();
    println!(
        "✅ Cohort classified: {} individuals, {} calls in gene {} ({:.2}s)",
        cohort.len(),
        classified,
        gene,
        start.elapsed().as_secs_f64()
    );
    Ok(cohort)
}
