// mod.rs - Gene-locus resolution against a genome annotation release

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// External-collaborator seam: map a genomic coordinate to the set of gene
/// names overlapping it on a specific annotation release. Implementations
/// return `Err` on lookup failure; callers treat any error as "no gene",
/// log, and continue. A single failed lookup never aborts a cohort scan.
pub trait GeneResolver {
    fn resolve_genes(&self, chromosome: u32, position: u64) -> Result<HashSet<String>, String>;
}

/// Explicit resolver configuration; replaces any ambient/environment state.
/// One resolver is constructed per worker from a shared table reference.
#[derive(Debug, Clone)]
pub struct AnnotationConfig {
    pub path: PathBuf,
    pub release: String,
}

/// Gene-interval table for one annotation release, loaded from a
/// tab-delimited file with columns `release, chromosome, start, end, gene`.
/// Intervals are closed on both ends.
#[derive(Debug)]
pub struct AnnotationTable {
    release: String,
    // chromosome -> intervals sorted by start
    intervals: HashMap<u32, Vec<(u64, u64, String)>>,
}

impl AnnotationTable {
    pub fn from_config(config: &AnnotationConfig) -> Result<Self, String> {
        Self::from_file(&config.path, &config.release)
    }

    pub fn from_file(file_path: &Path, release: &str) -> Result<Self, String> {
        let file = File::open(file_path).map_err(|e| {
            format!(
                "Failed to open annotation table '{}': {}",
                file_path.display(),
                e
            )
        })?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or("Empty annotation table")?
            .map_err(|e| format!("Failed to read header: {}", e))?;
        let header: Vec<&str> = header_line.split('\t').collect();
        let idx = |name: &str| {
            header
                .iter()
                .position(|&c| c == name)
                .ok_or_else(|| format!("Annotation table has no '{}' column", name))
        };
        let (release_idx, chrom_idx, start_idx, end_idx, gene_idx) = (
            idx("release")?,
            idx("chromosome")?,
            idx("start")?,
            idx("end")?,
            idx("gene")?,
        );

        let mut intervals: HashMap<u32, Vec<(u64, u64, String)>> = HashMap::new();
        let mut total = 0usize;

        for (line_num, line) in lines.enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 2, e))?;
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if parts.len() != header.len() {
                return Err(format!(
                    "Line {} has {} columns, expected {}",
                    line_num + 2,
                    parts.len(),
                    header.len()
                ));
            }

            if parts[release_idx].trim() != release {
                continue;
            }

            let chromosome: u32 = parts[chrom_idx]
                .trim()
                .trim_start_matches("chr")
                .parse()
                .map_err(|_| format!("Invalid chromosome '{}' at line {}", parts[chrom_idx], line_num + 2))?;
            let start: u64 = parts[start_idx]
                .trim()
                .parse()
                .map_err(|_| format!("Invalid start '{}' at line {}", parts[start_idx], line_num + 2))?;
            let end: u64 = parts[end_idx]
                .trim()
                .parse()
                .map_err(|_| format!("Invalid end '{}' at line {}", parts[end_idx], line_num + 2))?;
            if end < start {
                return Err(format!("Interval end < start at line {}", line_num + 2));
            }

            intervals
                .entry(chromosome)
                .or_default()
                .push((start, end, parts[gene_idx].trim().to_string()));
            total += 1;
        }

        if total == 0 {
            return Err(format!(
                "Annotation table '{}' has no intervals for release '{}'",
                file_path.display(),
                release
            ));
        }

        for chrom_intervals in intervals.values_mut() {
            chrom_intervals.sort_by_key(|&(start, _, _)| start);
        }

        println!(
            "✅ Annotation loaded: {} gene intervals on {} chromosomes (release {})",
            total,
            intervals.len(),
            release
        );
        Ok(Self {
            release: release.to_string(),
            intervals,
        })
    }

    pub fn release(&self) -> &str {
        &self.release
    }
}

impl GeneResolver for AnnotationTable {
    fn resolve_genes(&self, chromosome: u32, position: u64) -> Result<HashSet<String>, String> {
        let Some(chrom_intervals) = self.intervals.get(&chromosome) else {
            return Ok(HashSet::new());
        };
        Ok(chrom_intervals
            .iter()
            .filter(|&&(start, end, _)| position >= start && position <= end)
            .map(|(_, _, gene)| gene.clone())
            .collect())
    }
}

/// Memoizing wrapper over a resolver. Owned privately by each worker, so
/// the cache needs no locking; lookups are keyed by (chromosome, position).
pub struct MemoResolver<'a, R: GeneResolver + ?Sized> {
    inner: &'a R,
    cache: HashMap<(u32, u64), HashSet<String>>,
    failures: usize,
}

impl<'a, R: GeneResolver + ?Sized> MemoResolver<'a, R> {
    pub fn new(inner: &'a R) -> Self {
        Self {
            inner,
            cache: HashMap::new(),
            failures: 0,
        }
    }

    /// Resolve with the error policy folded in: a lookup failure logs a
    /// warning and yields the empty gene set
    pub fn genes(&mut self, chromosome: u32, position: u64) -> &HashSet<String> {
        if !self.cache.contains_key(&(chromosome, position)) {
            let genes = match self.inner.resolve_genes(chromosome, position) {
                Ok(genes) => genes,
                Err(e) => {
                    self.failures += 1;
                    eprintln!(
                        "⚠️  Gene lookup failed for chr{}:{}: {} (treated as no gene)",
                        chromosome, position, e
                    );
                    HashSet::new()
                }
            };
            self.cache.insert((chromosome, position), genes);
        }
        &self.cache[&(chromosome, position)]
    }

    /// True when the locus overlaps the named gene
    pub fn in_gene(&mut self, chromosome: u32, position: u64, gene: &str) -> bool {
        self.genes(chromosome, position).contains(gene)
    }

    /// True when the two loci share at least one gene
    pub fn share_gene(&mut self, a: (u32, u64), b: (u32, u64)) -> bool {
        if self.genes(a.0, a.1).is_empty() {
            return false;
        }
        // Clone the first set out of the cache before the second borrow
        let genes_a = self.cache[&a].clone();
        self.genes(b.0, b.1).intersection(&genes_a).next().is_some()
    }

    pub fn failures(&self) -> usize {
        self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_annotation(tag: &str) -> std::path::PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("cooccur_annot_{}_{}.tsv", tag, std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "release\tchromosome\tstart\tend\tgene").unwrap();
        writeln!(file, "110\t13\t100\t500\tBRCA2").unwrap();
        writeln!(file, "110\t13\t450\t600\tOVERLAP").unwrap();
        writeln!(file, "110\t17\t100\t300\tBRCA1").unwrap();
        writeln!(file, "109\t13\t100\t500\tOLD_NAME").unwrap();
        path
    }

    #[test]
    fn test_resolve_genes_by_release() {
        let path = write_annotation("resolve");
        let table = AnnotationTable::from_file(&path, "110").unwrap();
        std::fs::remove_file(&path).ok();

        let genes = table.resolve_genes(13, 120).unwrap();
        assert_eq!(genes.len(), 1);
        assert!(genes.contains("BRCA2"));

        // Overlapping intervals both resolve
        let genes = table.resolve_genes(13, 460).unwrap();
        assert_eq!(genes.len(), 2);

        // Off-annotation locus is an empty set, not an error
        assert!(table.resolve_genes(13, 9999).unwrap().is_empty());
        assert!(table.resolve_genes(1, 120).unwrap().is_empty());
    }

    #[test]
    fn test_missing_release_is_an_error() {
        let path = write_annotation("release");
        let result = AnnotationTable::from_file(&path, "999");
        std::fs::remove_file(&path).ok();
        assert!(result.is_err());
    }

    #[test]
    fn test_memoized_resolution() {
        struct Failing;
        impl GeneResolver for Failing {
            fn resolve_genes(&self, _: u32, _: u64) -> Result<HashSet<String>, String> {
                Err("backend down".to_string())
            }
        }

        let failing = Failing;
        let mut memo = MemoResolver::new(&failing);
        // Failure absorbed as "no gene" and memoized: one backend call
        assert!(memo.genes(13, 100).is_empty());
        assert!(memo.genes(13, 100).is_empty());
        assert_eq!(memo.failures(), 1);
        assert!(!memo.in_gene(13, 100, "BRCA2"));
    }

    #[test]
    fn test_share_gene() {
        let path = write_annotation("share");
        let table = AnnotationTable::from_file(&path, "110").unwrap();
        std::fs::remove_file(&path).ok();

        let mut memo = MemoResolver::new(&table);
        assert!(memo.share_gene((13, 120), (13, 480)));
        assert!(!memo.share_gene((13, 120), (17, 150)));
        assert!(!memo.share_gene((13, 9999), (13, 120)));
    }
}
