// mod.rs - Report writers

use crate::core::cooccurrence::CohortAggregate;
use crate::core::hardy_weinberg::HardyWeinbergRecord;
use crate::core::likelihood::LikelihoodRecord;
use crate::data::variant::Variant;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &str) -> Result<(), String> {
    if let Some(parent) = Path::new(file_path).parent() {
        create_dir_all(parent)
            .map_err(|e| format!("Failed to create parent directory '{}': {}", parent.display(), e))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ReportMetadata {
    command: String,
    generated: String,
    version: String,
    build: String,
    release: String,
    chromosome: u32,
    gene: String,
    phased: bool,
    cohort_size: usize,
}

/// Final per-run report: likelihood evidence and homozygous-VUS statistics,
/// both keyed by stringified variant
#[derive(Debug, Serialize)]
struct Report<'a> {
    metadata: ReportMetadata,
    likelihood: BTreeMap<String, &'a LikelihoodRecord>,
    homozygous_vus: BTreeMap<String, &'a HardyWeinbergRecord>,
}

/// Write the JSON report. Maps are re-keyed through BTreeMap so the output
/// is stable across runs.
#[allow(clippy::too_many_arguments)]
pub fn write_report(
    file_path: &str,
    command_line: &str,
    build: &str,
    release: &str,
    chromosome: u32,
    gene: &str,
    phased: bool,
    cohort_size: usize,
    likelihood: &HashMap<Variant, LikelihoodRecord>,
    homozygous: &HashMap<Variant, HardyWeinbergRecord>,
) -> Result<(), String> {
    ensure_parent_dir(file_path)?;

    let report = Report {
        metadata: ReportMetadata {
            command: command_line.to_string(),
            generated: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            build: build.to_string(),
            release: release.to_string(),
            chromosome,
            gene: gene.to_string(),
            phased,
            cohort_size,
        },
        likelihood: likelihood
            .iter()
            .map(|(variant, record)| (variant.to_string(), record))
            .collect(),
        homozygous_vus: homozygous
            .iter()
            .map(|(variant, record)| (variant.to_string(), record))
            .collect(),
    };

    let file = File::create(file_path)
        .map_err(|e| format!("Failed to create output file '{}': {}", file_path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &report)
        .map_err(|e| format!("Failed to serialize report: {}", e))?;
    writer.flush().map_err(|e| format!("Flush error: {}", e))?;

    println!("✅ Report written to: {}", file_path);
    Ok(())
}

/// Write every co-occurring (VUS, pathogenic, individual) triple to a CSV
/// log for downstream review
pub fn write_pair_log(file_path: &str, aggregate: &CohortAggregate) -> Result<(), String> {
    ensure_parent_dir(file_path)?;
    let mut writer = csv::Writer::from_path(file_path)
        .map_err(|e| format!("Failed to create pair log '{}': {}", file_path, e))?;

    writer
        .write_record(["vus", "pathogenic", "individual"])
        .map_err(|e| format!("Write error: {}", e))?;

    // Sorted for reproducible logs
    let mut pairs: Vec<_> = aggregate.pairs.iter().collect();
    pairs.sort_by_key(|((vus, pathogenic), _)| (vus.to_string(), pathogenic.to_string()));

    let mut rows = 0usize;
    for ((vus, pathogenic), individuals) in pairs {
        for individual in individuals {
            writer
                .write_record([&vus.to_string(), &pathogenic.to_string(), individual])
                .map_err(|e| format!("Write error: {}", e))?;
            rows += 1;
        }
    }

    writer.flush().map_err(|e| format!("Flush error: {}", e))?;
    println!("✅ Pair log written to: {} ({} rows)", file_path, rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::popfreq::PopulationFrequency;

    #[test]
    fn test_report_round_trips_as_json() {
        let vus = Variant::new(13, 100, "A", "G");
        let mut likelihood = HashMap::new();
        likelihood.insert(
            vus.clone(),
            LikelihoodRecord {
                p1: 0.001,
                p2: 0.01,
                n: 2,
                k: 1,
                likelihood_ratio: 9.99,
                frequency: PopulationFrequency::absent(),
                cohort_frequency: 0.5,
                pathogenic_partners: vec![Variant::new(13, 200, "C", "T")],
                rare: true,
            },
        );

        let mut path = std::env::temp_dir();
        path.push(format!("cooccur_report_{}.json", std::process::id()));
        let path_str = path.to_str().unwrap().to_string();
        write_report(
            &path_str,
            "cooccur --gene BRCA2",
            "grch38",
            "110",
            13,
            "BRCA2",
            true,
            3,
            &likelihood,
            &HashMap::new(),
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed["metadata"]["gene"], "BRCA2");
        assert_eq!(parsed["metadata"]["cohort_size"], 3);
        let record = &parsed["likelihood"]["chr13:g.100:A>G"];
        assert_eq!(record["n"], 2);
        assert_eq!(record["k"], 1);
        assert_eq!(record["pathogenic_partners"][0], "chr13:g.200:C>T");
    }

    #[test]
    fn test_pair_log() {
        let mut aggregate = CohortAggregate::default();
        aggregate
            .pairs
            .entry((Variant::new(13, 100, "A", "G"), Variant::new(13, 200, "C", "T")))
            .or_default()
            .extend(["i1".to_string(), "i2".to_string()]);

        let mut path = std::env::temp_dir();
        path.push(format!("cooccur_pairs_{}.csv", std::process::id()));
        let path_str = path.to_str().unwrap().to_string();
        write_pair_log(&path_str, &aggregate).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "vus,pathogenic,individual");
        assert!(lines[1].contains("chr13:g.100:A>G"));
    }
}
