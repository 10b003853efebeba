// popfreq.rs - Population allele frequency reference

use crate::data::variant::Variant;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Maximum allele frequency observed across population-specific reference
/// columns. Absence of any match is a defined value, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationFrequency {
    pub frequency: f64,
    pub population: Option<String>,
}

impl PopulationFrequency {
    pub fn absent() -> Self {
        Self {
            frequency: 0.0,
            population: None,
        }
    }
}

/// Per-variant allele frequencies split by population and exome/genome
/// source, keyed by coordinate string
#[derive(Debug, Default)]
pub struct FrequencyTable {
    populations: Vec<String>,
    rows: HashMap<String, Vec<f64>>,
}

impl FrequencyTable {
    /// Load a tab-delimited frequency reference. `coordinate_column` names
    /// the coordinate-string column; every other column is treated as a
    /// population/source frequency column. Unparsable frequency cells count
    /// as 0.0 for that population.
    pub fn from_file(file_path: &Path, coordinate_column: &str) -> Result<Self, String> {
        let file = File::open(file_path).map_err(|e| {
            format!(
                "Failed to open frequency reference '{}': {}",
                file_path.display(),
                e
            )
        })?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or("Empty frequency reference")?
            .map_err(|e| format!("Failed to read header: {}", e))?;
        let header: Vec<&str> = header_line.split('\t').collect();

        let coord_idx = header
            .iter()
            .position(|&c| c == coordinate_column)
            .ok_or_else(|| format!("Frequency reference has no '{}' column", coordinate_column))?;

        let populations: Vec<String> = header
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != coord_idx)
            .map(|(_, c)| c.to_string())
            .collect();

        let mut rows = HashMap::new();
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

            let freqs: Vec<f64> = parts
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != coord_idx)
                .map(|(_, cell)| cell.trim().parse::<f64>().unwrap_or(0.0))
                .collect();

            rows.insert(parts[coord_idx].trim().to_string(), freqs);
        }

        println!(
            "✅ Frequency reference loaded: {} variants × {} populations",
            rows.len(),
            populations.len()
        );
        Ok(Self { populations, rows })
    }

    /// Maximum frequency across all population columns for a variant
    pub fn max_frequency(&self, variant: &Variant) -> PopulationFrequency {
        let Some(freqs) = self.rows.get(&variant.to_string()) else {
            return PopulationFrequency::absent();
        };

        let mut best = PopulationFrequency::absent();
        for (population, &frequency) in self.populations.iter().zip(freqs) {
            if frequency > best.frequency {
                best = PopulationFrequency {
                    frequency,
                    population: Some(population.clone()),
                };
            }
        }
        best
    }
}
