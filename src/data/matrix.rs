// matrix.rs - Cohort genotype matrix loader

use crate::data::variant::Variant;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// One locus row of the genotype matrix
#[derive(Debug, Clone)]
pub struct Locus {
    pub variant: Variant,
}

/// Columnar cohort genotype store: one row per locus, one column per
/// individual, each cell a diploid pair of allele-presence indicators.
/// Read-only after load; workers share it by reference.
#[derive(Debug)]
pub struct GenotypeMatrix {
    pub individuals: Vec<String>,
    pub loci: Vec<Locus>,
    /// cells[locus_index][individual_index] = (allele_1, allele_2)
    pub cells: Vec<Vec<(u8, u8)>>,
}

/// Parse a diploid cell like `0|1` (phased) or `1/0` (unphased) into
/// allele-presence bits. Missing calls (`.` on either side) are treated as
/// homozygous reference and filtered out downstream.
fn parse_cell(cell: &str) -> Result<(u8, u8), String> {
    let sep = if cell.contains('|') { '|' } else { '/' };
    let mut parts = cell.trim().split(sep);
    let a1 = parts.next().ok_or_else(|| format!("Empty genotype cell '{}'", cell))?;
    let a2 = parts
        .next()
        .ok_or_else(|| format!("Genotype cell '{}' is not diploid", cell))?;
    if parts.next().is_some() {
        return Err(format!("Genotype cell '{}' has more than two alleles", cell));
    }

    let parse_allele = |s: &str| -> Result<u8, String> {
        match s.trim() {
            "." => Ok(0),
            "0" => Ok(0),
            "1" => Ok(1),
            other => Err(format!("Invalid allele indicator '{}'", other)),
        }
    };

    Ok((parse_allele(a1)?, parse_allele(a2)?))
}

impl GenotypeMatrix {
    /// Load a tab-delimited genotype matrix. The first four columns are
    /// `chromosome`, `position`, `reference`, `alternate`; every remaining
    /// header column is an individual id and its cells are diploid pairs.
    pub fn from_file(file_path: &Path) -> Result<Self, String> {
        let file = File::open(file_path)
            .map_err(|e| format!("Failed to open genotype matrix '{}': {}", file_path.display(), e))?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        let header_line = lines
            .next()
            .ok_or("Empty genotype matrix")?
            .map_err(|e| format!("Failed to read header: {}", e))?;
        let header: Vec<&str> = header_line.split('\t').collect();
        if header.len() < 5 {
            return Err(
                "Genotype matrix header must have chromosome, position, reference, alternate and at least one individual".to_string(),
            );
        }

        let individuals: Vec<String> = header[4..].iter().map(|s| s.to_string()).collect();
        let mut loci = Vec::new();
        let mut cells = Vec::new();

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

            let chromosome: u32 = parts[0]
                .trim()
                .trim_start_matches("chr")
                .parse()
                .map_err(|_| format!("Invalid chromosome '{}' at line {}", parts[0], line_num + 2))?;
            let position: u64 = parts[1]
                .trim()
                .parse()
                .map_err(|_| format!("Invalid position '{}' at line {}", parts[1], line_num + 2))?;

            let variant = Variant::new(chromosome, position, parts[2].trim(), parts[3].trim());

            let mut row = Vec::with_capacity(individuals.len());
            for (i, cell) in parts[4..].iter().enumerate() {
                let pair = parse_cell(cell).map_err(|e| {
                    format!(
                        "Line {} individual '{}': {}",
                        line_num + 2,
                        individuals[i],
                        e
                    )
                })?;
                row.push(pair);
            }

            loci.push(Locus { variant });
            cells.push(row);
        }

        println!(
            "✅ Genotype matrix loaded: {} loci × {} individuals",
            loci.len(),
            individuals.len()
        );
        Ok(Self {
            individuals,
            loci,
            cells,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("0|1").unwrap(), (0, 1));
        assert_eq!(parse_cell("1/0").unwrap(), (1, 0));
        assert_eq!(parse_cell("1|1").unwrap(), (1, 1));
        assert_eq!(parse_cell("./.").unwrap(), (0, 0));
        assert!(parse_cell("2|0").is_err());
        assert!(parse_cell("1").is_err());
        assert!(parse_cell("0|1|1").is_err());
    }

    #[test]
    fn test_matrix_load() {
        let mut path = std::env::temp_dir();
        path.push(format!("cooccur_matrix_{}.tsv", std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "chromosome\tposition\treference\talternate\tind1\tind2").unwrap();
        writeln!(file, "13\t100\tA\tG\t0|1\t0|0").unwrap();
        writeln!(file, "chr13\t200\tC\tT\t1|1\t1|0").unwrap();
        let matrix = GenotypeMatrix::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(matrix.individuals, vec!["ind1", "ind2"]);
        assert_eq!(matrix.loci.len(), 2);
        assert_eq!(matrix.loci[1].variant.chromosome, 13);
        assert_eq!(matrix.cells[0][0], (0, 1));
        assert_eq!(matrix.cells[1][1], (1, 0));
    }

    #[test]
    fn test_lowercase_matrix_alleles_join_coordinate_keys() {
        let mut path = std::env::temp_dir();
        path.push(format!("cooccur_matrix_case_{}.tsv", std::process::id()));
        let mut file = File::create(&path).unwrap();
        writeln!(file, "chromosome\tposition\treference\talternate\tind1").unwrap();
        writeln!(file, "13\t100\ta\tg\t0|1").unwrap();
        let matrix = GenotypeMatrix::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        // Lowercase alleles must produce the same key a reference-table
        // coordinate parses to, or the row silently misclassifies as novel
        let expected = Variant::from_coordinate("chr13:g.100:A>G").unwrap();
        assert_eq!(matrix.loci[0].variant, expected);
    }
}
