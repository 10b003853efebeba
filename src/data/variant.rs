// variant.rs - Variant key type, zygosity codes and classification

use regex::Regex;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single nucleotide variant identified by genomic coordinate and alleles.
/// Equality and hashing are by value; this is the map key used everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variant {
    pub chromosome: u32,
    pub position: u64,
    pub reference: String,
    pub alternate: String,
}

impl Variant {
    /// Alleles are uppercased on construction so keys built from the
    /// genotype matrix join with keys parsed from coordinate strings
    /// regardless of source casing
    pub fn new(chromosome: u32, position: u64, reference: &str, alternate: &str) -> Self {
        Self {
            chromosome,
            position,
            reference: reference.to_uppercase(),
            alternate: alternate.to_uppercase(),
        }
    }

    /// Parse a reference-table coordinate string: `chr<N>:g.<pos>:<ref>><alt>`
    pub fn from_coordinate(coord: &str) -> Result<Self, String> {
        // Compiled per call; table loading hoists one Regex and reuses it
        let re = coordinate_regex();
        Self::from_coordinate_with(&re, coord)
    }

    /// Parse using a pre-compiled coordinate regex (hot-loop variant)
    pub fn from_coordinate_with(re: &Regex, coord: &str) -> Result<Self, String> {
        let caps = re
            .captures(coord.trim())
            .ok_or_else(|| format!("Malformed coordinate string '{}'", coord))?;

        let chromosome: u32 = caps[1]
            .parse()
            .map_err(|_| format!("Invalid chromosome in '{}'", coord))?;
        let position: u64 = caps[2]
            .parse()
            .map_err(|_| format!("Invalid position in '{}'", coord))?;

        Ok(Self {
            chromosome,
            position,
            reference: caps[3].to_uppercase(),
            alternate: caps[4].to_uppercase(),
        })
    }
}

/// Regex matching `chr<N>:g.<pos>:<ref>><alt>` coordinate strings
pub fn coordinate_regex() -> Regex {
    Regex::new(r"^chr(\d+):g\.(\d+):([ACGTacgt]+)>([ACGTacgt]+)$")
        .expect("coordinate regex is valid")
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chr{}:g.{}:{}>{}",
            self.chromosome, self.position, self.reference, self.alternate
        )
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_coordinate(s)
    }
}

// Serialized as the coordinate string so report keys, partner lists and the
// cohort cache share one representation
impl Serialize for Variant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Variant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Variant::from_coordinate(&s).map_err(D::Error::custom)
    }
}

/// Clinical classification of a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    Benign,
    Pathogenic,
    Vus,
}

/// Zygosity code computed from the two per-copy allele-presence bits:
/// `code = 2*first + second`. Code 0 (homozygous reference) is filtered out
/// upstream and never attached to an individual. Codes 1 and 2 are
/// heterozygous and distinguish which copy carries the allele when the
/// genotypes are phased; code 3 is homozygous alternate.
pub fn zygosity_code(allele_1: u8, allele_2: u8) -> u8 {
    debug_assert!(allele_1 <= 1 && allele_2 <= 1);
    allele_1 * 2 + allele_2
}

pub const HOMOZYGOUS_ALT: u8 = 3;

pub fn is_heterozygous(code: u8) -> bool {
    code == 1 || code == 2
}

pub fn is_homozygous_alt(code: u8) -> bool {
    code == HOMOZYGOUS_ALT
}

/// One observed genotype: a variant plus the carrier's zygosity code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenotypeCall {
    pub variant: Variant,
    pub zygosity: u8,
}

impl GenotypeCall {
    pub fn new(variant: Variant, zygosity: u8) -> Self {
        Self { variant, zygosity }
    }
}
