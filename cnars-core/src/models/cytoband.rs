use std::io::BufRead;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{CnaError, Result};
use crate::models::region::Region;
use crate::utils::{get_dynamic_reader, numbered_lines, strip_chr_prefix};

// e.g. 1, 1q, chr1q, chr1q36, chr1q36.33
static CYTOBAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:chr)?(?P<chrom>\d+|X|Y)(?:(?P<arm>p|q)(?P<b1>\d+)?(?:\.(?P<b2>\d+)?)?)?")
        .expect("cytoband pattern is valid")
});

/// One row of a UCSC cytoband table. The chromosome is stored without `chr`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cytoband {
    pub chromosome: String,
    pub start: u32,
    pub end: u32,
    pub name: String,
    pub stain: String,
}

///
/// An ordered cytoband table, as shipped by UCSC in `cytoBand.txt`.
///
/// Rows are expected sorted by chromosome and position.
///
#[derive(Debug, Clone, Default)]
pub struct CytobandTable {
    pub bands: Vec<Cytoband>,
}

impl TryFrom<&Path> for CytobandTable {
    type Error = CnaError;

    fn try_from(value: &Path) -> Result<Self> {
        let table = Self::from_reader(get_dynamic_reader(value)?)?;
        log::info!("Loaded {} cytobands from {}", table.bands.len(), value.display());
        Ok(table)
    }
}

impl CytobandTable {
    ///
    /// Read `chrom, start, end, name, stain` rows (tab-delimited). A first line whose
    /// start column is not a number is taken as a header and skipped.
    ///
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut bands = Vec::new();

        for (line_no, line) in numbered_lines(reader) {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let cells: Vec<&str> = line.trim_end().split('\t').collect();
            if cells.len() < 4 {
                return Err(CnaError::Parse(format!(
                    "cytoband table line {line_no}: expected at least 4 columns"
                )));
            }

            let start = cells[1].parse::<u32>();
            if line_no == 1 && start.is_err() {
                continue;
            }
            let start = start.map_err(|_| {
                CnaError::Parse(format!("cytoband table line {line_no}: start {:?}", cells[1]))
            })?;
            let end = cells[2].parse::<u32>().map_err(|_| {
                CnaError::Parse(format!("cytoband table line {line_no}: end {:?}", cells[2]))
            })?;

            bands.push(Cytoband {
                chromosome: strip_chr_prefix(cells[0]).to_string(),
                start,
                end,
                name: cells[3].to_string(),
                stain: cells.get(4).unwrap_or(&"").to_string(),
            });
        }

        Ok(CytobandTable { bands })
    }

    ///
    /// Resolve a whole or partial cytoband name (`5`, `1q`, `3p21`, `chr4q31.1`) to the
    /// region spanning every matching band.
    ///
    /// A band matches when it lies on the chromosome and its name starts with the
    /// queried arm and sub-band. A bare sub-band number gets a trailing `.` before the
    /// comparison so that `q1` does not pick up `q10`. The result runs from the first
    /// match's start to the last match's end, so matches are assumed contiguous.
    ///
    pub fn resolve(&self, coord: &str) -> Result<Region> {
        let caps = CYTOBAND_RE
            .captures(coord)
            .ok_or_else(|| CnaError::InvalidCytoband(coord.to_string()))?;

        let chromosome = &caps["chrom"];
        let prefix = caps.name("arm").map(|arm| {
            let mut name = arm.as_str().to_string();
            if let Some(b1) = caps.name("b1") {
                name.push_str(b1.as_str());
                name.push('.');
                if let Some(b2) = caps.name("b2") {
                    name.push_str(b2.as_str());
                }
            }
            name
        });

        let mut matches = self.bands.iter().filter(|band| {
            band.chromosome == chromosome
                && prefix
                    .as_deref()
                    .is_none_or(|prefix| band.name.starts_with(prefix))
        });

        let first = matches
            .next()
            .ok_or_else(|| CnaError::InvalidCytoband(coord.to_string()))?;
        let last = matches.last().unwrap_or(first);

        Region::new(chromosome, first.start, last.end)
    }
}
