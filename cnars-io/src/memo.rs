//! GISTIC peaks in the layout the MEMO mutual exclusivity tool reads.

use std::io::{BufRead, Write};
use std::path::Path;

use cnars_core::GeneDatabase;
use cnars_core::errors::{CnaError, Result};
use cnars_core::models::Region;
use cnars_core::utils::{get_dynamic_reader, numbered_lines};

pub const DEFAULT_PEAK_ATTR: &str = "Peak Limits";
pub const DEFAULT_WIDE_PEAK_ATTR: &str = "Wide Peak Limits";
pub const DEFAULT_REGION_ATTR: &str = "Region Limits";

/// MEMO column names. The last three are part of the format but left empty.
pub const MEMO_HEADER: [&str; 15] = [
    "index",
    "chromosome",
    "region_start",
    "region_end",
    "peak_start",
    "peak_end",
    "enlarged_peak_start",
    "enlarged_peak_end",
    "n_genes_in_region",
    "genes_in_region",
    "n_genes_in_peak",
    "genes_in_peak",
    "n_genes_on_chip",
    "genes_on_chip",
    "top 3",
];

/// Header names of the three limit columns of a lesions file.
#[derive(Debug, Clone)]
pub struct PeakColumns {
    pub peak: String,
    pub wide_peak: String,
    pub region: String,
}

impl Default for PeakColumns {
    fn default() -> Self {
        PeakColumns {
            peak: DEFAULT_PEAK_ATTR.to_string(),
            wide_peak: DEFAULT_WIDE_PEAK_ATTR.to_string(),
            region: DEFAULT_REGION_ATTR.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LesionPeak {
    pub peak: Region,
    pub wide_peak: Region,
    pub region: Region,
}

///
/// Distinct peaks of a GISTIC lesions file, split by direction.
///
/// A row whose peak repeats an earlier peak of the same direction is dropped; rows
/// that are neither amplifications nor deletions are skipped.
///
#[derive(Debug, Clone, Default)]
pub struct LesionPeaks {
    pub amplifications: Vec<LesionPeak>,
    pub deletions: Vec<LesionPeak>,
}

impl LesionPeaks {
    pub fn open(path: &Path, delimiter: &str, columns: &PeakColumns) -> Result<Self> {
        let peaks = Self::from_reader(get_dynamic_reader(path)?, delimiter, columns)?;
        log::info!(
            "Read {} amplified and {} deleted peaks from {}",
            peaks.amplifications.len(),
            peaks.deletions.len(),
            path.display()
        );
        Ok(peaks)
    }

    pub fn from_reader<R: BufRead>(reader: R, delimiter: &str, columns: &PeakColumns) -> Result<Self> {
        let mut lines = numbered_lines(reader);

        let header = match lines.next() {
            Some((_, header)) => header?,
            None => return Ok(LesionPeaks::default()),
        };
        let names: Vec<&str> = header.trim_end().split(delimiter).collect();
        let column = |name: &str| -> Result<usize> {
            names.iter().position(|n| *n == name).ok_or_else(|| {
                CnaError::Parse(format!("lesions header has no {name:?} column"))
            })
        };
        let (peak_col, wide_peak_col, region_col) = (
            column(columns.peak.as_str())?,
            column(columns.wide_peak.as_str())?,
            column(columns.region.as_str())?,
        );

        let mut peaks = LesionPeaks::default();
        for (line_no, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.trim_end().split(delimiter).collect();

            let target = if cells[0].contains("Amplification") {
                &mut peaks.amplifications
            } else if cells[0].contains("Deletion") {
                &mut peaks.deletions
            } else {
                log::warn!("lesions line {line_no}: neither an amplification nor a deletion");
                continue;
            };

            let region_at = |col: usize| -> Result<Region> {
                cells
                    .get(col)
                    .ok_or_else(|| {
                        CnaError::Parse(format!("lesions line {line_no}: no column {col}"))
                    })?
                    .trim()
                    .parse()
            };
            let peak = LesionPeak {
                peak: region_at(peak_col)?,
                wide_peak: region_at(wide_peak_col)?,
                region: region_at(region_col)?,
            };

            if !target.iter().any(|p| p.peak == peak.peak) {
                target.push(peak);
            }
        }

        Ok(peaks)
    }
}

///
/// Write peaks as a MEMO file: one numbered row per peak with its region, peak and
/// wide peak bounds, and the genes of the region and of the wide peak.
///
pub fn write_memo<W, D>(
    writer: &mut W,
    peaks: &[LesionPeak],
    db: &D,
    delimiter: &str,
    item_delimiter: &str,
) -> Result<()>
where
    W: Write + ?Sized,
    D: GeneDatabase + ?Sized,
{
    writeln!(writer, "{}", MEMO_HEADER.join(delimiter))?;

    for (i, peak) in peaks.iter().enumerate() {
        let region_genes = db.genes(&peak.region);
        let wide_peak_genes = db.genes(&peak.wide_peak);

        let cells = [
            (i + 1).to_string(),
            peak.peak.chromosome().to_string(),
            peak.region.start().to_string(),
            peak.region.end().to_string(),
            peak.peak.start().to_string(),
            peak.peak.end().to_string(),
            peak.wide_peak.start().to_string(),
            peak.wide_peak.end().to_string(),
            region_genes.len().to_string(),
            region_genes.join(item_delimiter),
            wide_peak_genes.len().to_string(),
            wide_peak_genes.join(item_delimiter),
        ];
        writeln!(writer, "{}", cells.join(delimiter))?;
    }

    Ok(())
}
