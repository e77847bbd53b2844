//! Readers for plain region lists and for row-oriented files that get annotated with
//! gene names.

use std::io::BufRead;
use std::path::Path;

use fxhash::FxHashSet;

use cnars_core::errors::{CnaError, Result};
use cnars_core::models::{AberrantRegion, Region};
use cnars_core::utils::{get_dynamic_reader, numbered_lines};

///
/// Read a headerless `chr<N><delim><start><delim><end>` file, dropping repeated regions.
///
pub fn read_regions<R: BufRead>(reader: R, delimiter: &str) -> Result<Vec<Region>> {
    let mut seen = FxHashSet::default();
    let mut regions = Vec::new();

    for (line_no, line) in numbered_lines(reader) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.trim_end().split(delimiter).collect();
        if cells.len() < 3 {
            return Err(CnaError::Parse(format!(
                "regions line {line_no}: expected chromosome, start and end"
            )));
        }

        let chromosome = cells[0]
            .find("chr")
            .map(|i| &cells[0][i + 3..])
            .ok_or_else(|| {
                CnaError::Parse(format!(
                    "regions line {line_no}: chromosome {:?} lacks a chr prefix",
                    cells[0]
                ))
            })?;
        let number = |cell: &str| -> Result<u32> {
            cell.trim()
                .parse::<u32>()
                .map_err(|_| CnaError::Parse(format!("regions line {line_no}: {cell:?}")))
        };

        let region = Region::new(chromosome, number(cells[1])?, number(cells[2])?)?;
        if seen.insert(region.clone()) {
            regions.push(region);
        }
    }

    Ok(regions)
}

pub fn open_regions(path: &Path, delimiter: &str) -> Result<Vec<Region>> {
    let regions = read_regions(get_dynamic_reader(path)?, delimiter)?;
    log::info!("Read {} regions from {}", regions.len(), path.display());
    Ok(regions)
}

///
/// Rows of a coordinate-string file: each row's first field is a coordinate
/// (`chr3:100-200|G`), and the remaining fields are carried through untouched.
///
#[derive(Debug, Clone, Default)]
pub struct CoordinateRows {
    pub header: Option<String>,
    pub rows: Vec<CoordinateRow>,
}

#[derive(Debug, Clone)]
pub struct CoordinateRow {
    pub region: AberrantRegion,
    /// Everything after the first delimiter.
    pub rest: Option<String>,
}

impl CoordinateRows {
    ///
    /// # Arguments
    ///
    /// - delimiter: field delimiter
    /// - coord_only: every line is a single coordinate; no other fields are kept
    /// - header: the first line is a header to carry through
    ///
    pub fn from_reader<R: BufRead>(
        reader: R,
        delimiter: &str,
        coord_only: bool,
        header: bool,
    ) -> Result<Self> {
        let mut result = CoordinateRows::default();

        for (line_no, line) in numbered_lines(reader) {
            let line = line?;
            if header && line_no == 1 {
                result.header = Some(line.trim_end().to_string());
                continue;
            }

            let (coord, rest) = if coord_only {
                (line.trim(), None)
            } else {
                match line.split_once(delimiter) {
                    Some((coord, rest)) => (coord, Some(rest.trim_end().to_string())),
                    None => (line.trim_end(), None),
                }
            };
            if coord.is_empty() {
                continue;
            }

            result.rows.push(CoordinateRow {
                region: coord.parse()?,
                rest,
            });
        }

        Ok(result)
    }
}

///
/// Rows of a segmentation file kept verbatim alongside the region each one names.
///
/// Columns are `sample, chromosome, start, end, ...`.
///
#[derive(Debug, Clone, Default)]
pub struct SegmentRows {
    pub header: Option<String>,
    pub rows: Vec<(Region, String)>,
}

impl SegmentRows {
    pub fn from_reader<R: BufRead>(reader: R, delimiter: &str, header: bool) -> Result<Self> {
        let mut result = SegmentRows::default();

        for (line_no, line) in numbered_lines(reader) {
            let line = line?;
            let line = line.trim_end();
            if header && line_no == 1 {
                result.header = Some(line.to_string());
                continue;
            }
            if line.is_empty() {
                continue;
            }

            let cells: Vec<&str> = line.split(delimiter).collect();
            if cells.len() < 4 {
                return Err(CnaError::Parse(format!(
                    "segmentation line {line_no}: expected at least 4 columns"
                )));
            }
            let number = |cell: &str| -> Result<u32> {
                cell.trim().parse::<u32>().map_err(|_| {
                    CnaError::Parse(format!("segmentation line {line_no}: {cell:?}"))
                })
            };

            let region = Region::new(cells[1], number(cells[2])?, number(cells[3])?)?;
            result.rows.push((region, line.to_string()));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_read_regions_drops_duplicates() {
        let text = "chr7\t100\t200\nchr7\t100\t200\n\nchr12\t5\t9\n";
        let regions = read_regions(text.as_bytes(), "\t").unwrap();
        assert_eq!(
            regions,
            vec![
                Region::new("7", 100, 200).unwrap(),
                Region::new("12", 5, 9).unwrap()
            ]
        );
    }

    #[rstest]
    #[case("7\t100\t200\n")]
    #[case("chr7\t100\n")]
    #[case("chr7\tabc\t200\n")]
    fn test_read_regions_rejects(#[case] text: &str) {
        assert!(matches!(
            read_regions(text.as_bytes(), "\t"),
            Err(CnaError::Parse(_))
        ));
    }

    #[rstest]
    fn test_inverted_region_is_rejected() {
        let result = read_regions("chr7\t200\t100\n".as_bytes(), "\t");
        assert!(matches!(result, Err(CnaError::InvalidRegion { .. })));
    }

    #[rstest]
    fn test_coordinate_rows_keep_other_fields() {
        let text = "coord\tnote\nchr7:100-200|G\tpeak one\nchr12:5-9\tpeak two\n";
        let rows = CoordinateRows::from_reader(text.as_bytes(), "\t", false, true).unwrap();

        assert_eq!(rows.header.as_deref(), Some("coord\tnote"));
        assert_eq!(rows.rows.len(), 2);
        assert_eq!(rows.rows[0].region.to_string(), "chr7:100-200|G");
        assert_eq!(rows.rows[0].rest.as_deref(), Some("peak one"));
        assert_eq!(rows.rows[1].region.to_string(), "chr12:5-9|0");
        assert_eq!(rows.rows[1].region.state, 0.0);
    }

    #[rstest]
    fn test_coordinate_rows_coord_only() {
        let text = "chr7:100-200\n\nchr1:1-2|L\n";
        let rows = CoordinateRows::from_reader(text.as_bytes(), "\t", true, false).unwrap();
        assert_eq!(rows.header, None);
        assert_eq!(rows.rows.len(), 2);
        assert!(rows.rows.iter().all(|row| row.rest.is_none()));
    }

    #[rstest]
    fn test_segment_rows() {
        let text = "sample\tchromosome\tstart\tend\tcount\tstate\ns1\t7\t100\t200\t5\t0.5\n";
        let rows = SegmentRows::from_reader(text.as_bytes(), "\t", true).unwrap();
        assert_eq!(rows.rows.len(), 1);
        assert_eq!(rows.rows[0].0, Region::new("7", 100, 200).unwrap());
        assert_eq!(rows.rows[0].1, "s1\t7\t100\t200\t5\t0.5");
    }
}
