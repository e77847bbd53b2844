//! Reader for GISTIC `all_lesions` files.

use std::io::BufRead;
use std::path::Path;

use fxhash::FxHashSet;

use cnars_core::errors::{CnaError, Result};
use cnars_core::models::{AberrantRegion, Region, parse_coordinate};
use cnars_core::utils::{get_dynamic_reader, numbered_lines};

pub const DEFAULT_REGION_COL: usize = 2;
pub const DEFAULT_SAMPLE_COL: usize = 12;

/// How to pick cells out of a lesions file.
#[derive(Debug, Clone)]
pub struct LesionOptions {
    pub delimiter: String,
    /// Column holding the lesion coordinate (`chr1:100-200(probes 3:9)`).
    pub region_col: usize,
    /// First column of per-sample statuses.
    pub sample_col: usize,
    /// Keep the per-sample statuses; needed when no segmentation file is given.
    pub with_samples: bool,
}

impl Default for LesionOptions {
    fn default() -> Self {
        LesionOptions {
            delimiter: "\t".to_string(),
            region_col: DEFAULT_REGION_COL,
            sample_col: DEFAULT_SAMPLE_COL,
            with_samples: false,
        }
    }
}

///
/// The distinct lesions of a GISTIC run.
///
/// Lesions are kept in file order; a row repeating an earlier lesion's coordinates
/// (GISTIC lists each peak once with thresholded and once with actual values) is
/// dropped.
///
#[derive(Debug, Clone, Default)]
pub struct Lesions {
    /// Sample names from the header, from the sample column onward.
    pub samples: Vec<String>,
    pub regions: Vec<AberrantRegion>,
}

impl Lesions {
    pub fn open(path: &Path, options: &LesionOptions) -> Result<Self> {
        let lesions = Self::from_reader(get_dynamic_reader(path)?, options)?;
        log::info!(
            "Read {} lesions from {}",
            lesions.regions.len(),
            path.display()
        );
        Ok(lesions)
    }

    pub fn from_reader<R: BufRead>(reader: R, options: &LesionOptions) -> Result<Self> {
        let delimiter = options.delimiter.as_str();
        let mut lines = numbered_lines(reader);

        let samples = match lines.next() {
            Some((_, header)) => header?
                .trim_end()
                .split(delimiter)
                .skip(options.sample_col)
                .map(str::to_string)
                .collect(),
            None => Vec::new(),
        };

        if options.with_samples && samples.is_empty() {
            return Err(CnaError::Parse(
                "lesions file has no sample status columns and no segmentation file was given"
                    .to_string(),
            ));
        }

        let mut seen: FxHashSet<Region> = FxHashSet::default();
        let mut regions = Vec::new();

        for (line_no, line) in lines {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let cells: Vec<&str> = line.trim_end().split(delimiter).collect();

            let state = if cells[0].contains("Amplification") {
                1.0
            } else if cells[0].contains("Deletion") {
                -1.0
            } else {
                0.0
            };

            let coord = cells.get(options.region_col).ok_or_else(|| {
                CnaError::Parse(format!(
                    "lesions line {line_no}: no region in column {}",
                    options.region_col
                ))
            })?;
            let (region, _) = parse_coordinate(coord.trim())?;

            if !seen.insert(region.clone()) {
                continue;
            }

            let mut lesion = AberrantRegion::new(region, state);
            if options.with_samples {
                lesion.samples = cells
                    .iter()
                    .skip(options.sample_col)
                    .map(|x| {
                        x.trim().parse::<i32>().map_err(|_| {
                            CnaError::Parse(format!("lesions line {line_no}: sample status {x:?}"))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
            }
            regions.push(lesion);
        }

        Ok(Lesions { samples, regions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn path() -> PathBuf {
        PathBuf::from("../tests/data/all_lesions.conf_90.txt")
    }

    #[rstest]
    fn test_read_lesions_with_samples(path: PathBuf) {
        let options = LesionOptions {
            with_samples: true,
            ..Default::default()
        };
        let lesions = Lesions::open(&path, &options).unwrap();

        assert_eq!(lesions.samples, vec!["s1", "s2", "s3"]);
        assert_eq!(lesions.regions.len(), 3);

        let first = &lesions.regions[0];
        assert_eq!(first.to_string(), "chr7:100000-200000|G");
        assert_eq!(first.region.count(), 25);
        assert_eq!(first.samples, vec![2, 0, 0]);

        let deletion = &lesions.regions[1];
        assert_eq!(deletion.state, -1.0);
        assert_eq!(deletion.samples, vec![1, 2, 0]);
    }

    #[rstest]
    fn test_actual_value_rows_are_dropped(path: PathBuf) {
        // the "- CN values" rows repeat each peak with float statuses
        let lesions = Lesions::open(&path, &LesionOptions::default()).unwrap();
        assert_eq!(lesions.regions.len(), 3);
        assert!(lesions.regions.iter().all(|r| r.samples.is_empty()));
    }

    #[rstest]
    fn test_missing_sample_columns() {
        let text = "Unique Name\tDescriptor\tWide Peak Limits\nAmplification Peak 1\t7q\tchr7:1-9\n";
        let options = LesionOptions {
            with_samples: true,
            ..Default::default()
        };
        assert!(Lesions::from_reader(text.as_bytes(), &options).is_err());
    }

    #[rstest]
    fn test_custom_columns() {
        let text = "name,region,a,b\nDeletion Peak 1,chr3:10-20,1,0\nSomething,chr3:30-40,0,0\n";
        let options = LesionOptions {
            delimiter: ",".to_string(),
            region_col: 1,
            sample_col: 2,
            with_samples: true,
        };
        let lesions = Lesions::from_reader(text.as_bytes(), &options).unwrap();
        assert_eq!(lesions.samples, vec!["a", "b"]);
        assert_eq!(lesions.regions[0].state, -1.0);
        assert_eq!(lesions.regions[1].state, 0.0);
        assert_eq!(lesions.regions[1].samples, vec![0, 0]);
    }
}
