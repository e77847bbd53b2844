use anyhow::Result;
use clap::ArgMatches;
use tracing::info;

use cnars_core::utils::get_dynamic_writer;
use cnars_io::{Lesions, ScoreMatrixWriter};
use cnars_scoring::SegmentedSampleSet;

use crate::common;

pub fn run_gistic2rmat(matches: &ArgMatches) -> Result<()> {
    let lesions = common::required_path(matches, "lesions")?;
    let output = common::required_path(matches, "output")?;
    let segfile = common::optional_path(matches, "segfile");
    let delimiter = common::delimiter(matches);
    let config = common::scoring_config(matches)?;

    let lesions = Lesions::open(
        &lesions,
        &common::lesion_options(matches, segfile.is_none()),
    )?;
    let writer = get_dynamic_writer(&output)?;

    match segfile {
        Some(segfile) => {
            let mut samples = SegmentedSampleSet::open(&segfile, Some(&config.filter))?;
            samples.prepare();

            let names: Vec<&str> = samples.names().collect();
            let mut matrix = ScoreMatrixWriter::new(writer, &delimiter, &names)?;
            for lesion in &lesions.regions {
                matrix.write_row(lesion, &samples.region_scores(&lesion.region, config.overlap))?;
            }
            matrix.finish()?;
        }
        None => {
            let mut matrix = ScoreMatrixWriter::new(writer, &delimiter, &lesions.samples)?;
            for lesion in &lesions.regions {
                matrix.write_row(lesion, &lesion.samples)?;
            }
            matrix.finish()?;
        }
    }
    info!(
        "Wrote {} lesions to {}",
        lesions.regions.len(),
        output.display()
    );

    Ok(())
}
