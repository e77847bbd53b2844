use anyhow::Result;
use clap::ArgMatches;
use tracing::info;

use cnars_core::utils::get_dynamic_writer;
use cnars_io::{ScoreMatrixWriter, open_regions};
use cnars_scoring::SegmentedSampleSet;

use crate::common;

pub fn run_regions2rmat(matches: &ArgMatches) -> Result<()> {
    let regions = common::required_path(matches, "regions")?;
    let segfile = common::required_path(matches, "segfile")?;
    let output = common::required_path(matches, "output")?;
    let delimiter = common::delimiter(matches);
    let config = common::scoring_config(matches)?;

    let regions = open_regions(&regions, &delimiter)?;
    let mut samples = SegmentedSampleSet::open(&segfile, Some(&config.filter))?;
    samples.prepare();

    let names: Vec<&str> = samples.names().collect();
    let mut matrix = ScoreMatrixWriter::new(get_dynamic_writer(&output)?, &delimiter, &names)?;

    let bar = common::progress_bar(matches, regions.len(), "regions")?;
    for region in &regions {
        bar.inc(1);
        matrix.write_row(region, &samples.region_scores(region, config.overlap))?;
    }
    bar.finish_and_clear();
    matrix.finish()?;

    info!("Wrote {} regions to {}", regions.len(), output.display());

    Ok(())
}
