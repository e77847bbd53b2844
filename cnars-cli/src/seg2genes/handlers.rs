use std::io::Write;

use anyhow::Result;
use clap::ArgMatches;
use tracing::info;

use cnars_core::GeneDatabase;
use cnars_core::utils::{get_dynamic_reader, get_dynamic_writer};
use cnars_io::{SegmentRows, write_gene_list};

use crate::common;

pub fn run_seg2genes(matches: &ArgMatches) -> Result<()> {
    let input = common::required_path(matches, "input")?;
    let output = common::required_path(matches, "output")?;
    let delimiter = common::delimiter(matches);
    let item_delimiter = common::item_delimiter(matches);
    let db = common::open_gene_db(matches)?;

    let segments = SegmentRows::from_reader(
        get_dynamic_reader(&input)?,
        &delimiter,
        !matches.get_flag("no-header"),
    )?;

    let mut writer = get_dynamic_writer(&output)?;
    if let Some(header) = &segments.header {
        writeln!(writer, "{header}{delimiter}ngenes{delimiter}genes")?;
    }

    let bar = common::progress_bar(matches, segments.rows.len(), "segments")?;
    for (region, line) in &segments.rows {
        bar.inc(1);
        let genes = db.genes(region);
        write_gene_list(&mut writer, line, &genes, &delimiter, &item_delimiter)?;
    }
    bar.finish_and_clear();
    writer.flush()?;

    info!("Annotated {} segments into {}", segments.rows.len(), output.display());

    Ok(())
}
