use std::io::Write;

use anyhow::Result;
use clap::ArgMatches;
use tracing::info;

use cnars_core::GeneDatabase;
use cnars_core::utils::{get_dynamic_reader, get_dynamic_writer};
use cnars_io::{CoordinateRows, write_gene_list};

use crate::common;

pub fn run_regions2genes(matches: &ArgMatches) -> Result<()> {
    let input = common::required_path(matches, "input")?;
    let output = common::required_path(matches, "output")?;
    let delimiter = common::delimiter(matches);
    let item_delimiter = common::item_delimiter(matches);
    let db = common::open_gene_db(matches)?;

    let rows = CoordinateRows::from_reader(
        get_dynamic_reader(&input)?,
        &delimiter,
        matches.get_flag("coord-only"),
        matches.get_flag("header"),
    )?;

    let mut writer = get_dynamic_writer(&output)?;
    if let Some(header) = &rows.header {
        writeln!(writer, "{header}{delimiter}n{delimiter}genes")?;
    }

    for row in &rows.rows {
        let genes = db.genes(&row.region.region);
        let label = match &row.rest {
            Some(rest) => format!("{}{delimiter}{rest}", row.region),
            None => row.region.to_string(),
        };
        write_gene_list(&mut writer, &label, &genes, &delimiter, &item_delimiter)?;
    }
    writer.flush()?;

    info!("Annotated {} coordinates into {}", rows.rows.len(), output.display());

    Ok(())
}
