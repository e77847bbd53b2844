use std::io::Write;

use anyhow::Result;
use clap::ArgMatches;
use tracing::info;

use cnars_core::GeneDatabase;
use cnars_core::utils::get_dynamic_writer;
use cnars_io::{Lesions, ScoreMatrixWriter, write_gene_list};
use cnars_scoring::SegmentedSampleSet;

use crate::common;

pub fn run_gistic2mat(matches: &ArgMatches) -> Result<()> {
    let lesions = common::required_path(matches, "lesions")?;
    let output = common::required_path(matches, "output")?;
    let segfile = common::optional_path(matches, "segfile");
    let genefile = common::optional_path(matches, "genefile");
    let delimiter = common::delimiter(matches);
    let config = common::scoring_config(matches)?;
    let db = common::open_gene_db(matches)?;

    let lesions = Lesions::open(
        &lesions,
        &common::lesion_options(matches, segfile.is_none()),
    )?;

    let bar = common::progress_bar(matches, lesions.regions.len(), "lesions")?;
    let mut lesion_genes: Vec<(String, Vec<String>)> = Vec::with_capacity(lesions.regions.len());

    match segfile {
        Some(segfile) => {
            let mut samples = SegmentedSampleSet::open(&segfile, Some(&config.filter))?;
            samples.prepare();

            let names: Vec<&str> = samples.names().collect();
            let mut matrix =
                ScoreMatrixWriter::new(get_dynamic_writer(&output)?, &delimiter, &names)?;
            let options = config.coverage.options();

            for lesion in &lesions.regions {
                bar.inc(1);
                let scores = if config.coverage.strict() {
                    samples.scores(&lesion.region, &db, None, &options)?
                } else {
                    samples.scores_relaxed(&lesion.region, &db)
                };
                for (gene, row) in &scores {
                    matrix.write_row(gene, row)?;
                }
                lesion_genes.push((lesion.to_string(), scores.into_keys().collect()));
            }
            matrix.finish()?;
        }
        None => {
            let mut matrix =
                ScoreMatrixWriter::new(get_dynamic_writer(&output)?, &delimiter, &lesions.samples)?;

            for lesion in &lesions.regions {
                bar.inc(1);
                let genes = db.genes(&lesion.region);
                for gene in &genes {
                    matrix.write_row(gene, &lesion.samples)?;
                }
                lesion_genes.push((lesion.to_string(), genes));
            }
            matrix.finish()?;
        }
    }
    bar.finish_and_clear();
    info!(
        "Wrote {} lesions to {}",
        lesions.regions.len(),
        output.display()
    );

    if let Some(genefile) = genefile {
        let item_delimiter = common::item_delimiter(matches);
        let mut writer = get_dynamic_writer(&genefile)?;
        for (label, genes) in &lesion_genes {
            write_gene_list(&mut writer, label, genes, &delimiter, &item_delimiter)?;
        }
        writer.flush()?;
        info!("Wrote lesion genes to {}", genefile.display());
    }

    Ok(())
}
