use anyhow::Result;
use clap::ArgMatches;
use tracing::{info, warn};

use cnars_core::GeneDatabase;
use cnars_core::models::GeneRegion;
use cnars_core::utils::get_dynamic_writer;
use cnars_io::ScoreMatrixWriter;
use cnars_scoring::SegmentedSampleSet;

use crate::common;

pub fn run_seg2mat(matches: &ArgMatches) -> Result<()> {
    let segfile = common::required_path(matches, "segfile")?;
    let output = common::required_path(matches, "output")?;
    let delimiter = common::delimiter(matches);
    let config = common::scoring_config(matches)?;
    let db = common::open_gene_db(matches)?;

    let mut samples = SegmentedSampleSet::open(&segfile, Some(&config.filter))?;
    samples.prepare();

    let genes = match matches.get_one::<String>("chromosome") {
        Some(chromosome) => db.genes_on_chromosome(chromosome),
        None => db.genome(),
    };
    info!("Scoring {} genes in {} samples", genes.len(), samples.len());

    let strict = config.coverage.strict();
    let options = config.coverage.options();
    let names: Vec<&str> = samples.names().collect();
    let mut matrix = ScoreMatrixWriter::new(get_dynamic_writer(&output)?, &delimiter, &names)?;

    let bar = common::progress_bar(matches, genes.len(), "genes")?;
    let mut skipped = 0;
    for name in &genes {
        bar.inc(1);
        let gene = GeneRegion::from_database(name, &db)?;

        let scores = if strict {
            let exons = if options.use_cds {
                gene.coding_exons()
            } else {
                gene.exons()
            };
            if exons.is_empty() {
                skipped += 1;
                continue;
            }
            samples.gene_scores(&gene, &options)?
        } else {
            samples.gene_scores_relaxed(&gene)
        };
        matrix.write_row(name, &scores)?;
    }
    bar.finish_and_clear();
    matrix.finish()?;

    if skipped > 0 {
        warn!("Skipped {skipped} genes without exons to measure coverage over");
    }
    info!("Wrote {} genes to {}", genes.len() - skipped, output.display());

    Ok(())
}
