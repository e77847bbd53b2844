//! Arguments and argument handling shared between subcommands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, arg, value_parser};
use indicatif::{ProgressBar, ProgressStyle};

use cnars_io::{AnnotationTable, DEFAULT_REGION_COL, DEFAULT_SAMPLE_COL, LesionOptions, SchemaKind};
use cnars_scoring::ScoringConfig;

pub const DEFAULT_DELIMITER: &str = "\t";
pub const DEFAULT_ITEM_DELIMITER: &str = ",";
pub const DEFAULT_GENES_DB: &str = "refGene.txt";
pub const DEFAULT_SCHEMA: &str = "refGene";

pub fn delimiter_arg() -> Arg {
    arg!(--delimiter <delimiter> "Field delimiter of input and output files")
        .default_value(DEFAULT_DELIMITER)
}

pub fn item_delimiter_arg() -> Arg {
    arg!(--"item-delimiter" <delimiter> "Delimiter between the genes of a gene list")
        .default_value(DEFAULT_ITEM_DELIMITER)
}

pub fn gene_db_args() -> [Arg; 3] {
    [
        arg!(--"genes-db" <path> "UCSC gene table dump (optionally gzip'd)")
            .default_value(DEFAULT_GENES_DB),
        arg!(--schema <schema> "Layout of the gene table")
            .value_parser(["refGene", "knownGene"])
            .default_value(DEFAULT_SCHEMA),
        arg!(--xref <path> "kgXref table mapping knownGene transcripts to gene symbols"),
    ]
}

pub fn lesion_args() -> [Arg; 2] {
    [
        arg!(--"region-col" <column> "Column of the lesions file holding the peak region")
            .value_parser(value_parser!(usize))
            .default_value("2"),
        arg!(--"sample-col" <column> "First column of per-sample statuses in the lesions file")
            .value_parser(value_parser!(usize))
            .default_value("12"),
    ]
}

/// Segment classification thresholds and the file they may come from.
pub fn filter_args() -> Vec<Arg> {
    vec![
        arg!(--config <path> "TOML file of scoring thresholds; flags override it"),
        arg!(--gain <state> "Log2 ratio above which a segment is gained")
            .value_parser(value_parser!(f64)),
        arg!(--loss <state> "Log2 ratio below which a segment is lost")
            .value_parser(value_parser!(f64))
            .allow_negative_numbers(true),
        arg!(--"gain-high" <state> "Log2 ratio above which a gain is high level")
            .value_parser(value_parser!(f64)),
        arg!(--"loss-high" <state> "Log2 ratio below which a loss is high level")
            .value_parser(value_parser!(f64))
            .allow_negative_numbers(true),
        arg!(--"gain-size" <bases> "Gains shorter than this are focal")
            .value_parser(value_parser!(f64)),
        arg!(--"loss-size" <bases> "Losses shorter than this are focal")
            .value_parser(value_parser!(f64)),
    ]
}

pub fn coverage_args() -> Vec<Arg> {
    vec![
        arg!(--"exons-only" "Score genes on how much of their exons a segment covers")
            .action(clap::ArgAction::SetTrue),
        arg!(--"cds-only" "Score genes on how much of their coding exons a segment covers")
            .action(clap::ArgAction::SetTrue),
        arg!(--"gain-covered" <fraction> "Exon fraction a gain must cover to count")
            .value_parser(value_parser!(f64)),
        arg!(--"loss-covered" <fraction> "Exon fraction a loss must cover to count")
            .value_parser(value_parser!(f64)),
    ]
}

pub fn overlap_arg() -> Arg {
    arg!(--overlap <fraction> "Fraction of a region a segment must exceed to count")
        .value_parser(value_parser!(f64))
}

pub fn required_path(matches: &ArgMatches, id: &str) -> Result<PathBuf> {
    matches
        .get_one::<String>(id)
        .map(PathBuf::from)
        .with_context(|| format!("A path for {id} is required."))
}

pub fn optional_path(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
    matches
        .try_get_one::<String>(id)
        .ok()
        .flatten()
        .map(PathBuf::from)
}

pub fn delimiter(matches: &ArgMatches) -> String {
    string_or(matches, "delimiter", DEFAULT_DELIMITER)
}

pub fn item_delimiter(matches: &ArgMatches) -> String {
    string_or(matches, "item-delimiter", DEFAULT_ITEM_DELIMITER)
}

fn string_or(matches: &ArgMatches, id: &str, default: &str) -> String {
    matches
        .try_get_one::<String>(id)
        .ok()
        .flatten()
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

fn float(matches: &ArgMatches, id: &str) -> Option<f64> {
    matches.try_get_one::<f64>(id).ok().flatten().copied()
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

///
/// Scoring thresholds: defaults, overridden by `--config`, overridden by individual
/// flags. Flags a subcommand does not define are ignored.
///
pub fn scoring_config(matches: &ArgMatches) -> Result<ScoringConfig> {
    let mut config = match matches.try_get_one::<String>("config").ok().flatten() {
        Some(path) => ScoringConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load scoring config {path}"))?,
        None => ScoringConfig::default(),
    };

    let filter = &mut config.filter;
    for (id, field) in [
        ("gain", &mut filter.gain),
        ("loss", &mut filter.loss),
        ("gain-high", &mut filter.gain_high),
        ("loss-high", &mut filter.loss_high),
        ("gain-size", &mut filter.gain_size),
        ("loss-size", &mut filter.loss_size),
    ] {
        if let Some(value) = float(matches, id) {
            *field = value;
        }
    }

    let coverage = &mut config.coverage;
    coverage.exons_only |= flag(matches, "exons-only");
    coverage.cds_only |= flag(matches, "cds-only");
    if let Some(value) = float(matches, "gain-covered") {
        coverage.gain = value;
    }
    if let Some(value) = float(matches, "loss-covered") {
        coverage.loss = value;
    }

    if let Some(value) = float(matches, "overlap") {
        config.overlap = value;
    }

    config.validate()?;
    tracing::debug!("Scoring with {config:?}");

    Ok(config)
}

pub fn open_gene_db(matches: &ArgMatches) -> Result<AnnotationTable> {
    let path = optional_path(matches, "genes-db").unwrap_or_else(|| PathBuf::from(DEFAULT_GENES_DB));
    let schema: SchemaKind = string_or(matches, "schema", DEFAULT_SCHEMA).parse()?;
    let xref = optional_path(matches, "xref");

    let db = AnnotationTable::open(schema, &path, xref.as_deref())
        .with_context(|| format!("Failed to load gene table {}", path.display()))?;
    Ok(db)
}

pub fn lesion_options(matches: &ArgMatches, with_samples: bool) -> LesionOptions {
    LesionOptions {
        delimiter: delimiter(matches),
        region_col: matches
            .get_one::<usize>("region-col")
            .copied()
            .unwrap_or(DEFAULT_REGION_COL),
        sample_col: matches
            .get_one::<usize>("sample-col")
            .copied()
            .unwrap_or(DEFAULT_SAMPLE_COL),
        with_samples,
    }
}

/// A progress bar over `len` items, hidden under `--quiet`.
pub fn progress_bar(matches: &ArgMatches, len: usize, message: &'static str) -> Result<ProgressBar> {
    if matches.get_flag("quiet") {
        return Ok(ProgressBar::hidden());
    }

    let bar = ProgressBar::new(len as u64);
    bar.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
    )?);
    bar.set_message(message);
    Ok(bar)
}
