//! UCSC gene tables loaded from their flat-file dumps.
//!
//! Two schemas are understood: `refGene.txt`, where the gene symbol is the `name2`
//! column, and `knownGene.txt`, whose transcripts are named by UCSC ids and get their
//! symbol from `kgXref.txt`.

use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use fxhash::{FxHashMap, FxHashSet};

use cnars_core::errors::{CnaError, Result};
use cnars_core::models::Region;
use cnars_core::utils::{get_dynamic_reader, numbered_lines, strip_chr_prefix};
use cnars_core::{GeneDatabase, TranscriptRecord};
use cnars_overlaprs::{GenomeIndex, Interval};

/// Which UCSC gene table a dump follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
    KnownGene,
    RefGene,
}

/// 0-based column positions of one schema.
#[derive(Debug, Clone, Copy)]
struct Layout {
    name: usize,
    chrom: usize,
    strand: usize,
    tx_start: usize,
    tx_end: usize,
    cds_start: usize,
    cds_end: usize,
    exon_count: usize,
    exon_starts: usize,
    exon_ends: usize,
    symbol: Option<usize>,
}

impl Layout {
    fn width(&self) -> usize {
        [
            self.name,
            self.chrom,
            self.strand,
            self.tx_start,
            self.tx_end,
            self.cds_start,
            self.cds_end,
            self.exon_count,
            self.exon_starts,
            self.exon_ends,
            self.symbol.unwrap_or(0),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
            + 1
    }
}

const REF_GENE: Layout = Layout {
    name: 1,
    chrom: 2,
    strand: 3,
    tx_start: 4,
    tx_end: 5,
    cds_start: 6,
    cds_end: 7,
    exon_count: 8,
    exon_starts: 9,
    exon_ends: 10,
    symbol: Some(12),
};

const KNOWN_GENE: Layout = Layout {
    name: 0,
    chrom: 1,
    strand: 2,
    tx_start: 3,
    tx_end: 4,
    cds_start: 5,
    cds_end: 6,
    exon_count: 7,
    exon_starts: 8,
    exon_ends: 9,
    symbol: None,
};

// kgXref: kgID is column 0, geneSymbol column 4
const XREF_ID: usize = 0;
const XREF_SYMBOL: usize = 4;

impl SchemaKind {
    fn layout(&self) -> Layout {
        match self {
            SchemaKind::KnownGene => KNOWN_GENE,
            SchemaKind::RefGene => REF_GENE,
        }
    }

    /// Whether transcripts need a `kgXref` table to get a gene symbol.
    pub fn needs_xref(&self) -> bool {
        matches!(self, SchemaKind::KnownGene)
    }
}

impl FromStr for SchemaKind {
    type Err = CnaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "knownGene" => Ok(SchemaKind::KnownGene),
            "refGene" => Ok(SchemaKind::RefGene),
            _ => Err(CnaError::Configuration(format!(
                "unsupported gene database schema {s:?} (expected knownGene or refGene)"
            ))),
        }
    }
}

///
/// An in-memory gene annotation table answering [`GeneDatabase`] queries.
///
/// Transcript spans are indexed per chromosome; gene lists come back distinct and in
/// the order the transcripts appear in the source file.
///
#[derive(Debug)]
pub struct AnnotationTable {
    schema: SchemaKind,
    transcripts: Vec<TranscriptRecord>,
    by_gene: FxHashMap<String, Vec<usize>>,
    index: GenomeIndex<usize>,
}

impl AnnotationTable {
    ///
    /// Load a gene table dump, gzip'd or not.
    ///
    /// # Arguments
    ///
    /// - schema: which UCSC table the file holds
    /// - path: the `refGene.txt` / `knownGene.txt` dump
    /// - xref: the `kgXref.txt` dump; required for `knownGene`
    ///
    pub fn open(schema: SchemaKind, path: &Path, xref: Option<&Path>) -> Result<Self> {
        let symbols = match (schema.needs_xref(), xref) {
            (true, Some(xref)) => Some(read_xref(get_dynamic_reader(xref)?)?),
            (true, None) => {
                return Err(CnaError::Configuration(
                    "knownGene tables need a kgXref table for gene symbols".to_string(),
                ));
            }
            (false, _) => None,
        };

        let table = Self::from_reader(schema, get_dynamic_reader(path)?, symbols.as_ref())?;
        log::info!(
            "Loaded {} transcripts of {} genes from {}",
            table.transcripts.len(),
            table.by_gene.len(),
            path.display()
        );
        Ok(table)
    }

    ///
    /// Parse a gene table from a reader.
    ///
    /// `symbols` maps transcript ids to gene symbols and is consulted only for
    /// schemas without a symbol column; transcripts missing from it are dropped.
    ///
    pub fn from_reader<R: BufRead>(
        schema: SchemaKind,
        reader: R,
        symbols: Option<&FxHashMap<String, String>>,
    ) -> Result<Self> {
        let layout = schema.layout();
        let mut transcripts: Vec<TranscriptRecord> = Vec::new();
        let mut by_gene: FxHashMap<String, Vec<usize>> = FxHashMap::default();

        for (line_no, line) in numbered_lines(reader) {
            let line = line?;
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let cells: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
            if cells.len() < layout.width() {
                return Err(CnaError::Parse(format!(
                    "gene table line {line_no}: expected at least {} columns, found {}",
                    layout.width(),
                    cells.len()
                )));
            }

            let symbol = match layout.symbol {
                Some(col) => cells[col].to_string(),
                None => match symbols.and_then(|s| s.get(cells[layout.name])) {
                    Some(symbol) => symbol.clone(),
                    None => {
                        log::debug!("no gene symbol for transcript {}", cells[layout.name]);
                        continue;
                    }
                },
            };

            let number = |col: usize| -> Result<u32> {
                cells[col].parse::<u32>().map_err(|_| {
                    CnaError::Parse(format!(
                        "gene table line {line_no}: column {col} is not a coordinate: {:?}",
                        cells[col]
                    ))
                })
            };

            let record = TranscriptRecord {
                name: symbol,
                chromosome: strip_chr_prefix(cells[layout.chrom]).to_string(),
                strand: cells[layout.strand].to_string(),
                tx_start: number(layout.tx_start)?,
                tx_end: number(layout.tx_end)?,
                cds_start: number(layout.cds_start)?,
                cds_end: number(layout.cds_end)?,
                exon_count: number(layout.exon_count)?,
                exon_starts: cells[layout.exon_starts].to_string(),
                exon_ends: cells[layout.exon_ends].to_string(),
            };

            if record.tx_start > record.tx_end {
                return Err(CnaError::InvalidRegion {
                    chromosome: record.chromosome,
                    start: record.tx_start,
                    end: record.tx_end,
                });
            }

            // identical rows collapse into one transcript
            let entries = by_gene.entry(record.name.clone()).or_default();
            if entries.iter().any(|&i| transcripts[i] == record) {
                continue;
            }
            entries.push(transcripts.len());
            transcripts.push(record);
        }

        let index = GenomeIndex::build(transcripts.iter().enumerate().map(|(i, record)| {
            (
                record.chromosome.clone(),
                Interval {
                    start: record.tx_start,
                    end: record.tx_end,
                    val: i,
                },
            )
        }));

        Ok(AnnotationTable {
            schema,
            transcripts,
            by_gene,
            index,
        })
    }

    pub fn schema(&self) -> SchemaKind {
        self.schema
    }

    /// Number of distinct transcripts.
    pub fn len(&self) -> usize {
        self.transcripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }

    /// Distinct gene names of the given transcripts, in source order.
    fn distinct_genes(&self, mut ids: Vec<usize>) -> Vec<String> {
        ids.sort_unstable();
        let mut seen = FxHashSet::default();
        ids.into_iter()
            .map(|i| &self.transcripts[i].name)
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }
}

impl GeneDatabase for AnnotationTable {
    fn transcripts(&self, gene: &str) -> Vec<TranscriptRecord> {
        self.by_gene
            .get(gene)
            .map(|ids| ids.iter().map(|&i| self.transcripts[i].clone()).collect())
            .unwrap_or_default()
    }

    fn genes(&self, region: &Region) -> Vec<String> {
        let ids = self
            .index
            .find_iter(
                strip_chr_prefix(region.chromosome()),
                region.start(),
                region.end(),
            )
            .map(|iv| iv.val)
            .collect();
        self.distinct_genes(ids)
    }

    fn genome(&self) -> Vec<String> {
        self.distinct_genes((0..self.transcripts.len()).collect())
    }

    fn genes_on_chromosome(&self, chromosome: &str) -> Vec<String> {
        let chromosome = strip_chr_prefix(chromosome);
        let ids = self
            .transcripts
            .iter()
            .enumerate()
            .filter(|(_, record)| record.chromosome == chromosome)
            .map(|(i, _)| i)
            .collect();
        self.distinct_genes(ids)
    }
}

///
/// Read a `kgXref` table into a transcript id to gene symbol map.
///
pub fn read_xref<R: BufRead>(reader: R) -> Result<FxHashMap<String, String>> {
    let mut symbols = FxHashMap::default();
    for (line_no, line) in numbered_lines(reader) {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        let cells: Vec<&str> = line.split('\t').collect();
        let (Some(id), Some(symbol)) = (cells.get(XREF_ID), cells.get(XREF_SYMBOL)) else {
            return Err(CnaError::Parse(format!(
                "kgXref line {line_no}: expected at least {} columns",
                XREF_SYMBOL + 1
            )));
        };
        symbols
            .entry(id.to_string())
            .or_insert_with(|| symbol.trim().to_string());
    }
    Ok(symbols)
}
