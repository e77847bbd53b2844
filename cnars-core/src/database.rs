//! The query contract the scoring engine needs from a gene annotation source.

use crate::models::Region;

///
/// One transcript as stored in a UCSC-style gene table.
///
/// `exon_starts` and `exon_ends` are the raw comma-separated coordinate lists
/// (`"100,300,"`), aligned by index and sorted ascending.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRecord {
    pub name: String,
    pub chromosome: String,
    pub strand: String,
    pub tx_start: u32,
    pub tx_end: u32,
    pub cds_start: u32,
    pub cds_end: u32,
    pub exon_count: u32,
    pub exon_starts: String,
    pub exon_ends: String,
}

///
/// A read-only gene annotation source.
///
/// Implementations are passed explicitly to whatever needs them and may be shared
/// between threads.
///
pub trait GeneDatabase: Send + Sync {
    /// All transcripts recorded under a gene name, in source order. Empty when the
    /// gene is unknown.
    fn transcripts(&self, gene: &str) -> Vec<TranscriptRecord>;

    /// Distinct names of genes whose transcript span overlaps `region` to any extent
    /// (`tx_start <= region.end && tx_end >= region.start`).
    fn genes(&self, region: &Region) -> Vec<String>;

    /// Distinct names of every gene in the source.
    fn genome(&self) -> Vec<String>;

    /// Distinct names of every gene on one chromosome (with or without `chr` prefix).
    fn genes_on_chromosome(&self, chromosome: &str) -> Vec<String>;
}
