use std::collections::BTreeMap;
use std::sync::OnceLock;

use cnars_core::errors::Result;
use cnars_core::models::{AberrantRegion, GeneRegion, Region};
use cnars_core::GeneDatabase;
use cnars_overlaprs::{GenomeIndex, Interval};

use crate::cna_filter::CnaFilter;
use crate::consts::{DEFAULT_GAIN_COVERAGE, DEFAULT_LOSS_COVERAGE};

///
/// Reduce scores to the most extreme one, starting from 0.
///
/// A larger magnitude always wins; between equal magnitudes the lower score wins, so a
/// loss beats a gain of the same size.
///
pub fn most_extreme<I>(scores: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    scores.into_iter().fold(0, |best, score| {
        if score.abs() > best.abs() || (score.abs() == best.abs() && score < best) {
            score
        } else {
            best
        }
    })
}

/// Coverage rules for strict gene scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneScoreOptions {
    /// Coverage a gained segment must exceed.
    pub gain: f64,
    /// Coverage a lost segment must exceed.
    pub loss: f64,
    /// Measure coverage over coding exons instead of all exons.
    pub use_cds: bool,
}

impl Default for GeneScoreOptions {
    fn default() -> Self {
        GeneScoreOptions {
            gain: DEFAULT_GAIN_COVERAGE,
            loss: DEFAULT_LOSS_COVERAGE,
            use_cds: false,
        }
    }
}

///
/// All segments of one sample, with a per-chromosome overlap index over them.
///
/// The index is a snapshot. It is built by [`prepare`](Self::prepare), or on the first
/// query, from the regions held at that moment; regions appended or re-scored later
/// are not seen by queries until the sample is prepared again.
///
#[derive(Debug, Default)]
pub struct SegmentedSample {
    pub name: String,
    regions: Vec<AberrantRegion>,
    index: OnceLock<GenomeIndex<AberrantRegion>>,
}

fn build_index(regions: &[AberrantRegion]) -> GenomeIndex<AberrantRegion> {
    let index = GenomeIndex::build(regions.iter().map(|r| {
        (
            r.region.chromosome().to_string(),
            Interval {
                start: r.region.start(),
                end: r.region.end(),
                val: r.clone(),
            },
        )
    }));
    log::debug!("indexed {} regions", index.len());
    index
}

impl SegmentedSample {
    pub fn new(name: impl Into<String>) -> Self {
        SegmentedSample {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_regions(name: impl Into<String>, regions: Vec<AberrantRegion>) -> Self {
        SegmentedSample {
            name: name.into(),
            regions,
            index: OnceLock::new(),
        }
    }

    pub fn regions(&self) -> &[AberrantRegion] {
        &self.regions
    }

    pub fn append(&mut self, region: AberrantRegion) {
        self.regions.push(region);
    }

    /// Score every region with `filter`.
    pub fn evaluate(&mut self, filter: &CnaFilter) {
        for region in self.regions.iter_mut() {
            region.score = filter.evaluate(region);
        }
    }

    /// (Re)build the overlap index from the current regions.
    pub fn prepare(&mut self) {
        let index = build_index(&self.regions);
        self.index = OnceLock::from(index);
    }

    fn index(&self) -> &GenomeIndex<AberrantRegion> {
        self.index.get_or_init(|| build_index(&self.regions))
    }

    /// Regions sharing at least one position with `query`.
    pub fn find_iter<'a>(&'a self, query: &Region) -> impl Iterator<Item = &'a AberrantRegion> + 'a {
        self.index()
            .find_iter(query.chromosome(), query.start(), query.end())
            .map(|iv| &iv.val)
    }

    pub fn find(&self, query: &Region) -> Vec<AberrantRegion> {
        self.find_iter(query).cloned().collect()
    }

    ///
    /// The most extreme score among regions overlapping `query`.
    ///
    /// With a positive `overlap_threshold`, a region counts only when its shared part
    /// with the query is more than that fraction of the query's length.
    ///
    pub fn region_score(&self, query: &Region, overlap_threshold: f64) -> i32 {
        let query_size = query.size() as f64;
        most_extreme(
            self.find_iter(query)
                .filter(|r| {
                    overlap_threshold <= 0.0
                        || query
                            .intersect(&r.region)
                            .is_some_and(|shared| shared.size() as f64 / query_size > overlap_threshold)
                })
                .map(|r| r.score),
        )
    }

    ///
    /// The most extreme score among aberrant regions covering enough of the gene's
    /// exons (or coding exons).
    ///
    /// Errors with `NoExons` when an aberrant region overlaps a gene that has no exons
    /// of the requested kind.
    ///
    pub fn gene_score(&self, gene: &GeneRegion, options: &GeneScoreOptions) -> Result<i32> {
        let mut kept = Vec::new();
        for r in self.find_iter(gene.region()).filter(|r| r.is_aberrant()) {
            let coverage = gene.coverage(&r.region, options.use_cds)?;
            let threshold = if r.score > 0 { options.gain } else { options.loss };
            if coverage > threshold {
                kept.push(r.score);
            }
        }
        Ok(most_extreme(kept))
    }

    /// The most extreme score among all regions overlapping the gene's span.
    pub fn gene_score_relaxed(&self, gene: &GeneRegion) -> i32 {
        most_extreme(self.find_iter(gene.region()).map(|r| r.score))
    }

    ///
    /// Strict scores of every gene in `query`.
    ///
    /// `genes` is the precomputed gene universe; when absent it is every gene the
    /// database places in `query`.
    ///
    pub fn scores<D>(
        &self,
        query: &Region,
        db: &D,
        genes: Option<&[GeneRegion]>,
        options: &GeneScoreOptions,
    ) -> Result<BTreeMap<String, i32>>
    where
        D: GeneDatabase + ?Sized,
    {
        let owned;
        let genes = match genes {
            Some(genes) => genes,
            None => {
                owned = db
                    .genes(query)
                    .iter()
                    .map(|name| GeneRegion::from_database(name, db))
                    .collect::<Result<Vec<_>>>()?;
                &owned[..]
            }
        };

        genes
            .iter()
            .map(|gene| -> Result<(String, i32)> {
                Ok((gene.name.clone(), self.gene_score(gene, options)?))
            })
            .collect()
    }

    ///
    /// Relaxed scores of every gene in `query`.
    ///
    /// Each aberrant region is clipped to `query` before asking the database which genes
    /// it touches, so genes outside the query window are never credited. Genes outside
    /// the universe are ignored.
    ///
    pub fn scores_relaxed<D>(
        &self,
        query: &Region,
        db: &D,
        universe: Option<&[String]>,
    ) -> BTreeMap<String, i32>
    where
        D: GeneDatabase + ?Sized,
    {
        let mut scores: BTreeMap<String, i32> = match universe {
            Some(genes) => genes.iter().map(|g| (g.clone(), 0)).collect(),
            None => db.genes(query).into_iter().map(|g| (g, 0)).collect(),
        };

        for r in self.find_iter(query).filter(|r| r.is_aberrant()) {
            let Some(clipped) = r.region.intersect(query) else {
                continue;
            };
            for gene in db.genes(&clipped) {
                if let Some(score) = scores.get_mut(&gene) {
                    *score = most_extreme([*score, r.score]);
                }
            }
        }

        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use cnars_core::TranscriptRecord;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::*;

    fn region(chromosome: &str, start: u32, end: u32) -> Region {
        Region::new(chromosome, start, end).unwrap()
    }

    fn scored(chromosome: &str, start: u32, end: u32, score: i32) -> AberrantRegion {
        AberrantRegion::with_score(region(chromosome, start, end), score as f64, score)
    }

    /// Two genes on chromosome 1: G1 spans 1000-2000 with exons 1000-1099 and 1900-2000,
    /// G2 spans 5000-6000 with a single exon.
    struct TwoGenes;

    impl GeneDatabase for TwoGenes {
        fn transcripts(&self, gene: &str) -> Vec<TranscriptRecord> {
            let record = |name: &str, start, end, starts: &str, ends: &str, count| TranscriptRecord {
                name: name.to_string(),
                chromosome: "chr1".to_string(),
                strand: "+".to_string(),
                tx_start: start,
                tx_end: end,
                cds_start: start,
                cds_end: end,
                exon_count: count,
                exon_starts: starts.to_string(),
                exon_ends: ends.to_string(),
            };
            match gene {
                "G1" => vec![record("G1", 1000, 2000, "1000,1900,", "1099,2000,", 2)],
                "G2" => vec![record("G2", 5000, 6000, "5000,", "6000,", 1)],
                _ => vec![],
            }
        }

        fn genes(&self, region: &Region) -> Vec<String> {
            ["G1", "G2"]
                .into_iter()
                .filter(|g| {
                    self.transcripts(g).first().is_some_and(|t| {
                        region.chromosome() == "1"
                            && t.tx_start <= region.end()
                            && t.tx_end >= region.start()
                    })
                })
                .map(str::to_string)
                .collect()
        }

        fn genome(&self) -> Vec<String> {
            vec!["G1".to_string(), "G2".to_string()]
        }

        fn genes_on_chromosome(&self, _chromosome: &str) -> Vec<String> {
            self.genome()
        }
    }

    #[rstest]
    #[case(vec![], 0)]
    #[case(vec![0, 0], 0)]
    #[case(vec![1, 2, -1], 2)]
    #[case(vec![2, -2], -2)]
    #[case(vec![-2, 2], -2)]
    #[case(vec![-1, 3, -3, 2], -3)]
    fn test_most_extreme(#[case] scores: Vec<i32>, #[case] expected: i32) {
        assert_eq!(most_extreme(scores), expected);
    }

    #[rstest]
    fn test_region_score_loss_wins_ties() {
        let sample = SegmentedSample::with_regions(
            "s",
            vec![scored("1", 100, 500, 2), scored("1", 300, 900, -2)],
        );
        assert_eq!(sample.region_score(&region("1", 400, 450), 0.0), -2);
        assert_eq!(sample.region_score(&region("1", 100, 200), 0.0), 2);
        assert_eq!(sample.region_score(&region("2", 100, 200), 0.0), 0);
    }

    #[rstest]
    fn test_region_score_overlap_threshold() {
        let sample = SegmentedSample::with_regions(
            "s",
            vec![scored("1", 1, 30, -3), scored("1", 31, 100, 1)],
        );
        let query = region("1", 1, 100);
        assert_eq!(sample.region_score(&query, 0.0), -3);
        // -3 covers 30% of the query, 1 covers 70%
        assert_eq!(sample.region_score(&query, 0.5), 1);
        assert_eq!(sample.region_score(&query, 0.7), 0);
    }

    #[rstest]
    fn test_gene_score_coverage_thresholds() {
        let gene = GeneRegion::from_database("G1", &TwoGenes).unwrap();
        // covers the first exon only: 100 of 201 exonic bases
        let sample = SegmentedSample::with_regions("s", vec![scored("1", 900, 1500, 2)]);
        let options = GeneScoreOptions::default();

        assert_eq!(sample.gene_score(&gene, &options).unwrap(), 0);
        assert_eq!(sample.gene_score_relaxed(&gene), 2);

        let lenient = GeneScoreOptions { gain: 0.4, ..options };
        assert_eq!(sample.gene_score(&gene, &lenient).unwrap(), 2);

        // losses use their own threshold
        let sample = SegmentedSample::with_regions("s", vec![scored("1", 900, 1500, -1)]);
        assert_eq!(sample.gene_score(&gene, &options).unwrap(), -1);
    }

    #[rstest]
    fn test_gene_score_skips_intronic_and_neutral_regions() {
        let gene = GeneRegion::from_database("G1", &TwoGenes).unwrap();
        let sample = SegmentedSample::with_regions(
            "s",
            vec![scored("1", 1200, 1800, -3), scored("1", 0, 10000, 0)],
        );
        let options = GeneScoreOptions::default();
        assert_eq!(sample.gene_score(&gene, &options).unwrap(), 0);
        assert_eq!(sample.gene_score_relaxed(&gene), -3);
    }

    #[rstest]
    fn test_unaffected_gene_scores_zero() {
        let gene = GeneRegion::from_database("G2", &TwoGenes).unwrap();
        let sample = SegmentedSample::with_regions("s", vec![scored("1", 900, 1500, 3)]);
        assert_eq!(sample.gene_score(&gene, &GeneScoreOptions::default()).unwrap(), 0);
        assert_eq!(sample.gene_score_relaxed(&gene), 0);
    }

    #[rstest]
    fn test_scores_over_query() {
        let sample = SegmentedSample::with_regions(
            "s",
            vec![scored("1", 0, 1950, 1), scored("1", 4000, 7000, -2)],
        );
        let query = region("1", 0, 10000);

        let strict = sample
            .scores(&query, &TwoGenes, None, &GeneScoreOptions::default())
            .unwrap();
        assert_eq!(strict, BTreeMap::from([("G1".to_string(), 1), ("G2".to_string(), -2)]));

        let relaxed = sample.scores_relaxed(&query, &TwoGenes, None);
        assert_eq!(relaxed, strict);
    }

    #[rstest]
    fn test_scores_relaxed_clips_to_query() {
        // the gain spans both genes but the query only reaches G1
        let sample = SegmentedSample::with_regions("s", vec![scored("1", 0, 9000, 2)]);
        let universe = vec!["G1".to_string(), "G2".to_string()];

        let scores = sample.scores_relaxed(&region("1", 0, 3000), &TwoGenes, Some(universe.as_slice()));
        assert_eq!(scores["G1"], 2);
        assert_eq!(scores["G2"], 0);
    }

    #[rstest]
    fn test_index_is_a_snapshot() {
        let mut sample = SegmentedSample::with_regions("s", vec![scored("1", 1, 10, 1)]);
        sample.prepare();
        sample.append(scored("1", 5, 20, -1));

        let query = region("1", 1, 100);
        assert_eq!(sample.find(&query).len(), 1);

        sample.prepare();
        assert_eq!(sample.find(&query).len(), 2);
    }

    #[rstest]
    fn test_prepare_is_idempotent() {
        let mut sample = SegmentedSample::with_regions(
            "s",
            vec![scored("1", 1, 10, 1), scored("1", 8, 30, 2), scored("2", 1, 10, 1)],
        );
        sample.prepare();
        let mut first = sample.find(&region("1", 9, 9));
        sample.prepare();
        let mut second = sample.find(&region("1", 9, 9));

        first.sort_by_key(|r| r.region.start());
        second.sort_by_key(|r| r.region.start());
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[rstest]
    fn test_find_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(42);
        let chromosomes = ["1", "2", "X"];

        let regions: Vec<AberrantRegion> = (0..500)
            .map(|_| {
                let chromosome = chromosomes[rng.random_range(0..chromosomes.len())];
                let start = rng.random_range(0..100_000u32);
                let end = start + rng.random_range(0..5_000u32);
                scored(chromosome, start, end, rng.random_range(-3..=3))
            })
            .collect();
        let sample = SegmentedSample::with_regions("s", regions.clone());

        for _ in 0..200 {
            let chromosome = chromosomes[rng.random_range(0..chromosomes.len())];
            let start = rng.random_range(0..105_000u32);
            let query = region(chromosome, start, start + rng.random_range(0..10_000u32));

            let mut found: Vec<(u32, u32)> = sample
                .find_iter(&query)
                .map(|r| (r.region.start(), r.region.end()))
                .collect();
            let mut expected: Vec<(u32, u32)> = regions
                .iter()
                .filter(|r| {
                    r.region.chromosome() == query.chromosome()
                        && r.region.start() <= query.end()
                        && r.region.end() >= query.start()
                })
                .map(|r| (r.region.start(), r.region.end()))
                .collect();

            found.sort_unstable();
            expected.sort_unstable();
            assert_eq!(found, expected);
        }
    }
}
