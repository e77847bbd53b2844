use std::fmt::{self, Display};
use std::str::FromStr;

use crate::database::{GeneDatabase, TranscriptRecord};
use crate::errors::{CnaError, Result};
use crate::models::region::Region;
use crate::utils::strip_chr_prefix;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strand {
    Forward,
    Reverse,
}

impl FromStr for Strand {
    type Err = CnaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "+" => Ok(Strand::Forward),
            "-" => Ok(Strand::Reverse),
            _ => Err(CnaError::Parse(format!("strand: {s:?}"))),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strand::Forward => write!(f, "+"),
            Strand::Reverse => write!(f, "-"),
        }
    }
}

///
/// A gene's transcript span together with its exons and coding exons.
///
/// The span is the transcript's `[tx_start, tx_end]`, its count is the number of
/// exons. Coding exons are the exons lying between the CDS start and end, with the
/// first and last clipped at the CDS boundaries.
///
#[derive(Debug, Clone)]
pub struct GeneRegion {
    pub name: String,
    region: Region,
    strand: Strand,
    exons: Vec<Region>,
    coding_exons: Vec<Region>,
}

impl GeneRegion {
    ///
    /// Look up a gene by name and build its region from the first transcript the
    /// database returns.
    ///
    pub fn from_database<D>(gene: &str, db: &D) -> Result<Self>
    where
        D: GeneDatabase + ?Sized,
    {
        let transcripts = db.transcripts(gene);
        let record = transcripts
            .first()
            .ok_or_else(|| CnaError::UnknownGene(gene.to_string()))?;
        if transcripts.len() > 1 {
            log::debug!(
                "{gene} has {} transcripts, using the first",
                transcripts.len()
            );
        }
        Self::from_transcript(record)
    }

    pub fn from_transcript(record: &TranscriptRecord) -> Result<Self> {
        let chromosome = strip_chr_prefix(&record.chromosome).to_string();
        let strand: Strand = record.strand.parse()?;
        let region = Region::with_count(
            chromosome.clone(),
            record.tx_start,
            record.tx_end,
            record.exon_count,
        )?;

        let count = record.exon_count as usize;
        let starts = parse_coordinate_list(&record.exon_starts, count, &record.name)?;
        let ends = parse_coordinate_list(&record.exon_ends, count, &record.name)?;

        let exons = starts
            .iter()
            .zip(&ends)
            .map(|(&start, &end)| Region::new(chromosome.clone(), start, end))
            .collect::<Result<Vec<_>>>()?;

        let coding_exons = coding_exons(&exons, record.cds_start, record.cds_end)?;

        Ok(GeneRegion {
            name: record.name.clone(),
            region,
            strand,
            exons,
            coding_exons,
        })
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn strand(&self) -> Strand {
        self.strand
    }

    pub fn exons(&self) -> &[Region] {
        &self.exons
    }

    pub fn coding_exons(&self) -> &[Region] {
        &self.coding_exons
    }

    /// Fraction of exonic bases covered by `region`.
    pub fn exon_covered(&self, region: &Region) -> Result<f64> {
        self.covered(&self.exons, region)
    }

    /// Fraction of coding exonic bases covered by `region`.
    pub fn coding_exon_covered(&self, region: &Region) -> Result<f64> {
        self.covered(&self.coding_exons, region)
    }

    /// Coding or plain exon coverage depending on `cds`.
    pub fn coverage(&self, region: &Region, cds: bool) -> Result<f64> {
        if cds {
            self.coding_exon_covered(region)
        } else {
            self.exon_covered(region)
        }
    }

    fn covered(&self, exons: &[Region], region: &Region) -> Result<f64> {
        let total: u64 = exons.iter().map(Region::size).sum();
        if total == 0 {
            return Err(CnaError::NoExons(self.name.clone()));
        }
        let overlap: u64 = exons
            .iter()
            .filter_map(|exon| region.intersect(exon))
            .map(|shared| shared.size())
            .sum();
        Ok(overlap as f64 / total as f64)
    }
}

impl AsRef<Region> for GeneRegion {
    fn as_ref(&self) -> &Region {
        &self.region
    }
}

fn parse_coordinate_list(list: &str, count: usize, gene: &str) -> Result<Vec<u32>> {
    let values = list
        .split(',')
        .filter(|x| !x.is_empty())
        .take(count)
        .map(|x| {
            x.trim()
                .parse::<u32>()
                .map_err(|_| CnaError::Parse(format!("exon coordinate {x:?} of {gene}")))
        })
        .collect::<Result<Vec<_>>>()?;

    if values.len() < count {
        return Err(CnaError::Parse(format!(
            "exon list of {gene}: expected {count} coordinates, found {}",
            values.len()
        )));
    }
    Ok(values)
}

///
/// Clip the exon list to the CDS: the first exon ending at or after `cds_start` starts
/// at `cds_start`, the last exon starting at or before `cds_end` ends at `cds_end`, and
/// exons in between are kept whole. A transcript without a coding span (`cds_start >=
/// cds_end`, or a CDS falling inside an intron) has no coding exons.
///
fn coding_exons(exons: &[Region], cds_start: u32, cds_end: u32) -> Result<Vec<Region>> {
    if cds_start >= cds_end {
        return Ok(Vec::new());
    }

    let first = exons.iter().position(|x| x.end() >= cds_start);
    let last = exons.iter().rposition(|x| x.start() <= cds_end);

    let (first, last) = match (first, last) {
        (Some(first), Some(last)) if first <= last => (first, last),
        _ => return Ok(Vec::new()),
    };

    let chromosome = exons[first].chromosome();
    if first == last {
        return Ok(vec![Region::new(chromosome, cds_start, cds_end)?]);
    }

    let mut coding = Vec::with_capacity(last - first + 1);
    coding.push(Region::new(chromosome, cds_start, exons[first].end())?);
    coding.extend(exons[first + 1..last].iter().cloned());
    coding.push(Region::new(chromosome, exons[last].start(), cds_end)?);
    Ok(coding)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    struct SingleGene(TranscriptRecord);

    impl GeneDatabase for SingleGene {
        fn transcripts(&self, gene: &str) -> Vec<TranscriptRecord> {
            if gene == self.0.name {
                vec![self.0.clone()]
            } else {
                vec![]
            }
        }

        fn genes(&self, _region: &Region) -> Vec<String> {
            vec![self.0.name.clone()]
        }

        fn genome(&self) -> Vec<String> {
            vec![self.0.name.clone()]
        }

        fn genes_on_chromosome(&self, _chromosome: &str) -> Vec<String> {
            vec![self.0.name.clone()]
        }
    }

    #[fixture]
    fn record() -> TranscriptRecord {
        // exons [100,199] [300,399] [500,599]; CDS 150..549
        TranscriptRecord {
            name: "GENE1".to_string(),
            chromosome: "chr7".to_string(),
            strand: "+".to_string(),
            tx_start: 100,
            tx_end: 599,
            cds_start: 150,
            cds_end: 549,
            exon_count: 3,
            exon_starts: "100,300,500,".to_string(),
            exon_ends: "199,399,599,".to_string(),
        }
    }

    fn region(start: u32, end: u32) -> Region {
        Region::new("7", start, end).unwrap()
    }

    #[rstest]
    fn test_from_transcript(record: TranscriptRecord) {
        let gene = GeneRegion::from_transcript(&record).unwrap();

        assert_eq!(gene.region(), &region(100, 599));
        assert_eq!(gene.region().count(), 3);
        assert_eq!(gene.region().chromosome(), "7");
        assert_eq!(gene.strand(), Strand::Forward);
        assert_eq!(
            gene.exons(),
            &[region(100, 199), region(300, 399), region(500, 599)]
        );
        assert_eq!(
            gene.coding_exons(),
            &[region(150, 199), region(300, 399), region(500, 549)]
        );
    }

    #[rstest]
    fn test_single_coding_exon_is_clipped_on_both_sides(mut record: TranscriptRecord) {
        record.cds_start = 320;
        record.cds_end = 380;
        let gene = GeneRegion::from_transcript(&record).unwrap();
        assert_eq!(gene.coding_exons(), &[region(320, 380)]);
    }

    #[rstest]
    #[case(599, 599)]
    #[case(250, 280)]
    fn test_no_coding_span(mut record: TranscriptRecord, #[case] cds_start: u32, #[case] cds_end: u32) {
        record.cds_start = cds_start;
        record.cds_end = cds_end;
        let gene = GeneRegion::from_transcript(&record).unwrap();
        assert_eq!(gene.coding_exons().is_empty(), true);
        assert!(matches!(
            gene.coding_exon_covered(&region(100, 599)),
            Err(CnaError::NoExons(_))
        ));
    }

    #[rstest]
    fn test_exon_coverage(record: TranscriptRecord) {
        let gene = GeneRegion::from_transcript(&record).unwrap();

        assert_eq!(gene.exon_covered(&region(0, 1000)).unwrap(), 1.0);
        assert_eq!(gene.exon_covered(&region(200, 299)).unwrap(), 0.0);
        // first exon plus half of the second: 100 + 50 of 300 bases
        assert_eq!(gene.exon_covered(&region(0, 349)).unwrap(), 0.5);
        // coding bases: 50 + 100 + 50
        assert_eq!(gene.coding_exon_covered(&region(300, 399)).unwrap(), 0.5);
        assert_eq!(gene.coverage(&region(300, 399), false).unwrap(), 100.0 / 300.0);
        // other chromosome never covers
        let elsewhere = Region::new("8", 0, 1000).unwrap();
        assert_eq!(gene.exon_covered(&elsewhere).unwrap(), 0.0);
    }

    #[rstest]
    fn test_from_database(record: TranscriptRecord) {
        let db = SingleGene(record);
        let gene = GeneRegion::from_database("GENE1", &db).unwrap();
        assert_eq!(gene.name, "GENE1");

        let missing = GeneRegion::from_database("NOPE", &db);
        assert!(matches!(missing, Err(CnaError::UnknownGene(name)) if name == "NOPE"));
    }

    #[rstest]
    fn test_short_exon_list_is_rejected(mut record: TranscriptRecord) {
        record.exon_ends = "199,399,".to_string();
        assert!(matches!(
            GeneRegion::from_transcript(&record),
            Err(CnaError::Parse(_))
        ));
    }

    #[rstest]
    fn test_bad_strand(mut record: TranscriptRecord) {
        record.strand = "?".to_string();
        assert!(GeneRegion::from_transcript(&record).is_err());
    }
}
