use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::errors::{CnaError, Result};

// chr<N|X|Y>[:<start>-<end>][(probes <p1>:<p2>)][|<state>]
static COORDINATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^chr(?P<chrom>\d+|X|Y)(?::(?P<start>\d+)-(?P<end>\d+))?(?:\((?:probes )?(?P<pstart>\d+):(?P<pend>\d+)\))?(?:\|(?P<state>.))?",
    )
    .expect("coordinate pattern is valid")
});

///
/// A genomic interval with inclusive coordinates on both ends.
///
/// `count` carries the number of probes (or exons, for gene regions) backing the
/// interval. It does not take part in equality: two regions are the same region when
/// chromosome, start and end agree.
///
#[derive(Debug, Clone, Eq)]
pub struct Region {
    chromosome: String,
    start: u32,
    end: u32,
    count: u32,
}

impl Region {
    /// Create a region, rejecting `start > end`.
    pub fn new(chromosome: impl Into<String>, start: u32, end: u32) -> Result<Self> {
        Self::with_count(chromosome, start, end, 0)
    }

    pub fn with_count(
        chromosome: impl Into<String>,
        start: u32,
        end: u32,
        count: u32,
    ) -> Result<Self> {
        let chromosome = chromosome.into();
        if start > end {
            return Err(CnaError::InvalidRegion {
                chromosome,
                start,
                end,
            });
        }
        Ok(Region {
            chromosome,
            start,
            end,
            count,
        })
    }

    /// A whole-chromosome placeholder with unresolved `0-0` limits.
    pub fn whole_chromosome(chromosome: impl Into<String>) -> Self {
        Region {
            chromosome: chromosome.into(),
            start: 0,
            end: 0,
            count: 0,
        }
    }

    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Chromosome with a `chr` prefix, as used in annotation tables.
    pub fn chromstr(&self) -> String {
        format!("chr{}", self.chromosome)
    }

    /// Length in bases, counting both ends.
    pub fn size(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }

    pub fn overlaps(&self, other: &Region) -> bool {
        self.chromosome == other.chromosome && self.start <= other.end && self.end >= other.start
    }

    ///
    /// Smallest region spanning both regions, or `None` when they do not overlap.
    ///
    /// The probe count of `self` is carried over unchanged; the true count of a
    /// union cannot be derived from the two counts alone.
    ///
    pub fn union(&self, other: &Region) -> Option<Region> {
        self.overlaps(other).then(|| Region {
            chromosome: self.chromosome.clone(),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            count: self.count,
        })
    }

    ///
    /// Shared part of both regions, or `None` when they do not overlap.
    ///
    pub fn intersect(&self, other: &Region) -> Option<Region> {
        self.overlaps(other).then(|| Region {
            chromosome: self.chromosome.clone(),
            start: self.start.max(other.start),
            end: self.end.min(other.end),
            count: self.count,
        })
    }
}

impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.chromosome == other.chromosome && self.start == other.start && self.end == other.end
    }
}

impl Hash for Region {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chromosome.hash(state);
        self.start.hash(state);
        self.end.hash(state);
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chr{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

impl AsRef<Region> for Region {
    fn as_ref(&self) -> &Region {
        self
    }
}

///
/// Parse a coordinate string into a region and the optional state letter it carries.
///
/// The grammar is `chr<N|X|Y>[:<start>-<end>][(probes <p1>:<p2>)][|<state>]`. A missing
/// range yields `0-0`; the probe count is the inclusive distance between the two probe
/// indices, `|p1 - p2| + 1`, so reversed probe ranges still give a non-negative count;
/// `G` maps to `1.0`, `L` to `-1.0` and any other letter to `0.0`.
/// Anything after the recognised prefix is ignored.
///
pub fn parse_coordinate(coord: &str) -> Result<(Region, Option<f64>)> {
    let caps = COORDINATE_RE
        .captures(coord)
        .ok_or_else(|| CnaError::Parse(format!("region coordinate: {coord:?}")))?;

    let number = |name: &str| -> Result<Option<u32>> {
        caps.name(name)
            .map(|m| {
                m.as_str().parse::<u32>().map_err(|_| {
                    CnaError::Parse(format!("{name} in region coordinate: {coord:?}"))
                })
            })
            .transpose()
    };

    let (start, end) = match (number("start")?, number("end")?) {
        (Some(start), Some(end)) => (start, end),
        _ => (0, 0),
    };
    let count = match (number("pstart")?, number("pend")?) {
        (Some(p1), Some(p2)) => p1.abs_diff(p2) + 1,
        _ => 0,
    };
    let state = caps.name("state").map(|m| match m.as_str() {
        "G" => 1.0,
        "L" => -1.0,
        _ => 0.0,
    });

    let region = Region::with_count(&caps["chrom"], start, end, count)?;
    Ok((region, state))
}

impl FromStr for Region {
    type Err = CnaError;

    fn from_str(s: &str) -> Result<Self> {
        parse_coordinate(s).map(|(region, _)| region)
    }
}
