use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::errors::{CnaError, Result};
use crate::models::region::{Region, parse_coordinate};

///
/// A segment of one sample with its copy-number state and aberration score.
///
/// `state` is the segment mean (a log ratio) or an encoded gain/loss call. `score` is
/// the ordinal produced by a CNA filter; it stays 0 until the sample is evaluated.
/// `samples` holds per-sample statuses for lesions read from a GISTIC file when no
/// segmentation file is available.
///
/// Equality and hashing are positional, like [`Region`]: the same interval seen in two
/// lesion rows is one region regardless of state or score.
///
#[derive(Debug, Clone)]
pub struct AberrantRegion {
    pub region: Region,
    pub state: f64,
    pub score: i32,
    pub samples: Vec<i32>,
    /// The state as spelled in the file it was read from.
    state_text: Option<String>,
}

impl AberrantRegion {
    pub fn new(region: Region, state: f64) -> Self {
        AberrantRegion {
            region,
            state,
            score: 0,
            samples: Vec::new(),
            state_text: None,
        }
    }

    pub fn with_score(region: Region, state: f64, score: i32) -> Self {
        AberrantRegion {
            score,
            ..AberrantRegion::new(region, state)
        }
    }

    ///
    /// Remember how the state was written so [`delimited`](Self::delimited) can emit it
    /// unchanged. The text is only used while it still parses to `state`.
    ///
    pub fn with_state_text(mut self, text: impl Into<String>) -> Self {
        self.state_text = Some(text.into());
        self
    }

    pub fn size(&self) -> u64 {
        self.region.size()
    }

    /// Whether a filter scored this region as a gain or a loss.
    pub fn is_aberrant(&self) -> bool {
        self.score != 0
    }

    ///
    /// Segmentation-file cells for this region: chromosome, start, end, count, state.
    ///
    pub fn delimited(&self, delimiter: &str) -> String {
        [
            self.region.chromosome().to_string(),
            self.region.start().to_string(),
            self.region.end().to_string(),
            self.region.count().to_string(),
            self.state_string(),
        ]
        .join(delimiter)
    }

    fn state_string(&self) -> String {
        match &self.state_text {
            Some(text) if text.trim().parse::<f64>().is_ok_and(|v| v == self.state) => {
                text.clone()
            }
            _ => format_state(self.state),
        }
    }
}

///
/// Render a state value the way segmentation files spell it: shortest round-trip
/// digits, with a trailing `.0` on integral values (`1.0`, `-0.25`, `0.982292`).
///
pub fn format_state(state: f64) -> String {
    let text = state.to_string();
    if state.is_finite() && !text.contains('.') {
        format!("{text}.0")
    } else {
        text
    }
}

impl PartialEq for AberrantRegion {
    fn eq(&self, other: &Self) -> bool {
        self.region == other.region
    }
}

impl Eq for AberrantRegion {}

impl Hash for AberrantRegion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.region.hash(state);
    }
}

impl PartialEq<Region> for AberrantRegion {
    fn eq(&self, other: &Region) -> bool {
        &self.region == other
    }
}

impl AsRef<Region> for AberrantRegion {
    fn as_ref(&self) -> &Region {
        &self.region
    }
}

impl Display for AberrantRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.state > 0.0 {
            'G'
        } else if self.state < 0.0 {
            'L'
        } else {
            '0'
        };
        write!(f, "{}|{}", self.region, state)
    }
}

impl FromStr for AberrantRegion {
    type Err = CnaError;

    /// Parse a coordinate string; a missing state letter means a neutral state.
    fn from_str(s: &str) -> Result<Self> {
        let (region, state) = parse_coordinate(s)?;
        Ok(AberrantRegion::new(region, state.unwrap_or(0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(1.0, "1.0")]
    #[case(-1.0, "-1.0")]
    #[case(0.0, "0.0")]
    #[case(0.982292, "0.982292")]
    #[case(-0.25, "-0.25")]
    #[case(12.5, "12.5")]
    fn test_format_state(#[case] state: f64, #[case] expected: &str) {
        assert_eq!(format_state(state), expected);
    }

    #[rstest]
    fn test_delimited() {
        let region = Region::with_count("3", 26596561, 64929919, 120).unwrap();
        let ab = AberrantRegion::new(region, -0.3);
        assert_eq!(ab.delimited("\t"), "3\t26596561\t64929919\t120\t-0.3");
    }

    #[rstest]
    #[case("1", 1.0, "1")]
    #[case("-0.2500", -0.25, "-0.2500")]
    #[case("1e-1", 0.1, "1e-1")]
    fn test_delimited_keeps_state_text(#[case] text: &str, #[case] state: f64, #[case] cell: &str) {
        let region = Region::with_count("7", 1, 10, 2).unwrap();
        let ab = AberrantRegion::new(region, state).with_state_text(text);
        assert_eq!(ab.delimited("\t"), format!("7\t1\t10\t2\t{cell}"));
    }

    #[rstest]
    fn test_stale_state_text_is_ignored() {
        let region = Region::with_count("7", 1, 10, 2).unwrap();
        let mut ab = AberrantRegion::new(region, 1.0).with_state_text("1");
        ab.state = 0.5;
        assert_eq!(ab.delimited("\t"), "7\t1\t10\t2\t0.5");
    }

    #[rstest]
    fn test_equality_is_positional() {
        let a = AberrantRegion::with_score(Region::new("1", 1, 10).unwrap(), 0.5, 2);
        let b = AberrantRegion::with_score(Region::new("1", 1, 10).unwrap(), -0.5, -1);
        assert_eq!(a, b);
        assert!(a == Region::new("1", 1, 10).unwrap());
    }

    #[rstest]
    #[case("chr8:50-90|G", "chr8:50-90|G", 1.0)]
    #[case("chr2:294-3945|L", "chr2:294-3945|L", -1.0)]
    #[case("chr2:294-3945", "chr2:294-3945|0", 0.0)]
    fn test_parse_and_display(#[case] coord: &str, #[case] displayed: &str, #[case] state: f64) {
        let ab: AberrantRegion = coord.parse().unwrap();
        assert_eq!(ab.state, state);
        assert_eq!(ab.score, 0);
        assert_eq!(ab.to_string(), displayed);
    }
}
