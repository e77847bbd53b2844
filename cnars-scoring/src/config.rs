use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cna_filter::CnaFilter;
use crate::consts::{DEFAULT_GAIN_COVERAGE, DEFAULT_LOSS_COVERAGE};
use crate::sample::GeneScoreOptions;

/// Gene coverage rules for strict scoring.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct CoverageConfig {
    pub gain: f64,
    pub loss: f64,
    pub exons_only: bool,
    /// Measure coverage over coding exons; implies `exons_only`.
    pub cds_only: bool,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        CoverageConfig {
            gain: DEFAULT_GAIN_COVERAGE,
            loss: DEFAULT_LOSS_COVERAGE,
            exons_only: false,
            cds_only: false,
        }
    }
}

impl CoverageConfig {
    /// Whether genes are scored strictly, against exon coverage.
    pub fn strict(&self) -> bool {
        self.exons_only || self.cds_only
    }

    pub fn options(&self) -> GeneScoreOptions {
        GeneScoreOptions {
            gain: self.gain,
            loss: self.loss,
            use_cds: self.cds_only,
        }
    }
}

///
/// Scoring thresholds, loadable from a TOML file:
///
/// ```toml
/// overlap = 0.25
///
/// [filter]
/// gain = 0.3
/// loss_size = 5e6
///
/// [coverage]
/// gain = 0.6
/// cds_only = true
/// ```
///
/// Anything left out keeps its default.
///
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(default)]
pub struct ScoringConfig {
    pub filter: CnaFilter,
    pub coverage: CoverageConfig,
    /// Fraction of a query region a segment must exceed to count toward its score.
    pub overlap: f64,
}

#[derive(Error, Debug)]
pub enum ScoringConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
    #[error("Invalid scoring threshold {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
}

pub type ScoringConfigResult<T> = std::result::Result<T, ScoringConfigError>;

impl TryFrom<&Path> for ScoringConfig {
    type Error = ScoringConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: ScoringConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

impl ScoringConfig {
    ///
    /// Reject thresholds no input could be scored against: NaNs, negative sizes and
    /// fractions outside `[0, 1]`.
    ///
    pub fn validate(&self) -> ScoringConfigResult<()> {
        let filter = &self.filter;
        for (name, value) in [
            ("filter.gain", filter.gain),
            ("filter.gain_high", filter.gain_high),
            ("filter.loss", filter.loss),
            ("filter.loss_high", filter.loss_high),
        ] {
            if value.is_nan() {
                return Err(ScoringConfigError::InvalidThreshold { name, value });
            }
        }

        for (name, value) in [
            ("filter.gain_size", filter.gain_size),
            ("filter.loss_size", filter.loss_size),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ScoringConfigError::InvalidThreshold { name, value });
            }
        }

        for (name, value) in [
            ("coverage.gain", self.coverage.gain),
            ("coverage.loss", self.coverage.loss),
            ("overlap", self.overlap),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScoringConfigError::InvalidThreshold { name, value });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("../tests/data/scoring.toml");
        let config = ScoringConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.overlap, 0.25);
        assert_eq!(config.filter.gain, 0.3);
        assert_eq!(config.filter.loss_size, 5e6);
        // untouched fields keep their defaults
        assert_eq!(config.filter.loss, -0.2);
        assert_eq!(config.filter.gain_high, CnaFilter::default().gain_high);
        assert_eq!(config.coverage.gain, 0.6);
        assert_eq!(config.coverage.loss, 0.0);
        assert!(config.coverage.strict());
        assert!(config.coverage.options().use_cds);
    }

    #[rstest]
    fn test_empty_file_is_default() {
        let config: ScoringConfig = toml::from_str("").unwrap();
        assert_eq!(config, ScoringConfig::default());
        assert!(!config.coverage.strict());
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case("overlap = 1.5")]
    #[case("[coverage]\ngain = -0.1")]
    #[case("[filter]\ngain_size = -1.0")]
    #[case("[filter]\ngain = nan")]
    fn test_invalid_thresholds(#[case] text: &str) {
        let config: ScoringConfig = toml::from_str(text).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ScoringConfigError::InvalidThreshold { .. })
        ));
    }

    #[rstest]
    fn test_missing_file() {
        let path = PathBuf::from("../tests/data/missing.toml");
        assert!(matches!(
            ScoringConfig::try_from(path.as_path()),
            Err(ScoringConfigError::Io(_))
        ));
    }
}
