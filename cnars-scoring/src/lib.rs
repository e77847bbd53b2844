//! Copy-number aberration scoring.
//!
//! A [`SegmentedSampleSet`] holds the segments of a cohort, scored by a [`CnaFilter`].
//! Each [`SegmentedSample`] indexes its segments per chromosome and reduces the ones
//! overlapping a query region or gene to a single score per sample.
//!
//! ```rust
//! use cnars_core::models::{AberrantRegion, Region};
//! use cnars_scoring::{CnaFilter, SegmentedSample};
//!
//! let filter = CnaFilter::default();
//! let mut sample = SegmentedSample::new("s1");
//! sample.append(AberrantRegion::new(Region::new("7", 100, 5000).unwrap(), 0.8));
//! sample.append(AberrantRegion::new(Region::new("7", 4000, 9000).unwrap(), -2.0));
//! sample.evaluate(&filter);
//! sample.prepare();
//!
//! // a focal gain (2) and a focal deep loss (-3) overlap the query
//! assert_eq!(sample.region_score(&Region::new("7", 4500, 4600).unwrap(), 0.0), -3);
//! ```
pub mod cna_filter;
pub mod config;
pub mod consts;
pub mod randomize;
pub mod sample;
pub mod sample_set;

// re-exports
pub use cna_filter::*;
pub use config::*;
pub use randomize::*;
pub use sample::*;
pub use sample_set::*;
