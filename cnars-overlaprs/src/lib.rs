//! Interval overlap index used by the cnars copy-number scoring engine.
//!
//! Coordinates are closed on both ends: an interval `[start, end]` overlaps a query
//! `[qs, qe]` iff `start <= qe && end >= qs`. This matches segmentation files and the
//! gene annotation queries the scoring engine issues.
//!
//! ## Quick Start
//!
//! ```rust
//! use cnars_overlaprs::{AIList, Overlapper, Interval};
//!
//! let segments = vec![
//!     Interval { start: 100u32, end: 200, val: -2 },
//!     Interval { start: 150, end: 300, val: 1 },
//!     Interval { start: 400, end: 500, val: 3 },
//! ];
//!
//! let ailist = AIList::build(segments);
//!
//! let overlaps = ailist.find(180, 250);
//! assert_eq!(overlaps.len(), 2);
//!
//! for interval in ailist.find_iter(180, 250) {
//!     println!("Found overlap: {:?}", interval);
//! }
//! ```

pub mod ailist;
/// One [`AIList`] per chromosome.
pub mod genome_index;
pub mod traits;

pub use self::ailist::AIList;
pub use self::genome_index::GenomeIndex;
pub use self::traits::{Interval, Overlapper};
