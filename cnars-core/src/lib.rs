//! Core data model for copy-number aberration analysis.
//!
//! Regions use inclusive coordinates on both ends. Chromosomes are stored without the
//! `chr` prefix (`"7"`, `"X"`), which is added back only when printing.
//!
//! ```rust
//! use cnars_core::models::Region;
//!
//! let a: Region = "chr7:100-200".parse().unwrap();
//! let b = Region::new("7", 150, 300).unwrap();
//!
//! assert_eq!(a.intersect(&b).unwrap().size(), 51);
//! ```
pub mod database;
pub mod errors;
pub mod models;
pub mod utils;

pub use database::{GeneDatabase, TranscriptRecord};
pub use errors::{CnaError, Result};
