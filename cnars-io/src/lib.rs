//! # File glue for copy-number scoring.
//!
//! Readers for UCSC gene tables, GISTIC lesion files and region lists, plus the writers
//! for the score matrices, gene lists and MEMO peak files the command-line tools produce.
//!
pub mod annotation;
pub mod lesions;
pub mod matrix;
pub mod memo;
pub mod regions;

// re-expose core types
pub use annotation::*;
pub use lesions::*;
pub use matrix::*;
pub use memo::*;
pub use regions::*;
