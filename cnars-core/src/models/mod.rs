pub mod aberrant_region;
pub mod cytoband;
pub mod gene_region;
pub mod region;

// re-export for cleaner imports
pub use self::aberrant_region::{AberrantRegion, format_state};
pub use self::cytoband::{Cytoband, CytobandTable};
pub use self::gene_region::{GeneRegion, Strand};
pub use self::region::{Region, parse_coordinate};
