use thiserror::Error;

#[derive(Error, Debug)]
pub enum CnaError {
    #[error("Error parsing {0}")]
    Parse(String),

    #[error("Invalid region limits: {chromosome}:{start}-{end}")]
    InvalidRegion {
        chromosome: String,
        start: u32,
        end: u32,
    },

    #[error("Invalid cytoband specified: {0}")]
    InvalidCytoband(String),

    #[error("Gene not found in annotation database: {0}")]
    UnknownGene(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Gene region {0} has no exons to compute coverage over")]
    NoExons(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CnaError>;
