use clap::{Arg, Command};

use crate::common;

pub const REGIONS2RMAT_CMD: &str = "regions2rmat";

pub fn create_regions2rmat_cli() -> Command {
    Command::new(REGIONS2RMAT_CMD)
        .author("Databio")
        .about("Create a region by sample score matrix from a segmentation file.")
        .arg(Arg::new("regions").required(true).help("Headerless chr<N>, start, end file"))
        .arg(Arg::new("segfile").required(true).help("Segmentation file (optionally gzip'd)"))
        .arg(Arg::new("output").required(true).help("Score matrix to write"))
        .arg(common::delimiter_arg())
        .arg(common::overlap_arg())
        .args(common::filter_args())
}
