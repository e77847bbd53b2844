use clap::{Arg, Command, arg};

use crate::common;

pub const SEG2MAT_CMD: &str = "seg2mat";

pub fn create_seg2mat_cli() -> Command {
    Command::new(SEG2MAT_CMD)
        .author("Databio")
        .about("Create a gene by sample score matrix from a segmentation file.")
        .arg(Arg::new("segfile").required(true).help("Segmentation file (optionally gzip'd)"))
        .arg(Arg::new("output").required(true).help("Score matrix to write"))
        .arg(arg!(--chromosome <chromosome> "Only score the genes of this chromosome"))
        .arg(common::delimiter_arg())
        .args(common::gene_db_args())
        .args(common::filter_args())
        .args(common::coverage_args())
}
