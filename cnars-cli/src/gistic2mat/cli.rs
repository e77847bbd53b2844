use clap::{Arg, Command, arg};

use crate::common;

pub const GISTIC2MAT_CMD: &str = "gistic2mat";

pub fn create_gistic2mat_cli() -> Command {
    Command::new(GISTIC2MAT_CMD)
        .author("Databio")
        .about("Create a gene by sample score matrix over the genes of GISTIC lesions.")
        .arg(Arg::new("lesions").required(true).help("GISTIC all_lesions file"))
        .arg(Arg::new("output").required(true).help("Score matrix to write"))
        .arg(arg!(--segfile <path> "Score samples from this segmentation file instead of the lesion statuses"))
        .arg(arg!(--genefile <path> "Also write the genes found in each lesion"))
        .arg(common::delimiter_arg())
        .arg(common::item_delimiter_arg())
        .args(common::lesion_args())
        .args(common::gene_db_args())
        .args(common::filter_args())
        .args(common::coverage_args())
}
