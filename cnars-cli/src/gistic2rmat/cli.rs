use clap::{Arg, Command, arg};

use crate::common;

pub const GISTIC2RMAT_CMD: &str = "gistic2rmat";

pub fn create_gistic2rmat_cli() -> Command {
    Command::new(GISTIC2RMAT_CMD)
        .author("Databio")
        .about("Create a lesion by sample score matrix from GISTIC lesions.")
        .arg(Arg::new("lesions").required(true).help("GISTIC all_lesions file"))
        .arg(Arg::new("output").required(true).help("Score matrix to write"))
        .arg(arg!(--segfile <path> "Score samples from this segmentation file instead of the lesion statuses"))
        .arg(common::delimiter_arg())
        .arg(common::overlap_arg())
        .args(common::lesion_args())
        .args(common::filter_args())
}
