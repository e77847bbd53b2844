use clap::{Arg, Command, arg};

use crate::common;

pub const SEG2GENES_CMD: &str = "seg2genes";

pub fn create_seg2genes_cli() -> Command {
    Command::new(SEG2GENES_CMD)
        .author("Databio")
        .about("Append the number and names of overlapping genes to each segment.")
        .arg(Arg::new("input").required(true).help("Segmentation file (optionally gzip'd)"))
        .arg(Arg::new("output").required(true).help("Annotated file to write"))
        .arg(
            arg!(--"no-header" "The input has no header line")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(common::delimiter_arg())
        .arg(common::item_delimiter_arg())
        .args(common::gene_db_args())
}
