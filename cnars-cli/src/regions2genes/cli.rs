use clap::{Arg, Command, arg};

use crate::common;

pub const REGIONS2GENES_CMD: &str = "regions2genes";

pub fn create_regions2genes_cli() -> Command {
    Command::new(REGIONS2GENES_CMD)
        .author("Databio")
        .about("List the genes overlapping each coordinate of a file.")
        .arg(Arg::new("input").required(true).help("File whose first field is a coordinate like chr3:100-200"))
        .arg(Arg::new("output").required(true).help("Annotated file to write"))
        .arg(
            arg!(--"coord-only" "Each line holds nothing but a coordinate")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--header "The first line is a header")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(common::delimiter_arg())
        .arg(common::item_delimiter_arg())
        .args(common::gene_db_args())
}
