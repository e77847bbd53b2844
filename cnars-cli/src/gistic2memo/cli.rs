use clap::{Arg, Command, arg};

use cnars_io::{DEFAULT_PEAK_ATTR, DEFAULT_REGION_ATTR, DEFAULT_WIDE_PEAK_ATTR};

use crate::common;

pub const GISTIC2MEMO_CMD: &str = "gistic2memo";

pub fn create_gistic2memo_cli() -> Command {
    Command::new(GISTIC2MEMO_CMD)
        .author("Databio")
        .about("Create MEMO files of amplified and deleted peaks from a GISTIC lesions file.")
        .arg(Arg::new("lesions").required(true).help("GISTIC all_lesions file"))
        .arg(arg!(--ampfile <path> "Amplified peaks output [default: <lesions>.amp.memo]"))
        .arg(arg!(--delfile <path> "Deleted peaks output [default: <lesions>.del.memo]"))
        .arg(
            arg!(--"region-attr" <name> "Header of the region limits column")
                .default_value(DEFAULT_REGION_ATTR),
        )
        .arg(
            arg!(--"peak-attr" <name> "Header of the peak limits column")
                .default_value(DEFAULT_PEAK_ATTR),
        )
        .arg(
            arg!(--"wpeak-attr" <name> "Header of the wide peak limits column")
                .default_value(DEFAULT_WIDE_PEAK_ATTR),
        )
        .arg(common::delimiter_arg())
        .arg(common::item_delimiter_arg())
        .args(common::gene_db_args())
}
