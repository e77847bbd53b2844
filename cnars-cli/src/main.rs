mod common;
mod gistic2mat;
mod gistic2memo;
mod gistic2rmat;
mod regions2genes;
mod regions2rmat;
mod seg2genes;
mod seg2mat;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "cnars";
    pub const BIN_NAME: &str = "cnars";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .author("Databio")
        .about("Score copy-number aberrations of segmented samples over genes, GISTIC lesions and arbitrary regions.")
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More logging; repeat for even more")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(seg2mat::cli::create_seg2mat_cli())
        .subcommand(gistic2mat::cli::create_gistic2mat_cli())
        .subcommand(gistic2rmat::cli::create_gistic2rmat_cli())
        .subcommand(gistic2memo::cli::create_gistic2memo_cli())
        .subcommand(regions2rmat::cli::create_regions2rmat_cli())
        .subcommand(regions2genes::cli::create_regions2genes_cli())
        .subcommand(seg2genes::cli::create_seg2genes_cli())
}

/// Route both `tracing` events and the libraries' `log` records to stderr.
fn init_logging(matches: &ArgMatches) -> Result<()> {
    let level = match (matches.get_flag("quiet"), matches.get_count("verbose")) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .compact()
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    init_logging(&matches)?;

    match matches.subcommand() {
        //
        // GENE MATRICES
        //
        Some((seg2mat::cli::SEG2MAT_CMD, matches)) => {
            seg2mat::handlers::run_seg2mat(matches)?;
        }
        Some((gistic2mat::cli::GISTIC2MAT_CMD, matches)) => {
            gistic2mat::handlers::run_gistic2mat(matches)?;
        }

        //
        // REGION MATRICES
        //
        Some((gistic2rmat::cli::GISTIC2RMAT_CMD, matches)) => {
            gistic2rmat::handlers::run_gistic2rmat(matches)?;
        }
        Some((regions2rmat::cli::REGIONS2RMAT_CMD, matches)) => {
            regions2rmat::handlers::run_regions2rmat(matches)?;
        }

        //
        // MEMO PEAKS
        //
        Some((gistic2memo::cli::GISTIC2MEMO_CMD, matches)) => {
            gistic2memo::handlers::run_gistic2memo(matches)?;
        }

        //
        // ANNOTATION
        //
        Some((regions2genes::cli::REGIONS2GENES_CMD, matches)) => {
            regions2genes::handlers::run_regions2genes(matches)?;
        }
        Some((seg2genes::cli::SEG2GENES_CMD, matches)) => {
            seg2genes::handlers::run_seg2genes(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}
