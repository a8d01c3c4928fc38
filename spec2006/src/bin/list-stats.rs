use std::path::PathBuf;

use anyhow::Result;
use binutils::{clap, verbose};
use clap::{error::ErrorKind, CommandFactory, Parser};
use spec2006::Report;

/// Tabulate statistics of gem5 output directories.
///
/// Every directory holds one subdirectory per benchmark with a `stats.txt`.
/// The table has a row per benchmark and, for each directory, a column per
/// statistic.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    long_about = None,
    styles = binutils::get_styles(),
)]
struct Args {
    /// gem5 output directories to compare
    #[arg(short, long, num_args = 1..)]
    dirs: Vec<PathBuf>,

    /// Statistics to extract, e.g. `sim_seconds`
    #[arg(short, long, num_args = 0..)]
    stats: Vec<String>,

    #[command(flatten)]
    verbose: verbose::Verbosity,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = binutils::verbose_level_to_trace(args.verbose.log_level());
    binutils::logging_setup(log_level, None::<&std::fs::File>);

    if args.dirs.is_empty() {
        let mut cmd = Args::command();
        cmd.error(
            ErrorKind::MissingRequiredArgument,
            "no target gem5out dirs are specified, use --dirs",
        )
        .exit();
    }

    let report = Report::collect(&args.dirs, &args.stats)?;
    print!("{report}");
    Ok(())
}
