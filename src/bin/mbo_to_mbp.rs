//! CLI: replay an MBO CSV file into an MBP-10 CSV file.
//!
//! # Usage
//!
//! ```bash
//! # Writes mbp.csv in the current directory
//! cargo run --release --bin mbo_to_mbp -- data/mbo.csv
//!
//! # Custom output and a JSON run summary
//! cargo run --release --bin mbo_to_mbp -- data/mbo.csv -o out/mbp.csv --stats-json out/report.json
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG=debug` to see unknown cancels and
//! trades against empty levels.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use mbp_reconstructor::replay::{replay_file, ReplayConfig};
use mbp_reconstructor::Result;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "mbo_to_mbp", version, about = "Reconstruct MBP-10 snapshots from an MBO event log")]
struct Args {
    /// MBO input file (CSV, first two records are skipped)
    input: PathBuf,

    /// MBP-10 output file
    #[arg(short, long, default_value = "mbp.csv")]
    output: PathBuf,

    /// Write a JSON summary of the run to this path
    #[arg(long, value_name = "PATH")]
    stats_json: Option<PathBuf>,
}

fn run(args: &Args) -> Result<()> {
    let report = replay_file(&args.input, &args.output, ReplayConfig::default())?;

    log::info!(
        "Wrote {} rows to {}{}",
        report.rows_written,
        args.output.display(),
        report
            .throughput()
            .map(|t| format!(" ({t:.0} events/s)"))
            .unwrap_or_default()
    );

    if let Some(path) = &args.stats_json {
        report.save_json(path)?;
        log::info!("Run summary saved to {}", path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
