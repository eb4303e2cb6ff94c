//! # Main — CLI Entry Point
//!
//! Parses arguments, initialises logging and the rayon pool, then hands off
//! to the subcommand functions in `cli.rs`.
//!
//! ## Subcommands
//!
//! - `check`: run the layered test on numbers given on the command line.
//! - `file`: every integer in a list file must be prime (or composite).
//! - `range`: every odd `n` in a range, checked against the reference oracle.
//! - `run`: the full validation run described by a TOML config.
//!
//! ## Global Options
//!
//! - `--threads`: Rayon thread pool size (default: all cores).
//! - `--aux` / `SHUNIA_AUX`: auxiliary check, `power` (default) or `gcd`.
//! - `--ring` / `SHUNIA_RING`: ring comparison, `eval` (default) or
//!   `coefficients`.
//! - `--log-all`: log every individual verdict at `info`.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use shunia::{AuxCheck, RingCheck};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(
    name = "shunia",
    version,
    about = "Layered probable-prime test and its validation harness"
)]
struct Cli {
    /// Number of rayon worker threads (defaults to all logical cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Auxiliary check applied before the ring gate: power or gcd
    #[arg(long, global = true, env = "SHUNIA_AUX")]
    aux: Option<AuxCheck>,

    /// Ring gate comparison: eval or coefficients
    #[arg(long, global = true, env = "SHUNIA_RING")]
    ring: Option<RingCheck>,

    /// Log every individual verdict
    #[arg(long, global = true)]
    log_all: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Expect {
    Prime,
    Composite,
}

#[derive(Subcommand)]
enum Commands {
    /// Test the given numbers and print each verdict
    Check {
        /// Decimal integers to test
        #[arg(required = true, allow_negative_numbers = true)]
        numbers: Vec<String>,
        /// Print one JSON object per number
        #[arg(long)]
        json: bool,
    },
    /// Check every integer in a list file against an expected verdict
    File {
        /// One decimal integer per line
        path: PathBuf,
        /// Verdict every entry must get
        #[arg(long, value_enum)]
        expect: Expect,
        /// Read at most this many integers (0 = all)
        #[arg(long, default_value_t = 0)]
        count: usize,
    },
    /// Check every odd n in [start, end) against the reference oracle
    Range {
        /// First candidate (rounded up to odd)
        #[arg(long, default_value_t = 5)]
        start: u64,
        /// End of range (exclusive)
        #[arg(long)]
        end: u64,
        /// Checkpoint file for resuming an interrupted sweep
        #[arg(long)]
        checkpoint: Option<PathBuf>,
        /// Candidates per parallel block and per checkpoint
        #[arg(long, default_value_t = 10_000)]
        block_size: usize,
    },
    /// Run the suites enabled in a TOML config
    Run {
        /// Harness config (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Checkpoint file for the range suite
        #[arg(long, default_value = "shunia.checkpoint")]
        checkpoint: PathBuf,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // LOG_FORMAT=json for log shippers, human-readable otherwise; stdout is reserved for reports
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    cli::configure_rayon(cli.threads);

    match &cli.command {
        Commands::Check { numbers, json } => cli::run_check(&cli, numbers, *json),
        Commands::File {
            path,
            expect,
            count,
        } => cli::run_file(&cli, path, *expect == Expect::Prime, *count),
        Commands::Range {
            start,
            end,
            checkpoint,
            block_size,
        } => cli::run_range(&cli, *start, *end, checkpoint.as_deref(), *block_size),
        Commands::Run { config, checkpoint } => {
            cli::run_configured(&cli, config.as_deref(), checkpoint)
        }
    }
}
