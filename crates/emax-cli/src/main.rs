//! emax - partition metric validation CLI
//!
//! Usage:
//!   emax validate --input raw.csv --output pages.csv            # Check every K page
//!   emax validate --input raw.csv --output pages.csv --k 4      # Check one K
//!   emax validate ... --abs-tol 1e-9 --rel-tol 1e-6             # Separate bounds
//!   emax metrics --input raw.csv --output pages.csv --groups    # Recompute only

use clap::{Parser, Subcommand, ValueEnum};
use entropymax::preprocessing::Normalization;
use entropymax::validation::{Tolerance, ValidationConfig, DEFAULT_EPS};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod commands;
mod error;
mod output;

use commands::{metrics, validate};

/// emax - recompute and check partition-quality metrics
///
/// Reads a raw composition table and a file of reported K pages, then
/// recomputes inequality, sum-of-squares and Calinski-Harabasz statistics
/// for every page.
#[derive(Parser)]
#[command(name = "emax")]
#[command(author, about, long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("EMAX_GIT_SHA"), ")"))]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Preprocessing applied to the raw table.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum NormalizeArg {
    /// Percent of the grand total
    #[default]
    GrandTotal,
    /// Percent of each row's total
    Row,
    /// Raw values
    None,
}

impl From<NormalizeArg> for Normalization {
    fn from(arg: NormalizeArg) -> Self {
        match arg {
            NormalizeArg::GrandTotal => Normalization::GrandTotal,
            NormalizeArg::Row => Normalization::Row,
            NormalizeArg::None => Normalization::None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check reported metrics against recomputed values
    Validate {
        /// Raw composition CSV (Sample Name, bins...)
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Reported pages CSV (K, Group, Sample, bins..., metrics...)
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Validate only this K page
        #[arg(long)]
        k: Option<usize>,

        /// Tolerance for both the absolute and relative test
        #[arg(long, default_value_t = DEFAULT_EPS)]
        tol: f64,

        /// Absolute tolerance (overrides --tol)
        #[arg(long)]
        abs_tol: Option<f64>,

        /// Relative tolerance (overrides --tol)
        #[arg(long)]
        rel_tol: Option<f64>,

        /// Preprocessing mode
        #[arg(long, value_enum, default_value_t = NormalizeArg::GrandTotal)]
        normalize: NormalizeArg,
    },

    /// Recompute and print metrics without comparing
    Metrics {
        /// Raw composition CSV (Sample Name, bins...)
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Reported pages CSV (K, Group, Sample, ...)
        #[arg(long, value_name = "FILE")]
        output: PathBuf,

        /// Only this K page
        #[arg(long)]
        k: Option<usize>,

        /// Show per-group means and Z statistics
        #[arg(long)]
        groups: bool,

        /// Preprocessing mode
        #[arg(long, value_enum, default_value_t = NormalizeArg::GrandTotal)]
        normalize: NormalizeArg,
    },
}

fn init_tracing(verbose: bool, quiet: bool) {
    let log_level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: logging disabled: {e}");
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Validate {
            input,
            output,
            k,
            tol,
            abs_tol,
            rel_tol,
            normalize,
        } => {
            let config = ValidationConfig::default()
                .with_tolerance(Tolerance::new(abs_tol.unwrap_or(tol), rel_tol.unwrap_or(tol)))
                .with_k(k)
                .with_normalization(normalize.into());
            validate::run(&input, &output, config, cli.json, cli.quiet)
        }

        Commands::Metrics {
            input,
            output,
            k,
            groups,
            normalize,
        } => metrics::run(&input, &output, k, normalize.into(), groups, cli.json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}
