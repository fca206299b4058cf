mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::frontier::PairArgs;

/// Two-asset portfolio mix analysis
#[derive(Parser)]
#[command(
    name = "pmix",
    version,
    about = "Two-asset mean-variance analysis",
    long_about = "Computes expected return, coefficient of variation, covariance and \
                  correlation for two assets, the long-only minimum-variance split, \
                  and the 101-point risk/return frontier from historical close prices."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log debug diagnostics to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Risk/return frontier with the minimum-variance point highlighted
    Frontier(PairArgs),
    /// Per-asset and pairwise statistics
    Stats(PairArgs),
    /// Long-only minimum-variance allocation
    MinVariance(PairArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Frontier(args) => commands::frontier::run_frontier(args),
        Commands::Stats(args) => commands::frontier::run_stats(args),
        Commands::MinVariance(args) => commands::frontier::run_min_variance(args),
        Commands::Version => {
            println!("pmix {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
