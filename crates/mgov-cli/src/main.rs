//! # mgov CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros for argument parsing.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mgov_cli::effective::{run_effective, EffectiveArgs};
use mgov_cli::report::{run_report, ReportArgs};
use mgov_cli::validate::{run_validate, ValidateArgs};

/// Momentum Governance Control Plane CLI
///
/// Loads governance bundles (tenant controls, environments, environment
/// overrides), resolves control inheritance, and computes compliance
/// results for dashboards and CI gates.
#[derive(Parser, Debug)]
#[command(name = "mgov", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the compliance validator over a governance bundle.
    Validate(ValidateArgs),

    /// Resolve the effective controls for one environment.
    Effective(EffectiveArgs),

    /// Print dashboard aggregates for a governance bundle.
    Report(ReportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Effective(args) => run_effective(&args),
        Commands::Report(args) => run_report(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
