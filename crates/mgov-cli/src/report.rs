//! # Report Subcommand
//!
//! Prints the dashboard aggregates: control counts by level, type, and
//! priority, plus per-environment summary cards.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::bundle::load_engine;

/// Arguments for the `mgov report` subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Path to the governance bundle (.yaml, .yml, or .json).
    #[arg(long, value_name = "PATH")]
    pub bundle: PathBuf,
}

/// Execute the report subcommand.
pub fn run_report(args: &ReportArgs) -> Result<u8> {
    let engine = load_engine(&args.bundle)?;
    let report = engine.report();

    tracing::info!(
        tenant_controls = report.tenant_control_count,
        environment_controls = report.environment_control_count,
        environments = report.environments.len(),
        "report built"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}
