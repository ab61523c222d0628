//! # Effective Subcommand
//!
//! Prints the resolved (effective) controls for one environment, including
//! provenance and any recorded conflicts — the inheritance-matrix view.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mgov_core::EnvironmentId;

use crate::bundle::load_engine;

/// Arguments for the `mgov effective` subcommand.
#[derive(Args, Debug)]
pub struct EffectiveArgs {
    /// Path to the governance bundle (.yaml, .yml, or .json).
    #[arg(long, value_name = "PATH")]
    pub bundle: PathBuf,

    /// The environment to resolve.
    #[arg(long, value_name = "ID")]
    pub environment: String,
}

/// Execute the effective subcommand.
pub fn run_effective(args: &EffectiveArgs) -> Result<u8> {
    let engine = load_engine(&args.bundle)?;
    let environment_id =
        EnvironmentId::new(args.environment.clone()).context("invalid environment id")?;

    let effective = engine
        .effective_controls(&environment_id)
        .with_context(|| format!("cannot resolve environment '{environment_id}'"))?;

    tracing::info!(
        environment_id = %environment_id,
        effective_count = effective.len(),
        "environment resolved"
    );

    println!("{}", serde_json::to_string_pretty(&effective)?);
    Ok(0)
}
