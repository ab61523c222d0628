//! # Validate Subcommand
//!
//! Loads a governance bundle, runs the compliance validator, and prints the
//! result. The exit code mirrors the compliance outcome so CI gates can
//! consume it directly.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::bundle::load_engine;

/// Arguments for the `mgov validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the governance bundle (.yaml, .yml, or .json).
    #[arg(long, value_name = "PATH")]
    pub bundle: PathBuf,

    /// Emit the full result as pretty-printed JSON instead of a summary.
    #[arg(long)]
    pub json: bool,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when compliant, 1 when not, 2 on operational error
/// (mapped by `main`).
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let engine = load_engine(&args.bundle)?;
    let result = engine.validate();

    tracing::info!(
        score = result.overall.score,
        compliant = result.overall.compliant,
        critical_violations = result.overall.critical_violations,
        "validation complete"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "score: {}/100  compliant: {}  critical violations: {}",
            result.overall.score, result.overall.compliant, result.overall.critical_violations
        );
        if !result.tenant.missing_required.is_empty() {
            println!("missing required tenant controls:");
            for name in &result.tenant.missing_required {
                println!("  - {name}");
            }
        }
        for issue in &result.tenant.configuration_issues {
            println!("configuration issue: {issue}");
        }
        for (environment_id, violations) in &result.environments {
            if violations.is_empty() {
                continue;
            }
            println!("{environment_id}:");
            for violation in violations {
                println!("  [{:?}] {}", violation.severity, violation.description);
            }
        }
    }

    Ok(if result.overall.compliant { 0 } else { 1 })
}
