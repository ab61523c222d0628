//! # mgov-cli — CLI Tool for the Governance Control Plane
//!
//! Provides the `mgov` command-line interface over the policy engine.
//!
//! ## Subcommands
//!
//! - `mgov validate` — Run the compliance validator over a bundle.
//! - `mgov effective` — Resolve effective controls for one environment.
//! - `mgov report` — Dashboard aggregates for summary cards.
//!
//! ```bash
//! mgov validate --bundle governance.yaml
//! mgov effective --bundle governance.yaml --environment prod-eu
//! mgov report --bundle governance.yaml
//! ```

pub mod bundle;
pub mod effective;
pub mod report;
pub mod validate;
