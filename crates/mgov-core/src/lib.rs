//! # mgov-core — Foundational Types for the Governance Control Plane
//!
//! This crate is the bedrock of the Momentum Governance Control Plane. It
//! defines the type-system primitives the policy engine operates on. Every
//! other crate in the workspace depends on `mgov-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** [`ControlId`],
//!    [`EnvironmentId`], [`TenantId`] — all newtypes with validated
//!    constructors. No bare strings for identifiers.
//!
//! 2. **Typed configuration.** Control settings are a
//!    [`Configuration`] ordered map of [`ConfigValue`] sum-type entries,
//!    preserving the key-wise union merge semantics without an untyped bag.
//!
//! 3. **Exhaustive classification enums.** [`ControlType`],
//!    [`ControlPriority`], [`EnforcementMode`] and friends are closed enums
//!    matched exhaustively; adding a variant forces every consumer to
//!    handle it.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mgov-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize`.

pub mod config;
pub mod control;
pub mod environment;
pub mod error;
pub mod identity;

// Re-export primary types for ergonomic imports.
pub use config::{ConfigValue, Configuration};
pub use control::{
    Applicability, ApplicabilitySet, ControlLevel, ControlMetadata, ControlPriority, ControlScope,
    ControlStatus, ControlType, EnforcementMode, GovernanceControl, WILDCARD,
};
pub use environment::{
    BusinessCriticality, ComplianceLevel, DataClassification, EnvironmentContext, EnvironmentType,
};
pub use error::{GovError, ValidationError};
pub use identity::{ControlId, EnvironmentId, TenantId};
