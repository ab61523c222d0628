//! # mgov-engine — Hierarchical Policy Control Engine
//!
//! Manages organization-wide (tenant) controls and per-environment
//! overrides, resolves inheritance and conflicts between the two, and
//! computes compliance scores and violation sets.
//!
//! ## Data Flow
//!
//! Environment Catalog + Control Registry → Applicability Matcher →
//! Inheritance Resolver → effective controls → Compliance Validator →
//! Governance Reporter. The flow is one-directional; every downstream value
//! ([`EffectiveControl`], [`ComplianceResult`]) is transient and recomputed
//! on demand from the registry and catalog, never cached as a source of
//! truth.
//!
//! ## Conflict Model
//!
//! Policy conflicts are expected data, not errors. An override attempted
//! against a non-overridable tenant control is stored anyway and surfaced
//! as a [`Conflict`] value — from the write itself and again on every
//! resolution — so administrative intent stays auditable.

pub mod applicability;
pub mod catalog;
pub mod engine;
pub mod registry;
pub mod reporter;
pub mod resolver;
pub mod validator;

// Re-export primary types for ergonomic imports.
pub use applicability::applies;
pub use catalog::EnvironmentCatalog;
pub use engine::GovernanceEngine;
pub use registry::{ControlFilter, ControlRegistry};
pub use reporter::{report, EnvironmentSummary, GovernanceReport};
pub use resolver::{
    resolve_environment, Conflict, ConflictResolution, ConflictType, EffectiveControl, Provenance,
};
pub use validator::{
    validate, ComplianceResult, OverallCompliance, Severity, TenantCompliance, Violation,
    CHECKS_PER_ENVIRONMENT,
};
