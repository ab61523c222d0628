//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the Governance Control Plane.
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Caller mistakes (malformed controls, unknown environments) surface as
//!   typed variants, never as panics.
//! - Policy conflicts are **not** errors: an override attempted against a
//!   non-overridable control is recorded as data by the engine and the write
//!   still succeeds, preserving the audit trail of administrative intent.

use thiserror::Error;

/// Top-level error type for the Governance Control Plane.
#[derive(Error, Debug)]
pub enum GovError {
    /// A control or identifier failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An operation referenced an environment the catalog does not know.
    /// The engine never guesses or auto-creates environments.
    #[error("environment not found: {id}")]
    EnvironmentNotFound {
        /// The environment identifier that was not found.
        id: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error constructing or validating a domain value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An identifier was empty or whitespace-only.
    #[error("empty identifier for {kind}")]
    EmptyIdentifier {
        /// The kind of identifier being constructed (e.g. "control id").
        kind: &'static str,
    },

    /// A control record was missing a required field.
    #[error("malformed control {id}: {reason}")]
    MalformedControl {
        /// The control id, if one was supplied.
        id: String,
        /// Why the record was rejected.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_not_found_display() {
        let err = GovError::EnvironmentNotFound {
            id: "env-prod-eu".to_string(),
        };
        assert_eq!(err.to_string(), "environment not found: env-prod-eu");
    }

    #[test]
    fn validation_error_converts_to_gov_error() {
        let err: GovError = ValidationError::EmptyIdentifier { kind: "control id" }.into();
        assert!(err.to_string().contains("empty identifier"));
    }

    #[test]
    fn malformed_control_names_the_record() {
        let err = ValidationError::MalformedControl {
            id: "mfa".to_string(),
            reason: "missing name".to_string(),
        };
        assert_eq!(err.to_string(), "malformed control mfa: missing name");
    }
}
