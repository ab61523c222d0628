//! # Applicability Matcher
//!
//! Pure predicate deciding whether a control's declared applicability covers
//! a given environment. No side effects; safe to call concurrently from any
//! number of resolutions.

use mgov_core::{EnvironmentContext, GovernanceControl};

/// Whether `control` applies to `environment`.
///
/// The environment-type and region dimensions must each match (set
/// membership or wildcard). The role dimension is declarative only in this
/// engine: live role checks belong to a separate authorization concern, so
/// a control that names any roles (or the wildcard) is treated as
/// applicable for presence purposes. An empty type or region set matches
/// nothing.
pub fn applies(control: &GovernanceControl, environment: &EnvironmentContext) -> bool {
    let applies_to = &control.applies_to;

    if !applies_to
        .environment_types
        .matches(environment.environment_type.as_str())
    {
        return false;
    }

    if !applies_to.regions.matches(&environment.region) {
        return false;
    }

    // Role dimension: evaluated elsewhere; always passes here.
    true
}
