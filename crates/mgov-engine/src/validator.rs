//! # Compliance Validator
//!
//! Walks effective controls per environment plus tenant-level requirements
//! and produces a compliance score, violation lists, and an aggregate
//! summary.
//!
//! ## Determinism
//!
//! Validation is idempotent and side-effect-free: repeated runs against an
//! unmutated registry and catalog return bit-identical results. For that
//! reason the result carries no wall-clock field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mgov_core::{
    ComplianceLevel, ControlId, ControlPriority, ControlStatus, EnvironmentContext, EnvironmentId,
    EnvironmentType,
};

use crate::catalog::EnvironmentCatalog;
use crate::registry::ControlRegistry;
use crate::resolver::resolve_environment;

/// Per-environment check categories baked into the score denominator.
///
/// Fixed at 3 for score comparability across runs and releases: the
/// critical-control check, the compliance-level check, and one reserved
/// category. Adding a third implemented check requires revisiting the
/// score formula, not just this constant.
pub const CHECKS_PER_ENVIRONMENT: usize = 3;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Severity of a recorded violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks compliance.
    Critical,
    /// Must be addressed promptly.
    High,
    /// Should be addressed.
    Medium,
    /// Advisory.
    Low,
}

/// One recorded violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The violating control, when the violation is control-level.
    /// Environment-class violations carry no control id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_id: Option<ControlId>,
    /// Severity of the violation.
    pub severity: Severity,
    /// Human-readable description.
    pub description: String,
}

/// The tenant-level sub-result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantCompliance {
    /// Whether the tenant level itself is compliant.
    pub compliant: bool,
    /// Names of required tenant controls that are not enabled.
    pub missing_required: Vec<String>,
    /// Structural issues: tenant records with inherited status, override
    /// maps referencing unknown environments. Reported only; never scored.
    pub configuration_issues: Vec<String>,
}

/// The aggregate summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallCompliance {
    /// 0–100 compliance score.
    pub score: u8,
    /// Whether the violation set is empty.
    pub compliant: bool,
    /// Count of critical-severity violations across all environments.
    pub critical_violations: usize,
}

/// The result of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceResult {
    /// Aggregate summary.
    pub overall: OverallCompliance,
    /// Tenant-level sub-result.
    pub tenant: TenantCompliance,
    /// Violations per environment. Every cataloged environment has an
    /// entry, empty when clean.
    pub environments: BTreeMap<EnvironmentId, Vec<Violation>>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Run the three compliance checks and compute the aggregate score.
pub fn validate(registry: &ControlRegistry, catalog: &EnvironmentCatalog) -> ComplianceResult {
    let tenant = validate_tenant(registry, catalog);

    let mut environments = BTreeMap::new();
    let mut environment_violation_count = 0usize;
    let mut critical_violations = 0usize;

    for environment in catalog.list() {
        let violations = validate_environment(registry, environment);
        environment_violation_count += violations.len();
        critical_violations += violations
            .iter()
            .filter(|v| v.severity == Severity::Critical)
            .count();
        environments.insert(environment.id.clone(), violations);
    }

    let required_count = registry
        .tenant_iter()
        .filter(|c| c.required_at_tenant)
        .count();
    let total_checks = CHECKS_PER_ENVIRONMENT * catalog.len() + required_count;
    let total_violations = tenant.missing_required.len() + environment_violation_count;

    let score = score(total_checks, total_violations);
    let compliant = total_violations == 0;

    ComplianceResult {
        overall: OverallCompliance {
            score,
            compliant,
            critical_violations,
        },
        tenant,
        environments,
    }
}

/// Tenant check: required controls must be enabled; structural issues are
/// collected alongside.
fn validate_tenant(registry: &ControlRegistry, catalog: &EnvironmentCatalog) -> TenantCompliance {
    let mut missing_required = Vec::new();
    let mut configuration_issues = Vec::new();

    for control in registry.tenant_iter() {
        if control.required_at_tenant && control.status != ControlStatus::Enabled {
            missing_required.push(control.name.clone());
        }
        if control.status == ControlStatus::Inherited {
            configuration_issues.push(format!(
                "tenant record '{}' carries inherited status",
                control.id
            ));
        }
    }

    // Orphan references: override maps pointing at environments the catalog
    // does not know. A validator concern, not a registry concern.
    for environment_id in registry.environment_ids_with_overrides() {
        if !catalog.contains(&environment_id) {
            configuration_issues.push(format!(
                "overrides reference unknown environment '{environment_id}'"
            ));
        }
    }

    TenantCompliance {
        compliant: missing_required.is_empty() && configuration_issues.is_empty(),
        missing_required,
        configuration_issues,
    }
}

/// Per-environment check: disabled critical effective controls, plus the
/// environment-class rule for production scopes.
fn validate_environment(
    registry: &ControlRegistry,
    environment: &EnvironmentContext,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for effective in resolve_environment(registry, environment) {
        let control = &effective.control;
        if control.priority == ControlPriority::Critical
            && control.status == ControlStatus::Disabled
        {
            violations.push(Violation {
                control_id: Some(control.id.clone()),
                severity: Severity::Critical,
                description: format!("critical control '{}' is disabled", control.name),
            });
        }
    }

    // Environment-class rule, layered on top of control-level rules.
    if environment.environment_type == EnvironmentType::Prod
        && environment.compliance_level != ComplianceLevel::Strict
    {
        violations.push(Violation {
            control_id: None,
            severity: Severity::High,
            description: format!(
                "production environment '{}' compliance level is not strict",
                environment.id
            ),
        });
    }

    violations
}

/// `round(100 × (checks − violations) / checks)`, clamped to [0, 100].
///
/// Zero checks means there is nothing to violate: score 100.
fn score(total_checks: usize, total_violations: usize) -> u8 {
    if total_checks == 0 {
        return 100;
    }
    let passed = total_checks.saturating_sub(total_violations);
    let ratio = passed as f64 / total_checks as f64;
    (ratio * 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgov_core::{ControlType, GovernanceControl, TenantId};

    fn control(id: &str) -> GovernanceControl {
        GovernanceControl::new(
            ControlId::new(id).unwrap(),
            format!("Control {id}"),
            ControlType::Compliance,
        )
    }

    fn environment(id: &str, env_type: EnvironmentType) -> EnvironmentContext {
        EnvironmentContext::new(
            EnvironmentId::new(id).unwrap(),
            id.to_string(),
            env_type,
            "eu-west-1",
            TenantId::new(),
        )
    }

    #[test]
    fn empty_system_scores_100_and_compliant() {
        let result = validate(&ControlRegistry::new(), &EnvironmentCatalog::new());
        assert_eq!(result.overall.score, 100);
        assert!(result.overall.compliant);
        assert_eq!(result.overall.critical_violations, 0);
        assert!(result.tenant.compliant);
        assert!(result.environments.is_empty());
    }

    #[test]
    fn required_disabled_control_is_listed_by_name() {
        let mut registry = ControlRegistry::new();
        registry.put_tenant_control(
            control("mfa")
                .with_required_at_tenant(true)
                .with_status(ControlStatus::Disabled),
        );

        let result = validate(&registry, &EnvironmentCatalog::new());
        assert!(!result.tenant.compliant);
        assert_eq!(result.tenant.missing_required, vec!["Control mfa"]);
        assert!(!result.overall.compliant);
        // One required check, one violation: score 0.
        assert_eq!(result.overall.score, 0);
    }

    #[test]
    fn prod_environment_below_strict_is_one_high_violation() {
        let mut catalog = EnvironmentCatalog::new();
        catalog.upsert(
            environment("prod-1", EnvironmentType::Prod)
                .with_compliance_level(ComplianceLevel::Standard),
        );

        let result = validate(&ControlRegistry::new(), &catalog);
        let violations = &result.environments[&EnvironmentId::new("prod-1").unwrap()];
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::High);
        assert!(violations[0].control_id.is_none());
        // 3 checks for the one environment, 1 violation: round(200/3) = 67.
        assert_eq!(result.overall.score, 67);
        assert_eq!(result.overall.critical_violations, 0);
    }

    #[test]
    fn strict_prod_environment_is_clean() {
        let mut catalog = EnvironmentCatalog::new();
        catalog.upsert(
            environment("prod-1", EnvironmentType::Prod)
                .with_compliance_level(ComplianceLevel::Strict),
        );

        let result = validate(&ControlRegistry::new(), &catalog);
        assert!(result.overall.compliant);
        assert_eq!(result.overall.score, 100);
        assert!(result.environments[&EnvironmentId::new("prod-1").unwrap()].is_empty());
    }

    #[test]
    fn non_prod_environment_has_no_compliance_level_rule() {
        let mut catalog = EnvironmentCatalog::new();
        catalog.upsert(
            environment("dev-1", EnvironmentType::Dev)
                .with_compliance_level(ComplianceLevel::Relaxed),
        );

        let result = validate(&ControlRegistry::new(), &catalog);
        assert!(result.overall.compliant);
    }

    #[test]
    fn disabled_critical_effective_control_is_critical_violation() {
        let mut registry = ControlRegistry::new();
        registry.put_tenant_control(control("backup").with_priority(ControlPriority::Critical));
        let env_id = EnvironmentId::new("e1").unwrap();
        registry.put_environment_control(
            &env_id,
            control("backup").with_status(ControlStatus::Disabled),
        );

        let mut catalog = EnvironmentCatalog::new();
        catalog.upsert(
            environment("e1", EnvironmentType::Prod).with_compliance_level(ComplianceLevel::Strict),
        );

        let result = validate(&registry, &catalog);
        let violations = &result.environments[&env_id];
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Critical);
        assert_eq!(
            violations[0].control_id.as_ref().unwrap().as_str(),
            "backup"
        );
        assert_eq!(result.overall.critical_violations, 1);
    }

    #[test]
    fn orphan_override_map_is_a_configuration_issue() {
        let mut registry = ControlRegistry::new();
        registry.put_environment_control(&EnvironmentId::new("ghost").unwrap(), control("c1"));

        let result = validate(&registry, &EnvironmentCatalog::new());
        assert!(!result.tenant.compliant);
        assert_eq!(result.tenant.configuration_issues.len(), 1);
        assert!(result.tenant.configuration_issues[0].contains("ghost"));
        // Configuration issues never feed the score.
        assert_eq!(result.overall.score, 100);
        assert!(result.overall.compliant);
    }

    #[test]
    fn validation_is_idempotent() {
        let mut registry = ControlRegistry::new();
        registry.put_tenant_control(
            control("mfa")
                .with_required_at_tenant(true)
                .with_priority(ControlPriority::Critical),
        );
        let mut catalog = EnvironmentCatalog::new();
        catalog.upsert(environment("e1", EnvironmentType::Prod));
        catalog.upsert(environment("e2", EnvironmentType::Dev));

        let first = validate(&registry, &catalog);
        let second = validate(&registry, &catalog);
        assert_eq!(first, second);
        let first_json = serde_json::to_string(&first).unwrap();
        let second_json = serde_json::to_string(&second).unwrap();
        assert_eq!(first_json, second_json);
    }

    #[test]
    fn score_never_goes_below_zero() {
        // One environment (3 checks) with many disabled critical controls.
        let mut registry = ControlRegistry::new();
        for i in 0..8 {
            registry.put_tenant_control(
                control(&format!("c{i}"))
                    .with_priority(ControlPriority::Critical)
                    .with_status(ControlStatus::Enabled),
            );
            registry.put_environment_control(
                &EnvironmentId::new("e1").unwrap(),
                control(&format!("c{i}")).with_status(ControlStatus::Disabled),
            );
        }
        let mut catalog = EnvironmentCatalog::new();
        catalog.upsert(environment("e1", EnvironmentType::Prod));

        let result = validate(&registry, &catalog);
        // 8 critical violations + 1 compliance-level violation > 3 checks.
        assert_eq!(result.overall.score, 0);
        assert!(!result.overall.compliant);
        assert_eq!(result.overall.critical_violations, 8);
    }

    #[test]
    fn score_helper_edges() {
        assert_eq!(score(0, 0), 100);
        assert_eq!(score(4, 0), 100);
        assert_eq!(score(4, 4), 0);
        assert_eq!(score(4, 40), 0);
        assert_eq!(score(3, 1), 67);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn score_is_always_in_bounds(checks in 0usize..10_000, violations in 0usize..10_000) {
                let s = score(checks, violations);
                prop_assert!(s <= 100);
            }
        }
    }
}
