//! # Inheritance Resolver
//!
//! Combines tenant controls with per-environment overrides into effective
//! controls, recording every disagreement as a [`Conflict`] value rather
//! than a log line.
//!
//! ## Resolution Order
//!
//! 1. Enabled, applicable tenant controls in insertion order — emitted
//!    verbatim, merged with a permitted override, or emitted tenant-wins
//!    when the override is forbidden.
//! 2. Environment-only controls (no tenant counterpart) appended afterwards.
//!
//! No further sorting is imposed; callers sort for display if needed.
//!
//! ## Merge Policy
//!
//! An override is a partial patch of its tenant counterpart, never a full
//! redefinition:
//! - `enforcement`: the override wins only when the tenant enforcement is
//!   not already `Strict` — strict is a floor, not a default.
//! - `configuration`: shallow key-wise union; override keys replace.
//! - `status`: the override's status wins.
//! - Identity, classification, applicability, and metadata always come from
//!   the tenant record.

use serde::{Deserialize, Serialize};

use mgov_core::{
    ControlId, ControlLevel, ControlStatus, EnforcementMode, EnvironmentContext, EnvironmentId,
    GovernanceControl,
};

use crate::applicability::applies;
use crate::registry::ControlRegistry;

// ---------------------------------------------------------------------------
// Conflict
// ---------------------------------------------------------------------------

/// What kind of disagreement a conflict records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictType {
    /// Override attempted where the tenant control forbids overriding.
    Scope,
    /// Override attempted to weaken a strict tenant enforcement.
    Enforcement,
    /// Configuration disagreement.
    Configuration,
}

/// How a recorded conflict was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictResolution {
    /// The tenant record was kept.
    TenantWins,
    /// The environment record was kept.
    EnvironmentWins,
    /// The two records were merged.
    Merge,
    /// The conflict could not be resolved.
    Error,
}

/// A recorded disagreement between a tenant control's override policy and
/// an attempted environment override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// The environment whose override triggered the conflict.
    pub environment_id: EnvironmentId,
    /// The control in disagreement.
    pub control_id: ControlId,
    /// The dimension of the disagreement.
    pub conflict_type: ConflictType,
    /// Human-readable description.
    pub description: String,
    /// The resolution that was taken.
    pub resolution: ConflictResolution,
}

// ---------------------------------------------------------------------------
// EffectiveControl
// ---------------------------------------------------------------------------

/// Where an effective control's content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Emitted from the tenant record.
    Tenant,
    /// Emitted from (or merged with) an environment record.
    EnvironmentOverride,
}

/// The final, resolved policy that applies to one environment.
///
/// Transient — recomputed on demand from the registry and catalog, never
/// cached as a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveControl {
    /// The resolved control record.
    pub control: GovernanceControl,
    /// Where the content came from.
    pub provenance: Provenance,
    /// Conflicts recorded while resolving this control.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<Conflict>,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve every control in effect for one environment.
pub fn resolve_environment(
    registry: &ControlRegistry,
    environment: &EnvironmentContext,
) -> Vec<EffectiveControl> {
    let mut effective = Vec::new();

    // Pass 1: tenant controls in insertion order.
    for tenant_control in registry.tenant_iter() {
        if tenant_control.status != ControlStatus::Enabled {
            continue;
        }
        if !applies(tenant_control, environment) {
            continue;
        }

        match registry.override_for(&environment.id, &tenant_control.id) {
            None => {
                let mut control = tenant_control.clone();
                control.level = ControlLevel::Tenant;
                effective.push(EffectiveControl {
                    control,
                    provenance: Provenance::Tenant,
                    conflicts: Vec::new(),
                });
            }
            Some(override_control) if tenant_control.override_allowed => {
                let (control, conflicts) =
                    merge(tenant_control, override_control, &environment.id);
                effective.push(EffectiveControl {
                    control,
                    provenance: Provenance::EnvironmentOverride,
                    conflicts,
                });
            }
            Some(_) => {
                // Tenant wins unchanged; the attempt is recorded, not hidden.
                let mut control = tenant_control.clone();
                control.level = ControlLevel::Tenant;
                effective.push(EffectiveControl {
                    control,
                    provenance: Provenance::Tenant,
                    conflicts: vec![Conflict {
                        environment_id: environment.id.clone(),
                        control_id: tenant_control.id.clone(),
                        conflict_type: ConflictType::Scope,
                        description: format!(
                            "environment override of non-overridable control '{}' ignored",
                            tenant_control.id
                        ),
                        resolution: ConflictResolution::TenantWins,
                    }],
                });
            }
        }
    }

    // Pass 2: environment-only controls (no tenant counterpart).
    for local in registry.environment_iter(&environment.id) {
        if registry.tenant_control(&local.id).is_some() {
            continue;
        }
        let mut control = local.clone();
        control.level = ControlLevel::Environment;
        effective.push(EffectiveControl {
            control,
            provenance: Provenance::EnvironmentOverride,
            conflicts: Vec::new(),
        });
    }

    tracing::debug!(
        environment_id = %environment.id,
        effective_count = effective.len(),
        "environment resolved"
    );
    effective
}

/// Merge a permitted override into its tenant counterpart.
fn merge(
    tenant: &GovernanceControl,
    overlay: &GovernanceControl,
    environment_id: &EnvironmentId,
) -> (GovernanceControl, Vec<Conflict>) {
    let mut merged = tenant.clone();
    let mut conflicts = Vec::new();

    // Enforcement: strict tenant enforcement is a floor.
    if tenant.enforcement == EnforcementMode::Strict {
        if overlay.enforcement != EnforcementMode::Strict {
            conflicts.push(Conflict {
                environment_id: environment_id.clone(),
                control_id: tenant.id.clone(),
                conflict_type: ConflictType::Enforcement,
                description: format!(
                    "override cannot weaken strict enforcement of '{}'",
                    tenant.id
                ),
                resolution: ConflictResolution::TenantWins,
            });
        }
    } else {
        merged.enforcement = overlay.enforcement;
    }

    // Configuration: key-wise union, overlay keys win.
    merged.configuration = tenant.configuration.merged_with(&overlay.configuration);

    // Status: the override's status wins.
    merged.status = overlay.status;

    merged.level = ControlLevel::Environment;
    (merged, conflicts)
}
