//! # Governance Reporter
//!
//! Thin read-only aggregation over the registry, catalog, resolver, and
//! validator for dashboard consumption. Contains no decision logic.
//!
//! The per-environment summary score is the cheap display heuristic
//! `max(0, 100 − 10 × violation_count)` — deliberately distinct from the
//! validator's full score and never a substitute for it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use mgov_core::{
    ControlPriority, ControlType, EnvironmentId, EnvironmentType,
};

use crate::catalog::EnvironmentCatalog;
use crate::registry::ControlRegistry;
use crate::resolver::resolve_environment;
use crate::validator::validate;

/// Summary-card data for one environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSummary {
    /// Environment id.
    pub id: EnvironmentId,
    /// Human-readable name.
    pub name: String,
    /// Deployment class.
    pub environment_type: EnvironmentType,
    /// Number of effective controls for the environment.
    pub control_count: usize,
    /// Number of violations from the last validation.
    pub violation_count: usize,
    /// Display heuristic: `max(0, 100 − 10 × violation_count)`.
    pub score: u8,
    /// Users with access (reporting only).
    pub user_count: u64,
    /// Governed assets (reporting only).
    pub asset_count: u64,
}

/// Dashboard aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceReport {
    /// Number of tenant-level control records.
    pub tenant_control_count: usize,
    /// Number of environment-level control records across all environments.
    pub environment_control_count: usize,
    /// All control records grouped by type.
    pub controls_by_type: BTreeMap<ControlType, usize>,
    /// All control records grouped by priority.
    pub controls_by_priority: BTreeMap<ControlPriority, usize>,
    /// One summary per cataloged environment, in id order.
    pub environments: Vec<EnvironmentSummary>,
}

/// The summary-card score heuristic.
fn display_score(violation_count: usize) -> u8 {
    (100i64 - 10 * violation_count as i64).max(0) as u8
}

/// Build dashboard aggregates from the current registry and catalog state.
pub fn report(registry: &ControlRegistry, catalog: &EnvironmentCatalog) -> GovernanceReport {
    let mut controls_by_type: BTreeMap<ControlType, usize> = BTreeMap::new();
    let mut controls_by_priority: BTreeMap<ControlPriority, usize> = BTreeMap::new();

    let count = |by_type: &mut BTreeMap<ControlType, usize>,
                 by_priority: &mut BTreeMap<ControlPriority, usize>,
                 control: &mgov_core::GovernanceControl| {
        *by_type.entry(control.control_type).or_default() += 1;
        *by_priority.entry(control.priority).or_default() += 1;
    };

    for control in registry.tenant_iter() {
        count(&mut controls_by_type, &mut controls_by_priority, control);
    }
    for environment_id in registry.environment_ids_with_overrides() {
        for control in registry.environment_iter(&environment_id) {
            count(&mut controls_by_type, &mut controls_by_priority, control);
        }
    }

    let compliance = validate(registry, catalog);
    let environments = catalog
        .list()
        .map(|environment| {
            let violation_count = compliance
                .environments
                .get(&environment.id)
                .map_or(0, Vec::len);
            EnvironmentSummary {
                id: environment.id.clone(),
                name: environment.name.clone(),
                environment_type: environment.environment_type,
                control_count: resolve_environment(registry, environment).len(),
                violation_count,
                score: display_score(violation_count),
                user_count: environment.user_count,
                asset_count: environment.asset_count,
            }
        })
        .collect();

    GovernanceReport {
        tenant_control_count: registry.tenant_len(),
        environment_control_count: registry.environment_record_count(),
        controls_by_type,
        controls_by_priority,
        environments,
    }
}
