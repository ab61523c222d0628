//! # Control Registry
//!
//! Exclusive owner of all [`GovernanceControl`] records: one
//! insertion-ordered tenant map, plus one override map per environment.
//!
//! ## Write Semantics
//!
//! - Insertion stamps [`ControlLevel`] according to where the record lands;
//!   the caller's value is never trusted.
//! - A record whose declared scope contradicts its placement is widened to
//!   `Both` rather than rejected.
//! - An environment write targeting a non-overridable tenant control still
//!   succeeds — the registry flags it as a latent [`Conflict`] and logs it,
//!   preserving the audit trail of attempted overrides. The resolver
//!   surfaces the same conflict on every resolution.
//! - Updates are full-record replacement keyed by id; replacement keeps the
//!   record's original position in insertion order.

use std::collections::HashMap;

use mgov_core::{
    ControlId, ControlLevel, ControlPriority, ControlScope, ControlStatus, ControlType,
    EnvironmentContext, EnvironmentId, GovernanceControl,
};

use crate::applicability::applies;
use crate::resolver::{Conflict, ConflictResolution, ConflictType};

// ---------------------------------------------------------------------------
// ControlFilter
// ---------------------------------------------------------------------------

/// Exact-match filter for registry listings.
///
/// Unset dimensions match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFilter {
    /// Match on control type.
    pub control_type: Option<ControlType>,
    /// Match on priority.
    pub priority: Option<ControlPriority>,
    /// Match on status.
    pub status: Option<ControlStatus>,
}

impl ControlFilter {
    /// A filter that matches every control.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to one control type.
    pub fn with_type(mut self, control_type: ControlType) -> Self {
        self.control_type = Some(control_type);
        self
    }

    /// Restrict to one priority.
    pub fn with_priority(mut self, priority: ControlPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restrict to one status.
    pub fn with_status(mut self, status: ControlStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Whether a control passes every set dimension.
    pub fn accepts(&self, control: &GovernanceControl) -> bool {
        self.control_type
            .map_or(true, |t| control.control_type == t)
            && self.priority.map_or(true, |p| control.priority == p)
            && self.status.map_or(true, |s| control.status == s)
    }
}

// ---------------------------------------------------------------------------
// OrderedControls
// ---------------------------------------------------------------------------

/// Controls keyed by id, iterated in first-insertion order.
///
/// Replacement by id keeps the original position so resolution output stays
/// stable across updates.
#[derive(Debug, Clone, Default)]
struct OrderedControls {
    order: Vec<ControlId>,
    records: HashMap<ControlId, GovernanceControl>,
}

impl OrderedControls {
    fn insert(&mut self, control: GovernanceControl) {
        if !self.records.contains_key(&control.id) {
            self.order.push(control.id.clone());
        }
        self.records.insert(control.id.clone(), control);
    }

    fn get(&self, id: &ControlId) -> Option<&GovernanceControl> {
        self.records.get(id)
    }

    fn contains(&self, id: &ControlId) -> bool {
        self.records.contains_key(id)
    }

    fn iter(&self) -> impl Iterator<Item = &GovernanceControl> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

// ---------------------------------------------------------------------------
// ControlRegistry
// ---------------------------------------------------------------------------

/// The canonical store of tenant controls and per-environment overrides.
#[derive(Debug, Clone, Default)]
pub struct ControlRegistry {
    tenant: OrderedControls,
    overrides: HashMap<EnvironmentId, OrderedControls>,
}

impl ControlRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tenant control.
    ///
    /// Stamps `level = Tenant`; a record declared `scope = Environment` is
    /// widened to `Both` since it now also lives at tenant level.
    pub fn put_tenant_control(&mut self, mut control: GovernanceControl) {
        control.level = ControlLevel::Tenant;
        if control.scope == ControlScope::Environment {
            control.scope = ControlScope::Both;
        }
        tracing::debug!(control_id = %control.id, "tenant control stored");
        self.tenant.insert(control);
    }

    /// Insert or replace an environment-level control record.
    ///
    /// Stamps `level = Environment` and widens `scope: Tenant → Both`. If
    /// the tenant counterpart forbids overrides the write still succeeds,
    /// but a latent [`Conflict`] is returned so callers and tests can
    /// assert on it instead of scraping logs.
    pub fn put_environment_control(
        &mut self,
        environment_id: &EnvironmentId,
        mut control: GovernanceControl,
    ) -> Option<Conflict> {
        control.level = ControlLevel::Environment;
        if control.scope == ControlScope::Tenant {
            control.scope = ControlScope::Both;
        }

        let conflict = match self.tenant.get(&control.id) {
            Some(tenant_control) if !tenant_control.override_allowed => {
                let conflict = Conflict {
                    environment_id: environment_id.clone(),
                    control_id: control.id.clone(),
                    conflict_type: ConflictType::Scope,
                    description: format!(
                        "override of non-overridable tenant control '{}' recorded for audit",
                        control.id
                    ),
                    resolution: ConflictResolution::TenantWins,
                };
                tracing::warn!(
                    control_id = %control.id,
                    environment_id = %environment_id,
                    "override attempted against non-overridable tenant control"
                );
                Some(conflict)
            }
            _ => None,
        };

        self.overrides
            .entry(environment_id.clone())
            .or_default()
            .insert(control);
        conflict
    }

    /// Tenant controls passing the filter, in insertion order.
    pub fn tenant_controls(&self, filter: &ControlFilter) -> Vec<&GovernanceControl> {
        self.tenant.iter().filter(|c| filter.accepts(c)).collect()
    }

    /// Look up a single tenant control.
    pub fn tenant_control(&self, id: &ControlId) -> Option<&GovernanceControl> {
        self.tenant.get(id)
    }

    /// Iterate all tenant controls in insertion order.
    pub fn tenant_iter(&self) -> impl Iterator<Item = &GovernanceControl> {
        self.tenant.iter()
    }

    /// Number of tenant controls.
    pub fn tenant_len(&self) -> usize {
        self.tenant.len()
    }

    /// Look up an environment's override record for a control id.
    pub fn override_for(
        &self,
        environment_id: &EnvironmentId,
        control_id: &ControlId,
    ) -> Option<&GovernanceControl> {
        self.overrides
            .get(environment_id)?
            .get(control_id)
    }

    /// Iterate an environment's local records in insertion order.
    pub fn environment_iter(
        &self,
        environment_id: &EnvironmentId,
    ) -> impl Iterator<Item = &GovernanceControl> {
        self.overrides
            .get(environment_id)
            .into_iter()
            .flat_map(OrderedControls::iter)
    }

    /// Environment-local controls passing the filter; when `inherit_into`
    /// is set, applicable inheritable tenant controls without a local
    /// override are appended as `status = Inherited` copies.
    pub fn environment_controls(
        &self,
        environment_id: &EnvironmentId,
        filter: &ControlFilter,
        inherit_into: Option<&EnvironmentContext>,
    ) -> Vec<GovernanceControl> {
        let mut out: Vec<GovernanceControl> = self
            .environment_iter(environment_id)
            .filter(|c| filter.accepts(c))
            .cloned()
            .collect();

        if let Some(environment) = inherit_into {
            let local = self.overrides.get(environment_id);
            for tenant_control in self.tenant.iter() {
                if !tenant_control.inheritance_allowed
                    || tenant_control.status != ControlStatus::Enabled
                    || !applies(tenant_control, environment)
                {
                    continue;
                }
                if local.is_some_and(|l| l.contains(&tenant_control.id)) {
                    continue;
                }
                let mut inherited = tenant_control.clone();
                inherited.status = ControlStatus::Inherited;
                if filter.accepts(&inherited) {
                    out.push(inherited);
                }
            }
        }

        out
    }

    /// Total number of environment-level records across all environments.
    pub fn environment_record_count(&self) -> usize {
        self.overrides.values().map(OrderedControls::len).sum()
    }

    /// Environment ids that have at least one override record, sorted.
    ///
    /// The validator uses this to surface override maps that reference
    /// environments missing from the catalog.
    pub fn environment_ids_with_overrides(&self) -> Vec<EnvironmentId> {
        let mut ids: Vec<EnvironmentId> = self.overrides.keys().cloned().collect();
        ids.sort();
        ids
    }
}
