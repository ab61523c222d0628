//! # Governance Engine Facade
//!
//! The single shared-state entry point collaborators call. One
//! [`GovernanceEngine`] is constructed at process start and passed by
//! handle into whatever serves reads — there is no global singleton.
//!
//! ## Concurrency
//!
//! The registry and catalog are the only mutable shared state, guarded by
//! one `parking_lot::RwLock`: all reads run concurrently against a
//! consistent snapshot, writes are mutually exclusive with reads and other
//! writes. Control counts are small and writes are administrative, so no
//! finer-grained locking is warranted. No operation blocks on I/O and every
//! computation is deterministic over the current snapshot, so there is no
//! timeout or retry machinery at this layer.

use parking_lot::RwLock;

use mgov_core::{
    EnvironmentContext, EnvironmentId, GovError, GovernanceControl,
};

use crate::catalog::EnvironmentCatalog;
use crate::registry::{ControlFilter, ControlRegistry};
use crate::reporter::{report, GovernanceReport};
use crate::resolver::{resolve_environment, Conflict, EffectiveControl};
use crate::validator::{validate, ComplianceResult};

#[derive(Debug, Default)]
struct EngineState {
    registry: ControlRegistry,
    catalog: EnvironmentCatalog,
}

/// Thread-safe facade over the control registry and environment catalog.
#[derive(Debug, Default)]
pub struct GovernanceEngine {
    state: RwLock<EngineState>,
}

impl GovernanceEngine {
    /// Create an engine with an empty registry and catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // -- environments -------------------------------------------------------

    /// Insert or replace an environment's metadata.
    pub fn upsert_environment(&self, context: EnvironmentContext) {
        self.state.write().catalog.upsert(context);
    }

    /// Look up one environment.
    pub fn environment(&self, id: &EnvironmentId) -> Option<EnvironmentContext> {
        self.state.read().catalog.get(id).cloned()
    }

    /// All known environments, in id order.
    pub fn environments(&self) -> Vec<EnvironmentContext> {
        self.state.read().catalog.list().cloned().collect()
    }

    // -- control writes -----------------------------------------------------

    /// Insert or replace a tenant control.
    pub fn put_tenant_control(&self, control: GovernanceControl) -> Result<(), GovError> {
        control.validate()?;
        self.state.write().registry.put_tenant_control(control);
        Ok(())
    }

    /// Insert or replace an environment-level control record.
    ///
    /// The environment must already exist in the catalog; the engine never
    /// auto-creates one. A returned [`Conflict`] means the write targeted a
    /// non-overridable tenant control — the record was still stored.
    pub fn put_environment_control(
        &self,
        environment_id: &EnvironmentId,
        control: GovernanceControl,
    ) -> Result<Option<Conflict>, GovError> {
        control.validate()?;
        let mut state = self.state.write();
        if !state.catalog.contains(environment_id) {
            return Err(GovError::EnvironmentNotFound {
                id: environment_id.to_string(),
            });
        }
        Ok(state.registry.put_environment_control(environment_id, control))
    }

    // -- control reads ------------------------------------------------------

    /// Tenant controls passing the filter, in insertion order.
    pub fn tenant_controls(&self, filter: &ControlFilter) -> Vec<GovernanceControl> {
        self.state
            .read()
            .registry
            .tenant_controls(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Controls for one environment. With `include_inherited`, applicable
    /// inheritable tenant controls without a local override are appended as
    /// `Inherited` copies.
    pub fn environment_controls(
        &self,
        environment_id: &EnvironmentId,
        filter: &ControlFilter,
        include_inherited: bool,
    ) -> Result<Vec<GovernanceControl>, GovError> {
        let state = self.state.read();
        let environment = state.catalog.get(environment_id).ok_or_else(|| {
            GovError::EnvironmentNotFound {
                id: environment_id.to_string(),
            }
        })?;
        let inherit_into = include_inherited.then_some(environment);
        Ok(state
            .registry
            .environment_controls(environment_id, filter, inherit_into))
    }

    /// Resolve every control in effect for one environment.
    pub fn effective_controls(
        &self,
        environment_id: &EnvironmentId,
    ) -> Result<Vec<EffectiveControl>, GovError> {
        let state = self.state.read();
        let environment = state.catalog.get(environment_id).ok_or_else(|| {
            GovError::EnvironmentNotFound {
                id: environment_id.to_string(),
            }
        })?;
        Ok(resolve_environment(&state.registry, environment))
    }

    // -- aggregate reads ----------------------------------------------------

    /// Run the compliance validator over the current snapshot.
    pub fn validate(&self) -> ComplianceResult {
        let state = self.state.read();
        validate(&state.registry, &state.catalog)
    }

    /// Build dashboard aggregates over the current snapshot.
    pub fn report(&self) -> GovernanceReport {
        let state = self.state.read();
        report(&state.registry, &state.catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgov_core::{
        ControlId, ControlType, EnvironmentType, TenantId,
    };

    fn control(id: &str) -> GovernanceControl {
        GovernanceControl::new(
            ControlId::new(id).unwrap(),
            format!("Control {id}"),
            ControlType::Security,
        )
    }

    fn environment(id: &str) -> EnvironmentContext {
        EnvironmentContext::new(
            EnvironmentId::new(id).unwrap(),
            id.to_string(),
            EnvironmentType::Test,
            "eu-west-1",
            TenantId::new(),
        )
    }

    #[test]
    fn environment_write_requires_known_environment() {
        let engine = GovernanceEngine::new();
        let err = engine
            .put_environment_control(&EnvironmentId::new("ghost").unwrap(), control("c1"))
            .unwrap_err();
        assert!(matches!(err, GovError::EnvironmentNotFound { .. }));
    }

    #[test]
    fn effective_controls_requires_known_environment() {
        let engine = GovernanceEngine::new();
        let err = engine
            .effective_controls(&EnvironmentId::new("ghost").unwrap())
            .unwrap_err();
        assert!(matches!(err, GovError::EnvironmentNotFound { .. }));
    }

    #[test]
    fn malformed_control_is_rejected_before_touching_state() {
        let engine = GovernanceEngine::new();
        let mut bad = control("c1");
        bad.name = String::new();
        assert!(engine.put_tenant_control(bad).is_err());
        assert!(engine.tenant_controls(&ControlFilter::any()).is_empty());
    }

    #[test]
    fn end_to_end_put_resolve_validate() {
        let engine = GovernanceEngine::new();
        engine.upsert_environment(environment("e1"));
        engine.put_tenant_control(control("mfa")).unwrap();
        let flagged = engine
            .put_environment_control(&EnvironmentId::new("e1").unwrap(), control("mfa"))
            .unwrap();
        assert!(flagged.is_none());

        let effective = engine
            .effective_controls(&EnvironmentId::new("e1").unwrap())
            .unwrap();
        assert_eq!(effective.len(), 1);

        let result = engine.validate();
        assert!(result.overall.compliant);
    }

    #[test]
    fn concurrent_reads_share_the_lock() {
        use std::sync::Arc;

        let engine = Arc::new(GovernanceEngine::new());
        engine.upsert_environment(environment("e1"));
        for i in 0..20 {
            engine.put_tenant_control(control(&format!("c{i}"))).unwrap();
        }

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        let result = engine.validate();
                        assert!(result.overall.score <= 100);
                        let effective = engine
                            .effective_controls(&EnvironmentId::new("e1").unwrap())
                            .unwrap();
                        assert_eq!(effective.len(), 20);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
