//! # Environment Catalog
//!
//! Holds the metadata record for each governed scope. Leaf dependency for
//! applicability matching and the environment-class compliance rule.
//!
//! Environments are created and mutated by administrative upserts and never
//! deleted; override maps that reference an environment the catalog does not
//! know are surfaced by the validator, not rejected here.

use std::collections::BTreeMap;

use mgov_core::{EnvironmentContext, EnvironmentId};

/// The set of known environments, keyed by id.
///
/// Backed by a `BTreeMap` so listing order is deterministic.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentCatalog {
    environments: BTreeMap<EnvironmentId, EnvironmentContext>,
}

impl EnvironmentCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an environment's metadata wholesale.
    pub fn upsert(&mut self, context: EnvironmentContext) {
        self.environments.insert(context.id.clone(), context);
    }

    /// Look up an environment by id.
    pub fn get(&self, id: &EnvironmentId) -> Option<&EnvironmentContext> {
        self.environments.get(id)
    }

    /// Whether the catalog knows an environment.
    pub fn contains(&self, id: &EnvironmentId) -> bool {
        self.environments.contains_key(id)
    }

    /// All environments, in id order.
    pub fn list(&self) -> impl Iterator<Item = &EnvironmentContext> {
        self.environments.values()
    }

    /// Number of known environments.
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgov_core::{ComplianceLevel, EnvironmentType, TenantId};

    fn env(id: &str) -> EnvironmentContext {
        EnvironmentContext::new(
            EnvironmentId::new(id).unwrap(),
            format!("Environment {id}"),
            EnvironmentType::Test,
            "eu-west-1",
            TenantId::new(),
        )
    }

    #[test]
    fn upsert_and_get() {
        let mut catalog = EnvironmentCatalog::new();
        catalog.upsert(env("e1"));
        let id = EnvironmentId::new("e1").unwrap();
        assert!(catalog.contains(&id));
        assert_eq!(catalog.get(&id).unwrap().name, "Environment e1");
    }

    #[test]
    fn upsert_replaces_metadata_wholesale() {
        let mut catalog = EnvironmentCatalog::new();
        catalog.upsert(env("e1"));
        catalog.upsert(env("e1").with_compliance_level(ComplianceLevel::Strict));

        let id = EnvironmentId::new("e1").unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get(&id).unwrap().compliance_level,
            ComplianceLevel::Strict
        );
    }

    #[test]
    fn list_is_id_ordered() {
        let mut catalog = EnvironmentCatalog::new();
        catalog.upsert(env("zulu"));
        catalog.upsert(env("alpha"));
        catalog.upsert(env("mike"));

        let ids: Vec<&str> = catalog.list().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "mike", "zulu"]);
    }

    #[test]
    fn missing_environment_is_none() {
        let catalog = EnvironmentCatalog::new();
        assert!(catalog.get(&EnvironmentId::new("ghost").unwrap()).is_none());
        assert!(catalog.is_empty());
    }
}
