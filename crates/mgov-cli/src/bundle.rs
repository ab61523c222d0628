//! # Governance Bundle Loading
//!
//! A bundle is the file-based input surface for the CLI: tenant controls,
//! environment metadata, and per-environment control records in one YAML or
//! JSON document. Loading a bundle builds a fully populated
//! [`GovernanceEngine`].

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use mgov_core::{EnvironmentContext, EnvironmentId, GovernanceControl};
use mgov_engine::GovernanceEngine;

/// The on-disk governance bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GovernanceBundle {
    /// Organization-wide controls.
    #[serde(default)]
    pub tenant_controls: Vec<GovernanceControl>,
    /// Governed environments.
    #[serde(default)]
    pub environments: Vec<EnvironmentContext>,
    /// Environment-level control records, keyed by environment id.
    #[serde(default)]
    pub environment_controls: BTreeMap<EnvironmentId, Vec<GovernanceControl>>,
}

impl GovernanceBundle {
    /// Parse a bundle from a file, dispatching on extension
    /// (`.yaml`/`.yml` or `.json`).
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read bundle {}", path.display()))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&raw)
                .with_context(|| format!("failed to parse YAML bundle {}", path.display())),
            Some("json") => serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse JSON bundle {}", path.display())),
            other => bail!(
                "unsupported bundle extension {:?} for {} (expected .yaml, .yml, or .json)",
                other,
                path.display()
            ),
        }
    }

    /// Build an engine from the bundle contents.
    ///
    /// Environments are loaded first so environment control writes land in
    /// known scopes. Latent override conflicts are logged, not fatal.
    pub fn into_engine(self) -> Result<GovernanceEngine> {
        let engine = GovernanceEngine::new();

        for environment in self.environments {
            engine.upsert_environment(environment);
        }
        for control in self.tenant_controls {
            engine
                .put_tenant_control(control)
                .context("invalid tenant control in bundle")?;
        }
        for (environment_id, controls) in self.environment_controls {
            for control in controls {
                let flagged = engine
                    .put_environment_control(&environment_id, control)
                    .with_context(|| {
                        format!("invalid environment control for '{environment_id}'")
                    })?;
                if let Some(conflict) = flagged {
                    tracing::warn!(
                        control_id = %conflict.control_id,
                        environment_id = %conflict.environment_id,
                        "bundle contains override of a non-overridable control"
                    );
                }
            }
        }

        Ok(engine)
    }
}

/// Load a bundle file and build the engine in one step.
pub fn load_engine(path: &Path) -> Result<GovernanceEngine> {
    GovernanceBundle::from_path(path)?.into_engine()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_YAML: &str = r#"
tenant_controls:
  - id: mfa
    name: Multi-Factor Authentication
    control_type: security
    priority: critical
    enforcement: strict
    scope: both
    level: tenant
    inheritance_allowed: true
    override_allowed: false
    required_at_tenant: true
    applies_to:
      environment_types: ["*"]
      regions: ["*"]
      roles: ["*"]
    status: enabled
    configuration:
      methods: ["totp", "webauthn"]
    metadata:
      author: platform-team
      created_at: "2026-01-10T09:00:00Z"
      modified_at: "2026-01-10T09:00:00Z"
      version: 1
      frameworks: ["SOC2"]
environments:
  - id: prod-eu
    name: Production EU
    environment_type: prod
    region: eu-west-1
    tenant_id: "4a6f9c3e-8d2b-4f1a-9e5c-7b3d2a1f0e9d"
    compliance_level: strict
    business_criticality: mission_critical
    data_classification: confidential
    user_count: 1200
    asset_count: 340
environment_controls:
  prod-eu:
    - id: mfa
      name: Multi-Factor Authentication
      control_type: security
      priority: critical
      enforcement: warn
      scope: environment
      level: environment
      inheritance_allowed: true
      override_allowed: true
      required_at_tenant: false
      status: disabled
      metadata:
        author: env-admin
        created_at: "2026-02-01T12:00:00Z"
        modified_at: "2026-02-01T12:00:00Z"
        version: 1
"#;

    fn write_bundle(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn yaml_bundle_loads_and_resolves() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_bundle(&dir, "bundle.yaml", SAMPLE_YAML);

        let engine = load_engine(&path).unwrap();
        let effective = engine
            .effective_controls(&EnvironmentId::new("prod-eu").unwrap())
            .unwrap();

        // Non-overridable tenant control wins over the disabling override.
        assert_eq!(effective.len(), 1);
        assert_eq!(
            effective[0].control.status,
            mgov_core::ControlStatus::Enabled
        );
        assert_eq!(effective[0].conflicts.len(), 1);
    }

    #[test]
    fn json_bundle_loads() {
        let bundle: GovernanceBundle = serde_yaml::from_str(SAMPLE_YAML).unwrap();
        let json = serde_json::to_string_pretty(&bundle).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write_bundle(&dir, "bundle.json", &json);

        let engine = load_engine(&path).unwrap();
        assert_eq!(engine.environments().len(), 1);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_bundle(&dir, "bundle.toml", "tenant_controls = []");
        assert!(GovernanceBundle::from_path(&path).is_err());
    }

    #[test]
    fn missing_file_is_a_context_error() {
        let err = GovernanceBundle::from_path(Path::new("/nonexistent/bundle.yaml")).unwrap_err();
        assert!(err.to_string().contains("failed to read bundle"));
    }

    #[test]
    fn empty_bundle_builds_empty_engine() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_bundle(&dir, "empty.yaml", "{}");
        let engine = load_engine(&path).unwrap();
        let result = engine.validate();
        assert_eq!(result.overall.score, 100);
        assert!(result.overall.compliant);
    }
}
