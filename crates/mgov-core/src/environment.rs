//! # Environment Context
//!
//! Metadata describing one governed scope. The catalog holds one
//! [`EnvironmentContext`] per environment; applicability matching and the
//! environment-class compliance rule read from it. The size counters are
//! reporting-only and never feed policy logic.

use serde::{Deserialize, Serialize};

use crate::identity::{EnvironmentId, TenantId};

/// The deployment class of an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentType {
    /// Production.
    Prod,
    /// Testing / staging.
    Test,
    /// Development.
    Dev,
    /// Disposable sandbox.
    Sandbox,
}

impl EnvironmentType {
    /// Stable string form, matching the applicability dimension values.
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentType::Prod => "prod",
            EnvironmentType::Test => "test",
            EnvironmentType::Dev => "dev",
            EnvironmentType::Sandbox => "sandbox",
        }
    }
}

impl std::fmt::Display for EnvironmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How strictly an environment is held to compliance.
///
/// A `Prod` environment whose level is not `Strict` is itself a violation,
/// independent of any individual control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceLevel {
    /// Full enforcement.
    Strict,
    /// Standard posture.
    Standard,
    /// Relaxed posture (sandboxes, experiments).
    Relaxed,
}

/// Business impact if the environment is lost or degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessCriticality {
    /// Outage halts the business.
    MissionCritical,
    /// Major impact.
    High,
    /// Moderate impact.
    Medium,
    /// Minimal impact.
    Low,
}

/// Sensitivity of the data the environment handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataClassification {
    /// Most sensitive.
    Restricted,
    /// Confidential business data.
    Confidential,
    /// Internal-only data.
    Internal,
    /// Public data.
    Public,
}

/// One governed scope.
///
/// Created by an administrative action, mutated by metadata updates, never
/// deleted while controls reference it (orphan override references are a
/// validator concern, not a catalog concern).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentContext {
    /// Unique environment identifier.
    pub id: EnvironmentId,
    /// Human-readable name.
    pub name: String,
    /// Deployment class.
    pub environment_type: EnvironmentType,
    /// Deployment region (matched against control applicability).
    pub region: String,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Compliance posture.
    pub compliance_level: ComplianceLevel,
    /// Business impact class.
    pub business_criticality: BusinessCriticality,
    /// Data sensitivity class.
    pub data_classification: DataClassification,
    /// Number of users with access. Reporting only.
    #[serde(default)]
    pub user_count: u64,
    /// Number of governed assets. Reporting only.
    #[serde(default)]
    pub asset_count: u64,
}

impl EnvironmentContext {
    /// Create an environment with standard-posture defaults.
    pub fn new(
        id: EnvironmentId,
        name: impl Into<String>,
        environment_type: EnvironmentType,
        region: impl Into<String>,
        tenant_id: TenantId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            environment_type,
            region: region.into(),
            tenant_id,
            compliance_level: ComplianceLevel::Standard,
            business_criticality: BusinessCriticality::Medium,
            data_classification: DataClassification::Internal,
            user_count: 0,
            asset_count: 0,
        }
    }

    /// Set the compliance posture.
    pub fn with_compliance_level(mut self, level: ComplianceLevel) -> Self {
        self.compliance_level = level;
        self
    }

    /// Set the business criticality.
    pub fn with_business_criticality(mut self, criticality: BusinessCriticality) -> Self {
        self.business_criticality = criticality;
        self
    }

    /// Set the data classification.
    pub fn with_data_classification(mut self, classification: DataClassification) -> Self {
        self.data_classification = classification;
        self
    }

    /// Set the reporting size counters.
    pub fn with_size(mut self, user_count: u64, asset_count: u64) -> Self {
        self.user_count = user_count;
        self.asset_count = asset_count;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_type_strings_match_applicability_dimension() {
        assert_eq!(EnvironmentType::Prod.as_str(), "prod");
        assert_eq!(EnvironmentType::Sandbox.as_str(), "sandbox");
    }

    #[test]
    fn new_environment_has_standard_defaults() {
        let env = EnvironmentContext::new(
            EnvironmentId::new("env-1").unwrap(),
            "Production EU",
            EnvironmentType::Prod,
            "eu-west-1",
            TenantId::new(),
        );
        assert_eq!(env.compliance_level, ComplianceLevel::Standard);
        assert_eq!(env.business_criticality, BusinessCriticality::Medium);
        assert_eq!(env.user_count, 0);
    }

    #[test]
    fn environment_serde_roundtrip() {
        let env = EnvironmentContext::new(
            EnvironmentId::new("env-1").unwrap(),
            "Prod",
            EnvironmentType::Prod,
            "us-east-1",
            TenantId::new(),
        )
        .with_compliance_level(ComplianceLevel::Strict)
        .with_size(1200, 88);
        let json = serde_json::to_string(&env).unwrap();
        let back: EnvironmentContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, env);
    }
}
