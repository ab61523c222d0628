//! # Governance Control Model
//!
//! The named policy unit managed by the control plane. A control's identity
//! is stable across its tenant record and any environment-level override
//! records; classification, placement, and inheritance rules determine how
//! the engine resolves the two into one effective control.
//!
//! ## Placement Invariant
//!
//! [`GovernanceControl::level`] records where a particular record currently
//! lives. It is stamped by the registry at insertion time and never trusted
//! from the caller.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Configuration;
use crate::error::ValidationError;
use crate::identity::ControlId;

// ---------------------------------------------------------------------------
// Classification enums
// ---------------------------------------------------------------------------

/// The governance domain a control belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    /// Organizational policy control.
    Policy,
    /// Security control.
    Security,
    /// Regulatory compliance control.
    Compliance,
    /// Cost governance control.
    Cost,
    /// Data handling control.
    Data,
}

impl ControlType {
    /// All control types, in display order.
    pub fn all() -> &'static [ControlType] {
        &[
            ControlType::Policy,
            ControlType::Security,
            ControlType::Compliance,
            ControlType::Cost,
            ControlType::Data,
        ]
    }

    /// Stable string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlType::Policy => "policy",
            ControlType::Security => "security",
            ControlType::Compliance => "compliance",
            ControlType::Cost => "cost",
            ControlType::Data => "data",
        }
    }
}

impl std::fmt::Display for ControlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgently a control violation must be addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlPriority {
    /// Violation blocks compliance outright.
    Critical,
    /// High-urgency control.
    High,
    /// Default urgency.
    Medium,
    /// Advisory.
    Low,
}

impl ControlPriority {
    /// All priorities, highest first.
    pub fn all() -> &'static [ControlPriority] {
        &[
            ControlPriority::Critical,
            ControlPriority::High,
            ControlPriority::Medium,
            ControlPriority::Low,
        ]
    }

    /// Stable string form used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlPriority::Critical => "critical",
            ControlPriority::High => "high",
            ControlPriority::Medium => "medium",
            ControlPriority::Low => "low",
        }
    }
}

impl std::fmt::Display for ControlPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a control is enforced when it applies.
///
/// `Strict` is a floor during override merging: a strict tenant enforcement
/// can never be weakened by an environment override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementMode {
    /// Hard enforcement; violations block.
    Strict,
    /// Violations produce warnings.
    Warn,
    /// Violations are logged for audit only.
    Audit,
}

/// Where a control is declared to live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlScope {
    /// Tenant level only.
    Tenant,
    /// Environment level only.
    Environment,
    /// Both levels.
    Both,
}

/// Where a particular control record currently lives.
///
/// Stamped by the registry at insertion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlLevel {
    /// The record lives in the tenant map.
    Tenant,
    /// The record lives in an environment override map.
    Environment,
}

/// Activation state of a control record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlStatus {
    /// Active.
    Enabled,
    /// Present but inactive.
    Disabled,
    /// A tenant control surfaced into an environment listing via
    /// inheritance. Only valid on listing copies, never on stored tenant
    /// records.
    Inherited,
}

// ---------------------------------------------------------------------------
// Applicability
// ---------------------------------------------------------------------------

/// Wildcard marker inside an [`ApplicabilitySet`].
pub const WILDCARD: &str = "*";

/// An ordered set of dimension values a control declares itself applicable
/// to. The wildcard `"*"` means "all values"; an empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicabilitySet(BTreeSet<String>);

impl ApplicabilitySet {
    /// The wildcard set (matches every value).
    pub fn any() -> Self {
        Self(BTreeSet::from([WILDCARD.to_string()]))
    }

    /// A set of explicit values.
    pub fn of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(Into::into).collect())
    }

    /// Whether the set contains the wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.0.contains(WILDCARD)
    }

    /// Whether a value is covered by this set (membership or wildcard).
    pub fn matches(&self, value: &str) -> bool {
        self.is_wildcard() || self.0.contains(value)
    }

    /// Whether the set names no values at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The multi-dimensional applicability predicate a control declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicability {
    /// Environment types the control applies to (`prod`, `test`, ...).
    pub environment_types: ApplicabilitySet,
    /// Regions the control applies to.
    pub regions: ApplicabilitySet,
    /// Roles the control is declared for. Declarative only in this engine;
    /// live role checks belong to a separate authorization concern.
    pub roles: ApplicabilitySet,
}

impl Default for Applicability {
    /// Applies everywhere, for all roles.
    fn default() -> Self {
        Self {
            environment_types: ApplicabilitySet::any(),
            regions: ApplicabilitySet::any(),
            roles: ApplicabilitySet::any(),
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata
// ---------------------------------------------------------------------------

/// Authorship and versioning metadata attached to a control record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlMetadata {
    /// Who authored the record.
    pub author: String,
    /// UTC creation timestamp.
    pub created_at: DateTime<Utc>,
    /// UTC last-modification timestamp.
    pub modified_at: DateTime<Utc>,
    /// Monotonic record version.
    pub version: u32,
    /// Compliance-framework tags this control maps to (e.g. "SOC2", "GDPR").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frameworks: Vec<String>,
}

impl ControlMetadata {
    /// Metadata for a freshly authored record.
    pub fn new(author: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            author: author.into(),
            created_at: now,
            modified_at: now,
            version: 1,
            frameworks: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// GovernanceControl
// ---------------------------------------------------------------------------

/// A named policy unit.
///
/// The same shape is used for tenant records and environment override
/// records; an override is understood as a partial patch of its tenant
/// counterpart during resolution, not a full redefinition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceControl {
    /// Stable identity across tenant and environment copies.
    pub id: ControlId,
    /// Human-readable name.
    pub name: String,
    /// Governance domain.
    pub control_type: ControlType,
    /// Violation urgency.
    pub priority: ControlPriority,
    /// Enforcement mode.
    pub enforcement: EnforcementMode,
    /// Declared placement.
    pub scope: ControlScope,
    /// Where this record currently lives. Stamped by the registry.
    pub level: ControlLevel,
    /// May environments automatically receive this control.
    pub inheritance_allowed: bool,
    /// May an environment replace parts of it.
    pub override_allowed: bool,
    /// Must exist and be enabled at tenant level for overall compliance.
    pub required_at_tenant: bool,
    /// Declared applicability predicate.
    #[serde(default)]
    pub applies_to: Applicability,
    /// Activation state.
    pub status: ControlStatus,
    /// Control-specific settings; merged key-wise during override.
    #[serde(default, skip_serializing_if = "Configuration::is_empty")]
    pub configuration: Configuration,
    /// Authorship and versioning metadata.
    pub metadata: ControlMetadata,
}

impl GovernanceControl {
    /// Create an enabled control with defaults suitable for tenant-wide use:
    /// medium priority, warn enforcement, scope `Both`, inheritance and
    /// override allowed, applicable everywhere.
    pub fn new(id: ControlId, name: impl Into<String>, control_type: ControlType) -> Self {
        Self {
            id,
            name: name.into(),
            control_type,
            priority: ControlPriority::Medium,
            enforcement: EnforcementMode::Warn,
            scope: ControlScope::Both,
            level: ControlLevel::Tenant,
            inheritance_allowed: true,
            override_allowed: true,
            required_at_tenant: false,
            applies_to: Applicability::default(),
            status: ControlStatus::Enabled,
            configuration: Configuration::new(),
            metadata: ControlMetadata::new("system"),
        }
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: ControlPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set the enforcement mode.
    pub fn with_enforcement(mut self, enforcement: EnforcementMode) -> Self {
        self.enforcement = enforcement;
        self
    }

    /// Set the declared scope.
    pub fn with_scope(mut self, scope: ControlScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set the activation status.
    pub fn with_status(mut self, status: ControlStatus) -> Self {
        self.status = status;
        self
    }

    /// Set whether environments may override this control.
    pub fn with_override_allowed(mut self, allowed: bool) -> Self {
        self.override_allowed = allowed;
        self
    }

    /// Set whether environments automatically receive this control.
    pub fn with_inheritance_allowed(mut self, allowed: bool) -> Self {
        self.inheritance_allowed = allowed;
        self
    }

    /// Mark the control as required (and enabled) at tenant level.
    pub fn with_required_at_tenant(mut self, required: bool) -> Self {
        self.required_at_tenant = required;
        self
    }

    /// Set the applicability predicate.
    pub fn with_applicability(mut self, applies_to: Applicability) -> Self {
        self.applies_to = applies_to;
        self
    }

    /// Set the configuration map.
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Structural validation of a caller-supplied record.
    ///
    /// The id is valid by construction; the name must be non-empty.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MalformedControl {
                id: self.id.to_string(),
                reason: "missing name".to_string(),
            });
        }
        Ok(())
    }
}
