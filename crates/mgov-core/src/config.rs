//! # Control Configuration
//!
//! Typed key/value configuration attached to a governance control.
//!
//! The upstream representation was an untyped bag; here each value is a
//! [`ConfigValue`] sum type, and the map itself is an ordered
//! [`Configuration`] newtype so serialization and iteration are
//! deterministic.
//!
//! ## Merge Semantics
//!
//! During override resolution the configuration is merged key-wise
//! ([`Configuration::merged_with`]): keys present in the overlay replace the
//! base value for that key, keys absent in the overlay retain the base
//! value. The map is never replaced wholesale.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single configuration value for a control setting.
///
/// Untagged so bundles read naturally (`retention_days: 90`,
/// `mfa_methods: ["totp", "webauthn"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean toggle.
    Flag(bool),
    /// Integer setting (counts, day limits, thresholds).
    Count(i64),
    /// Free-text setting.
    Text(String),
    /// List-of-strings setting (allowed values, method lists).
    Items(Vec<String>),
}

/// An ordered map of control-specific settings.
///
/// Backed by a `BTreeMap` so two configurations with the same entries are
/// structurally equal and serialize identically regardless of insertion
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration(BTreeMap<String, ConfigValue>);

impl Configuration {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, replacing any existing value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.0.insert(key.into(), value);
    }

    /// Builder-style insertion for fixtures and tests.
    pub fn with(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.set(key, value);
        self
    }

    /// Get the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    /// Typed accessor: boolean toggle.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.0.get(key) {
            Some(ConfigValue::Flag(b)) => Some(*b),
            _ => None,
        }
    }

    /// Typed accessor: integer setting.
    pub fn count(&self, key: &str) -> Option<i64> {
        match self.0.get(key) {
            Some(ConfigValue::Count(n)) => Some(*n),
            _ => None,
        }
    }

    /// Typed accessor: free-text setting.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(ConfigValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Typed accessor: list setting.
    pub fn items(&self, key: &str) -> Option<&[String]> {
        match self.0.get(key) {
            Some(ConfigValue::Items(v)) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the configuration has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.0.iter()
    }

    /// Shallow key-wise union with an overlay.
    ///
    /// Overlay keys replace the base value for that key; base keys absent
    /// from the overlay are retained. `{a:1,b:2} ⊕ {b:9,c:3} = {a:1,b:9,c:3}`.
    pub fn merged_with(&self, overlay: &Configuration) -> Configuration {
        let mut merged = self.0.clone();
        for (key, value) in &overlay.0 {
            merged.insert(key.clone(), value.clone());
        }
        Configuration(merged)
    }
}

impl FromIterator<(String, ConfigValue)> for Configuration {
    fn from_iter<T: IntoIterator<Item = (String, ConfigValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
