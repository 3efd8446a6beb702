use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role name → host addresses, derived from instance tags.
///
/// Each address list keeps insertion order and never holds the same
/// address twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTable(BTreeMap<String, Vec<String>>);

impl RoleTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `address` to `role` unless the role already lists it.
    pub fn add(&mut self, role: &str, address: &str) {
        let hosts = self.0.entry(role.to_string()).or_default();
        if !hosts.iter().any(|h| h == address) {
            hosts.push(address.to_string());
        }
    }

    #[must_use]
    pub fn hosts(&self, role: &str) -> Option<&[String]> {
        self.0.get(role).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The task runner's role registry (`roledefs`).
///
/// Entries written by gcetools are plain address arrays; entries that
/// were already present are kept verbatim whatever their shape, so a
/// hand-written `{"hosts": [...]}` role survives a merge untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleRegistry(BTreeMap<String, Value>);

impl RoleRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a freshly extracted table: new roles are added, same-named
    /// roles are replaced, every other role is left alone.
    pub fn merge(&mut self, table: &RoleTable) {
        for (role, hosts) in table.iter() {
            let hosts = hosts.iter().cloned().map(Value::String).collect();
            self.0.insert(role.to_string(), Value::Array(hosts));
        }
    }

    /// Raw registry entry for `role`.
    #[must_use]
    pub fn get(&self, role: &str) -> Option<&Value> {
        self.0.get(role)
    }

    /// Addresses for `role` when the entry is a plain array of strings.
    #[must_use]
    pub fn hosts(&self, role: &str) -> Option<Vec<&str>> {
        self.0
            .get(role)?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }

    pub fn insert(&mut self, role: impl Into<String>, entry: Value) {
        self.0.insert(role.into(), entry);
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
