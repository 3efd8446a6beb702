//! JSON output helpers.
//!
//! Provides the error-object formatter used by all `--json` code paths when
//! a command fails, and the `JsonRenderer` for successful results.

use std::path::Path;

use anyhow::{Context, Result};
use gcetools_common::{Instance, RoleTable};

use crate::domain::config::GceToolsConfig;
use crate::infra::cache::CacheStatus;
use crate::output::PoolChange;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails. `serde_json` only fails on
/// non-finite floats and maps with non-string keys, neither of which appear
/// here.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Renders results as pretty-printed JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    fn print(value: &serde_json::Value) -> Result<()> {
        println!(
            "{}",
            serde_json::to_string_pretty(value).context("JSON serialization failed")?
        );
        Ok(())
    }

    /// `{"roles": {...}, "roledefs": "<path>"|null}`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_roles(&self, roles: &RoleTable, roledefs: Option<&Path>) -> Result<()> {
        Self::print(&serde_json::json!({
            "roles": roles,
            "roledefs": roledefs.map(|p| p.display().to_string()),
        }))
    }

    /// The record exactly as gcloud returned it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_instance(&self, instance: &Instance) -> Result<()> {
        Self::print(&serde_json::to_value(instance).context("serializing instance")?)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_instances(&self, instances: &[Instance]) -> Result<()> {
        Self::print(&serde_json::to_value(instances).context("serializing instances")?)
    }

    /// `{"<field>": "<value>"}`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_value(&self, field: &str, value: &str) -> Result<()> {
        let mut obj = serde_json::Map::new();
        obj.insert(field.to_string(), value.into());
        Self::print(&serde_json::Value::Object(obj))
    }

    /// `{"action": "added"|"removed", "pool": ..., "instance": ...}`
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_pool_change(&self, change: &PoolChange<'_>) -> Result<()> {
        let (PoolChange::Added { pool, instance } | PoolChange::Removed { pool, instance }) = change;
        Self::print(&serde_json::json!({
            "action": change.action(),
            "pool": pool,
            "instance": instance,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &GceToolsConfig, path: &Path) -> Result<()> {
        Self::print(&serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_cache_status(&self, status: &CacheStatus, fresh: bool) -> Result<()> {
        let created = status
            .created
            .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339());
        Self::print(&serde_json::json!({
            "path": status.path.display().to_string(),
            "exists": status.created.is_some(),
            "created": created,
            "age_seconds": status.age.map(|a| a.as_secs()),
            "size": status.size,
            "fresh": fresh,
        }))
    }
}
