//! Domain types and validators for gcetools configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::time::Duration;

use anyhow::Result;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::inventory::{CachePolicy, DEFAULT_CACHE_EXPIRATION};
use crate::domain::version::INSTANCES_ZONE_SINCE;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "cache.enabled",
    "cache.expiration",
    "gcloud.binary",
    "gcloud.timeout",
    "gcloud.instances_zone_since",
];

/// Default timeout for a single gcloud invocation, in seconds.
pub const DEFAULT_GCLOUD_TIMEOUT_SECS: u64 = 300;

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.gcetools/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GceToolsConfig {
    /// Instance listing cache settings.
    pub cache: CacheConfig,
    /// gcloud invocation settings.
    pub gcloud: GcloudConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Reuse `~/.gcetools/instances` while it is fresh.
    pub enabled: bool,
    /// Cache lifetime in seconds.
    pub expiration: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            expiration: DEFAULT_CACHE_EXPIRATION.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GcloudConfig {
    /// Program name or path of the gcloud binary.
    pub binary: String,
    /// Per-invocation timeout in seconds.
    pub timeout: u64,
    /// SDK version from which target-pool commands take `--instances-zone`.
    pub instances_zone_since: String,
}

impl Default for GcloudConfig {
    fn default() -> Self {
        Self {
            binary: "gcloud".to_string(),
            timeout: DEFAULT_GCLOUD_TIMEOUT_SECS,
            instances_zone_since: INSTANCES_ZONE_SINCE.to_string(),
        }
    }
}

impl GceToolsConfig {
    #[must_use]
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            use_cache: self.cache.enabled,
            expiration: Duration::from_secs(self.cache.expiration),
        }
    }

    #[must_use]
    pub fn gcloud_timeout(&self) -> Duration {
        Duration::from_secs(self.gcloud.timeout)
    }

    /// Threshold version for `--instances-zone`; a malformed value falls
    /// back to the built-in default.
    #[must_use]
    pub fn instances_zone_since(&self) -> Version {
        Version::parse(&self.gcloud.instances_zone_since).unwrap_or(INSTANCES_ZONE_SINCE)
    }

    /// Apply a validated `key = value` pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "cache.enabled" => self.cache.enabled = value.parse()?,
            "cache.expiration" => self.cache.expiration = value.parse()?,
            "gcloud.binary" => self.gcloud.binary = value.to_string(),
            "gcloud.timeout" => self.gcloud.timeout = value.parse()?,
            "gcloud.instances_zone_since" => {
                self.gcloud.instances_zone_since = value.to_string();
            }
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let valid = match key {
        "cache.enabled" => value.parse::<bool>().is_ok().then_some(()).ok_or("true, false"),
        "cache.expiration" => value
            .parse::<u64>()
            .is_ok()
            .then_some(())
            .ok_or("a whole number of seconds"),
        "gcloud.timeout" => value
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .map(|_| ())
            .ok_or("a positive number of seconds"),
        "gcloud.binary" => (!value.trim().is_empty())
            .then_some(())
            .ok_or("a program name or path"),
        "gcloud.instances_zone_since" => Version::parse(value)
            .map(|_| ())
            .map_err(|_| "a semantic version such as 0.9.78"),
        _ => Ok(()),
    };
    valid.map_err(|valid| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: valid.to_string(),
        }
        .into()
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
