//! Inventory query and cache policy value types.

use std::time::Duration;

use anyhow::Result;

use crate::domain::error::GcloudError;

/// Default cache lifetime: one day.
pub const DEFAULT_CACHE_EXPIRATION: Duration = Duration::from_secs(86_400);

/// Whether and for how long a cached listing may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub use_cache: bool,
    pub expiration: Duration,
}

impl CachePolicy {
    /// Always fetch live and never touch the cache file.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            use_cache: false,
            expiration: Duration::ZERO,
        }
    }

    /// A cache file of age `age` may be reused under this policy.
    #[must_use]
    pub fn is_fresh(&self, age: Duration) -> bool {
        self.use_cache && age < self.expiration
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            use_cache: true,
            expiration: DEFAULT_CACHE_EXPIRATION,
        }
    }
}

/// Location filter for a managed instance group listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupScope {
    /// No `--region`/`--zone` flag.
    #[default]
    All,
    Region(String),
    Zone(String),
}

impl GroupScope {
    /// Build a scope from optional `--region`/`--zone` values.
    ///
    /// # Errors
    ///
    /// Returns [`GcloudError::ConflictingScope`] when both are given.
    pub fn from_flags(group: &str, region: Option<&str>, zone: Option<&str>) -> Result<Self> {
        match (region, zone) {
            (Some(_), Some(_)) => Err(GcloudError::ConflictingScope {
                group: group.to_string(),
            }
            .into()),
            (Some(r), None) => Ok(Self::Region(r.to_string())),
            (None, Some(z)) => Ok(Self::Zone(z.to_string())),
            (None, None) => Ok(Self::All),
        }
    }

    /// The gcloud flag for this scope, e.g. `--region=us-central1`.
    #[must_use]
    pub fn flag(&self) -> Option<String> {
        match self {
            Self::All => None,
            Self::Region(r) => Some(format!("--region={r}")),
            Self::Zone(z) => Some(format!("--zone={z}")),
        }
    }
}

/// What a refresh lists.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InventoryQuery {
    /// Every instance in the active project.
    #[default]
    AllInstances,
    /// Members of one managed instance group.
    Group { name: String, scope: GroupScope },
}

impl InventoryQuery {
    #[must_use]
    pub fn group(name: impl Into<String>, scope: GroupScope) -> Self {
        Self::Group {
            name: name.into(),
            scope,
        }
    }
}
