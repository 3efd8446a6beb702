//! Domain layer: pure inventory logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod index;
pub mod inventory;
pub mod roles;
pub mod version;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{GceToolsConfig, validate_config_key, validate_config_value};
pub use error::{ConfigError, GcloudError};
pub use index::InstanceIndex;
pub use inventory::{CachePolicy, GroupScope, InventoryQuery};
pub use roles::extract_roles;
pub use version::{ZoneFlag, parse_sdk_version};
