//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `gcetools_common`: never
//! from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use gcetools_common::RoleRegistry;

use crate::domain::config::GceToolsConfig;
use crate::domain::inventory::GroupScope;
use crate::domain::version::ZoneFlag;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// runner's timeout. On timeout, the child process must be killed (not
    /// left orphaned).
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
}

// ── gcloud Port ───────────────────────────────────────────────────────────────

/// The `gcloud` commands gcetools issues. Each returns the raw process
/// output; callers decide what a non-zero exit means.
#[allow(async_fn_in_trait)]
pub trait Gcloud {
    /// `gcloud version`.
    async fn version(&self) -> Result<Output>;
    /// `gcloud compute instances list --format=json`.
    async fn list_instances(&self) -> Result<Output>;
    /// `gcloud compute instance-groups managed list-instances <group> --format=json [scope]`.
    async fn list_group_instances(&self, group: &str, scope: &GroupScope) -> Result<Output>;
    /// `gcloud compute instances describe <name> [--zone <zone>] --format=json`.
    async fn describe_instance(&self, name: &str, zone: Option<&str>) -> Result<Output>;
    /// `gcloud compute target-pools add-instances <pool> --instances <instance> <flag> <zone>`.
    async fn target_pool_add(
        &self,
        pool: &str,
        instance: &str,
        zone_flag: ZoneFlag,
        zone: &str,
    ) -> Result<Output>;
    /// `gcloud compute target-pools remove-instances <pool> --instances <instance> <flag> <zone>`.
    async fn target_pool_remove(
        &self,
        pool: &str,
        instance: &str,
        zone_flag: ZoneFlag,
        zone: &str,
    ) -> Result<Output>;
}

// ── Cache Port ────────────────────────────────────────────────────────────────

/// Single-slot store for the raw instance listing.
pub trait InventoryCache {
    /// Age of the cached listing, or `None` when there is no cache file.
    fn age(&self) -> Result<Option<Duration>>;
    /// Raw bytes of the cached listing.
    fn read(&self) -> Result<Vec<u8>>;
    /// Replace the cached listing.
    fn write(&self, raw: &[u8]) -> Result<()>;
}

// ── Config and Registry Ports ─────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when no file exists.
    fn load(&self) -> Result<GceToolsConfig>;
    /// Persist the configuration.
    fn save(&self, config: &GceToolsConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}

/// Abstracts the task runner's `roledefs` file.
pub trait RoleRegistryStore {
    /// Load the registry, returning an empty one when the file is absent.
    fn load(&self) -> Result<RoleRegistry>;
    /// Write the registry back.
    fn save(&self, registry: &RoleRegistry) -> Result<()>;
}
