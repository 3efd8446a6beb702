//! `GceSession`: probed gcloud, last inventory, lookup tables and role
//! registry for one caller.
//!
//! A session is constructed once with [`GceSession::connect`], which runs
//! the capability probe. Every refresh rebuilds the indexes and role table
//! from a single fetch and merges the roles into the session's registry.
//! Lookups refresh on first use if nothing has been loaded yet.

use anyhow::Result;
use gcetools_common::{Instance, RoleRegistry, RoleTable};
use semver::Version;

use crate::application::ports::{Gcloud, InventoryCache};
use crate::application::services::capability::{self, GcloudCapability};
use crate::application::services::{inventory, target_pool};
use crate::domain::index::InstanceIndex;
use crate::domain::inventory::{CachePolicy, GroupScope, InventoryQuery};
use crate::domain::roles::extract_roles;
use crate::domain::version::{INSTANCES_ZONE_SINCE, ZoneFlag};

/// Defaults applied by lookups that refresh implicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub cache: CachePolicy,
    pub instances_zone_since: Version,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            cache: CachePolicy::default(),
            instances_zone_since: INSTANCES_ZONE_SINCE,
        }
    }
}

pub struct GceSession<G: Gcloud, C: InventoryCache> {
    gcloud: G,
    cache: C,
    settings: SessionSettings,
    capability: GcloudCapability,
    loaded: bool,
    instances: Vec<Instance>,
    index: InstanceIndex,
    roles: RoleTable,
    registry: RoleRegistry,
}

impl<G: Gcloud, C: InventoryCache> GceSession<G, C> {
    /// Probe gcloud and create an empty session.
    ///
    /// # Errors
    ///
    /// Returns `GcloudError::NotInstalled` if the probe fails.
    pub async fn connect(gcloud: G, cache: C, settings: SessionSettings) -> Result<Self> {
        let capability = capability::probe(&gcloud).await?;
        Ok(Self {
            gcloud,
            cache,
            settings,
            capability,
            loaded: false,
            instances: Vec::new(),
            index: InstanceIndex::default(),
            roles: RoleTable::new(),
            registry: RoleRegistry::new(),
        })
    }

    /// Merge future refreshes into an existing role registry instead of an
    /// empty one.
    pub fn set_registry(&mut self, registry: RoleRegistry) {
        self.registry = registry;
    }

    #[must_use]
    pub fn capability(&self) -> &GcloudCapability {
        &self.capability
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// `true` once a refresh has completed.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Raw records of the last refresh.
    #[must_use]
    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    /// Role table of the last refresh.
    #[must_use]
    pub fn roles(&self) -> &RoleTable {
        &self.roles
    }

    #[must_use]
    pub fn registry(&self) -> &RoleRegistry {
        &self.registry
    }

    /// Fetch, resolve group members, rebuild the indexes and role table,
    /// and merge the roles into the registry.
    ///
    /// Returns the records exactly as fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if the fetch or any member describe call fails; the
    /// previous state is kept in that case.
    pub async fn refresh(&mut self, query: &InventoryQuery, policy: CachePolicy) -> Result<&[Instance]> {
        let fetched = inventory::fetch(&self.gcloud, &self.cache, query, policy).await?;
        let resolved = inventory::resolve_members(&self.gcloud, &fetched).await?;

        self.index = InstanceIndex::build(&resolved);
        self.roles = extract_roles(&resolved);
        self.registry.merge(&self.roles);
        self.instances = fetched;
        self.loaded = true;

        tracing::debug!(
            instances = self.instances.len(),
            names = self.index.name_count(),
            addresses = self.index.ip_count(),
            roles = self.roles.len(),
            "inventory refreshed"
        );
        Ok(&self.instances)
    }

    /// Refresh every instance with the session's cache settings.
    ///
    /// # Errors
    ///
    /// See [`GceSession::refresh`].
    pub async fn update_roles(&mut self) -> Result<&[Instance]> {
        let policy = self.settings.cache;
        self.refresh(&InventoryQuery::AllInstances, policy).await
    }

    async fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.update_roles().await?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the implicit first refresh fails.
    pub async fn instance_by_name(&mut self, name: &str) -> Result<Option<&Instance>> {
        self.ensure_loaded().await?;
        Ok(self.index.by_name(name))
    }

    /// # Errors
    ///
    /// Returns an error if the implicit first refresh fails.
    pub async fn instance_by_ip(&mut self, ip: &str) -> Result<Option<&Instance>> {
        self.ensure_loaded().await?;
        Ok(self.index.by_ip(ip))
    }

    /// # Errors
    ///
    /// Returns an error if the implicit first refresh fails.
    pub async fn instance_name_by_ip(&mut self, ip: &str) -> Result<Option<&str>> {
        Ok(self.instance_by_ip(ip).await?.and_then(Instance::name))
    }

    /// # Errors
    ///
    /// Returns an error if the implicit first refresh fails.
    pub async fn instance_zone_by_name(&mut self, name: &str) -> Result<Option<&str>> {
        Ok(self.instance_by_name(name).await?.and_then(Instance::zone))
    }

    /// # Errors
    ///
    /// Returns an error if the implicit first refresh fails.
    pub async fn instance_zone_by_ip(&mut self, ip: &str) -> Result<Option<&str>> {
        Ok(self.instance_by_ip(ip).await?.and_then(Instance::zone))
    }

    /// Refresh scoped to one managed instance group.
    ///
    /// Bypasses the single-slot cache so a group listing never replaces
    /// the full inventory on disk.
    ///
    /// # Errors
    ///
    /// See [`GceSession::refresh`].
    pub async fn instances_by_group(&mut self, group: &str, scope: GroupScope) -> Result<&[Instance]> {
        self.refresh(&InventoryQuery::group(group, scope), CachePolicy::disabled())
            .await
    }

    fn zone_flag(&self) -> ZoneFlag {
        self.capability
            .zone_flag(&self.settings.instances_zone_since)
    }

    /// # Errors
    ///
    /// Returns an error if gcloud exits non-zero.
    pub async fn target_pool_add_instance(&self, pool: &str, instance: &str, zone: &str) -> Result<()> {
        target_pool::add_instance(&self.gcloud, self.zone_flag(), pool, instance, zone).await
    }

    /// # Errors
    ///
    /// Returns an error if gcloud exits non-zero.
    pub async fn target_pool_remove_instance(
        &self,
        pool: &str,
        instance: &str,
        zone: &str,
    ) -> Result<()> {
        target_pool::remove_instance(&self.gcloud, self.zone_flag(), pool, instance, zone).await
    }
}
