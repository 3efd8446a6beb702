//! Infrastructure implementation of the `RoleRegistryStore` port: a JSON
//! `roledefs` file shared with the task runner.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gcetools_common::RoleRegistry;

use crate::application::ports::RoleRegistryStore;

pub struct JsonRoleRegistryFile {
    path: PathBuf,
}

impl JsonRoleRegistryFile {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RoleRegistryStore for JsonRoleRegistryFile {
    fn load(&self) -> Result<RoleRegistry> {
        if !self.path.exists() {
            return Ok(RoleRegistry::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading roledefs {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(RoleRegistry::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("parsing roledefs {}", self.path.display()))
    }

    fn save(&self, registry: &RoleRegistry) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(registry).context("serializing roledefs")?;

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, format!("{content}\n"))
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("finalizing roledefs {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), roles = registry.len(), "roledefs written");
        Ok(())
    }
}
