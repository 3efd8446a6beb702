//! Infrastructure implementation of the `InventoryCache` port.
//!
//! A single file (`~/.gcetools/instances`) holding the raw JSON of the
//! last live listing. Its creation time is the freshness signal; writes go
//! through a temp file + rename so the timestamp restarts on every refresh.
//! There is no cross-process locking: the last writer wins.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};

use crate::application::ports::InventoryCache;

/// Directory under `$HOME` holding gcetools state.
pub const GCETOOLS_DIR: &str = ".gcetools";

/// File name of the instance listing cache.
pub const INSTANCES_FILE: &str = "instances";

pub struct FileInventoryCache {
    path: PathBuf,
}

/// Snapshot of the cache file for `gcetools cache status`.
#[derive(Debug, Clone)]
pub struct CacheStatus {
    pub path: PathBuf,
    pub created: Option<SystemTime>,
    pub age: Option<Duration>,
    pub size: Option<u64>,
}

impl FileInventoryCache {
    /// Cache at the default path (`~/.gcetools/instances`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Ok(Self::with_path(home.join(GCETOOLS_DIR).join(INSTANCES_FILE)))
    }

    /// Cache at an explicit path (used in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn created(&self) -> Result<Option<SystemTime>> {
        let meta = match std::fs::metadata(&self.path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading metadata of {}", self.path.display()));
            }
        };
        // Not every filesystem records a birth time.
        let created = meta
            .created()
            .or_else(|_| meta.modified())
            .with_context(|| format!("reading timestamps of {}", self.path.display()))?;
        Ok(Some(created))
    }

    /// Describe the cache file without reading it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but its metadata cannot be read.
    pub fn status(&self) -> Result<CacheStatus> {
        let created = self.created()?;
        let size = created
            .is_some()
            .then(|| std::fs::metadata(&self.path).map(|m| m.len()))
            .transpose()
            .with_context(|| format!("reading metadata of {}", self.path.display()))?;
        Ok(CacheStatus {
            path: self.path.clone(),
            created,
            age: created.map(age_since),
            size,
        })
    }

    /// Remove the cache file. Returns `true` if a file was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("removing cache file {}", self.path.display())),
        }
    }
}

fn age_since(created: SystemTime) -> Duration {
    SystemTime::now()
        .duration_since(created)
        .unwrap_or(Duration::ZERO)
}

impl InventoryCache for FileInventoryCache {
    fn age(&self) -> Result<Option<Duration>> {
        Ok(self.created()?.map(age_since))
    }

    fn read(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).with_context(|| format!("reading cache file {}", self.path.display()))
    }

    fn write(&self, raw: &[u8]) -> Result<()> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("cache path {} has no parent", self.path.display()))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;

        let mut temp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("creating temp file in {}", parent.display()))?;
        std::io::Write::write_all(&mut temp, raw)
            .with_context(|| format!("writing temp file in {}", parent.display()))?;
        temp.persist(&self.path)
            .with_context(|| format!("finalizing cache file {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), bytes = raw.len(), "instance cache written");
        Ok(())
    }
}
