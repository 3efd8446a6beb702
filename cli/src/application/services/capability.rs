//! Capability probe: is gcloud installed, and which release.

use semver::Version;

use anyhow::Result;

use crate::application::ports::Gcloud;
use crate::domain::error::GcloudError;
use crate::domain::version::{ZoneFlag, parse_sdk_version};

/// What the probe learned about the installed gcloud.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcloudCapability {
    /// SDK version from the `gcloud version` banner, when it could be parsed.
    pub version: Option<Version>,
}

impl GcloudCapability {
    /// Zone flag for target-pool commands on this release.
    #[must_use]
    pub fn zone_flag(&self, instances_zone_since: &Version) -> ZoneFlag {
        ZoneFlag::for_version(self.version.as_ref(), instances_zone_since)
    }
}

/// Run `gcloud version` once and record the SDK release.
///
/// # Errors
///
/// Returns [`GcloudError::NotInstalled`] when gcloud cannot be spawned or
/// exits non-zero.
pub async fn probe(gcloud: &impl Gcloud) -> Result<GcloudCapability> {
    let output = match gcloud.version().await {
        Ok(output) if output.status.success() => output,
        Ok(output) => {
            tracing::debug!(status = %output.status, "gcloud version exited non-zero");
            return Err(GcloudError::NotInstalled.into());
        }
        Err(e) => {
            tracing::debug!(error = %e, "gcloud version could not be spawned");
            return Err(GcloudError::NotInstalled.into());
        }
    };

    let banner = String::from_utf8_lossy(&output.stdout);
    let version = parse_sdk_version(&banner);
    match &version {
        Some(v) => tracing::debug!(version = %v, "gcloud detected"),
        None => tracing::warn!("could not parse gcloud version banner; assuming a current release"),
    }
    Ok(GcloudCapability { version })
}
