//! gcloud SDK version parsing and version-dependent flag selection.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

/// First SDK release whose `target-pools add/remove-instances` take
/// `--instances-zone` instead of `--zone`.
pub const INSTANCES_ZONE_SINCE: Version = Version::new(0, 9, 78);

static SDK_VERSION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:\.(\d+))?(?:\.(\d+))?").ok());

/// Parse the SDK version from `gcloud version` output.
///
/// The first line looks like `Google Cloud SDK 138.0.0`; older releases
/// print two components or a date-like string. Missing components are
/// treated as zero.
#[must_use]
pub fn parse_sdk_version(output: &str) -> Option<Version> {
    let line = output.lines().find(|l| !l.trim().is_empty())?;
    let token = line.split_whitespace().last()?;
    let caps = SDK_VERSION.as_ref()?.captures(token)?;
    let part = |i: usize| {
        caps.get(i)
            .map_or(Some(0), |m| m.as_str().parse::<u64>().ok())
    };
    Some(Version::new(part(1)?, part(2)?, part(3)?))
}

/// Spelling of the zone flag for target-pool membership commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneFlag {
    Zone,
    InstancesZone,
}

impl ZoneFlag {
    /// Pick the flag for a probed SDK version. An unparsed version is
    /// assumed to be a current release.
    #[must_use]
    pub fn for_version(version: Option<&Version>, since: &Version) -> Self {
        match version {
            Some(v) if v < since => Self::Zone,
            _ => Self::InstancesZone,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zone => "--zone",
            Self::InstancesZone => "--instances-zone",
        }
    }
}

impl fmt::Display for ZoneFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
