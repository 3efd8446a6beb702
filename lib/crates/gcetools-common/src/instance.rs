use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Compute Engine instance as printed by `gcloud ... --format=json`.
///
/// Only the fields gcetools reads are typed; everything else the tool
/// returns is kept in `extra` so a record re-serializes unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Full resource URL or short zone name, depending on the gcloud release.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    /// Managed instance group listings return a URL here instead of a `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_interfaces: Option<Vec<NetworkInterface>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Network tags attached to an instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    #[serde(default, rename = "networkIP", skip_serializing_if = "Option::is_none")]
    pub network_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_configs: Option<Vec<AccessConfig>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessConfig {
    #[serde(default, rename = "natIP", skip_serializing_if = "Option::is_none")]
    pub nat_ip: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instance {
    /// Instance name, treating an empty string as absent.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Zone exactly as gcloud reported it.
    #[must_use]
    pub fn zone(&self) -> Option<&str> {
        self.zone.as_deref()
    }

    /// Short zone name (`us-central1-a`) even when `zone` is a resource URL.
    #[must_use]
    pub fn zone_name(&self) -> Option<&str> {
        self.zone().and_then(|z| z.rsplit('/').next()).filter(|z| !z.is_empty())
    }

    /// External address of the first access config on the first interface.
    #[must_use]
    pub fn nat_ip(&self) -> Option<&str> {
        self.network_interfaces
            .as_deref()?
            .first()?
            .access_configs
            .as_deref()?
            .first()?
            .nat_ip
            .as_deref()
            .filter(|ip| !ip.is_empty())
    }

    /// Network tags, empty when the instance carries none.
    #[must_use]
    pub fn tag_items(&self) -> &[String] {
        self.tags
            .as_ref()
            .and_then(|t| t.items.as_deref())
            .unwrap_or_default()
    }

    /// Parsed group-membership reference, if this record carries one.
    #[must_use]
    pub fn member_ref(&self) -> Option<MemberRef> {
        self.instance.as_deref().and_then(MemberRef::parse)
    }

    /// `true` for a group-membership stub: a reference but no usable name.
    #[must_use]
    pub fn is_member_stub(&self) -> bool {
        self.name().is_none() && self.instance.is_some()
    }
}

/// Instance name and zone recovered from a group member's resource URL,
/// e.g. `.../projects/p/zones/us-central1-a/instances/web1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    pub name: String,
    pub zone: Option<String>,
}

impl MemberRef {
    /// Parse a resource URL or a bare instance name.
    #[must_use]
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim().trim_end_matches('/');
        if reference.is_empty() {
            return None;
        }
        if !reference.contains('/') {
            return Some(Self {
                name: reference.to_string(),
                zone: None,
            });
        }

        let segments: Vec<&str> = reference.split('/').collect();
        let after = |key: &str| {
            segments
                .windows(2)
                .rev()
                .find(|pair| pair[0] == key && !pair[1].is_empty())
                .map(|pair| pair[1].to_string())
        };

        Some(Self {
            name: after("instances")?,
            zone: after("zones"),
        })
    }
}
