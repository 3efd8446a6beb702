//! Name and NAT IP lookup tables over one fetched inventory.

use std::collections::HashMap;

use gcetools_common::Instance;

/// Lookup tables rebuilt wholesale on every refresh.
///
/// First occurrence wins in both maps.
#[derive(Debug, Clone, Default)]
pub struct InstanceIndex {
    by_name: HashMap<String, Instance>,
    by_ip: HashMap<String, Instance>,
}

impl InstanceIndex {
    /// Index fully resolved records (group stubs already described).
    #[must_use]
    pub fn build(instances: &[Instance]) -> Self {
        let mut index = Self::default();
        for instance in instances {
            if let Some(name) = instance.name() {
                index
                    .by_name
                    .entry(name.to_string())
                    .or_insert_with(|| instance.clone());
            }
            if let Some(ip) = instance.nat_ip() {
                index
                    .by_ip
                    .entry(ip.to_string())
                    .or_insert_with(|| instance.clone());
            }
        }
        index
    }

    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Instance> {
        self.by_name.get(name)
    }

    #[must_use]
    pub fn by_ip(&self, ip: &str) -> Option<&Instance> {
        self.by_ip.get(ip)
    }

    #[must_use]
    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn ip_count(&self) -> usize {
        self.by_ip.len()
    }
}
