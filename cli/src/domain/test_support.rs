//! Record builders shared by domain unit tests.

use gcetools_common::{AccessConfig, Instance, NetworkInterface, Tags};

pub fn instance(name: &str, nat_ip: Option<&str>, tags: &[&str]) -> Instance {
    Instance {
        name: Some(name.to_string()),
        zone: Some("us-central1-a".to_string()),
        tags: (!tags.is_empty()).then(|| Tags {
            items: Some(tags.iter().map(|t| (*t).to_string()).collect()),
            fingerprint: None,
        }),
        network_interfaces: Some(vec![NetworkInterface {
            access_configs: Some(
                nat_ip
                    .map(|ip| AccessConfig {
                        nat_ip: Some(ip.to_string()),
                        ..AccessConfig::default()
                    })
                    .into_iter()
                    .collect(),
            ),
            ..NetworkInterface::default()
        }]),
        ..Instance::default()
    }
}
