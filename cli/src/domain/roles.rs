//! Role extraction: every instance tag becomes a role listing NAT IPs.

use gcetools_common::{Instance, RoleTable};

/// Group NAT IPs by tag, in fetch order.
///
/// Instances without tags or without an external address contribute
/// nothing.
#[must_use]
pub fn extract_roles(instances: &[Instance]) -> RoleTable {
    let mut table = RoleTable::new();
    for instance in instances {
        let Some(address) = instance.nat_ip() else {
            continue;
        };
        for tag in instance.tag_items() {
            table.add(tag, address);
        }
    }
    table
}
