pub mod instance;
pub mod roles;

pub use instance::{AccessConfig, Instance, MemberRef, NetworkInterface, Tags};
pub use roles::{RoleRegistry, RoleTable};
