//! Command implementations

pub mod cache;
pub mod config;
pub mod group;
pub mod instance;
pub mod pool;
pub mod roles;
pub mod version;

use clap::Args;

/// Managed instance group location, shared by `roles` and `group`.
#[derive(Args, Debug, Clone, Default)]
pub struct ScopeArgs {
    /// Region of a regional managed instance group
    #[arg(long, conflicts_with = "zone")]
    pub region: Option<String>,

    /// Zone of a zonal managed instance group
    #[arg(long)]
    pub zone: Option<String>,
}
