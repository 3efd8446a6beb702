//! Human-readable terminal renderer.

use std::path::Path;

use gcetools_common::{Instance, RoleTable};
use owo_colors::OwoColorize as _;

use crate::domain::config::GceToolsConfig;
use crate::infra::cache::CacheStatus;
use crate::output::{OutputContext, PoolChange};

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render roles as `role: addr, addr`.
    pub fn render_roles(&self, roles: &RoleTable, roledefs: Option<&Path>) {
        if roles.is_empty() {
            self.ctx.warn("No tagged instances with an external address.");
        }
        for (role, hosts) in roles.iter() {
            if self.ctx.quiet {
                println!("{role}: {}", hosts.join(","));
            } else {
                println!("  {:<20} {}", role.style(self.ctx.styles.role), hosts.join(", "));
            }
        }
        if let Some(path) = roledefs {
            self.ctx.success(&format!(
                "Merged {} roles into {}",
                roles.len(),
                path.display()
            ));
        }
    }

    /// Render one instance as key/value pairs.
    pub fn render_instance(&self, instance: &Instance) {
        let tags = instance.tag_items().join(", ");
        self.ctx.kv("Name:  ", instance.name().unwrap_or("-"));
        self.ctx.kv("Zone:  ", instance.zone_name().unwrap_or("-"));
        self.ctx
            .kv("Status:", instance.status.as_deref().unwrap_or("-"));
        self.ctx.kv("NAT IP:", instance.nat_ip().unwrap_or("-"));
        self.ctx
            .kv("Tags:  ", if tags.is_empty() { "-" } else { &tags });
    }

    /// Render instances one per line: name, zone, NAT IP, status.
    pub fn render_instances(&self, instances: &[Instance]) {
        if instances.is_empty() {
            self.ctx.warn("No instances found.");
            return;
        }
        for instance in instances {
            let name = instance
                .name()
                .map(ToString::to_string)
                .or_else(|| instance.member_ref().map(|m| m.name))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {name:<24} {:<18} {:<16} {}",
                instance.zone_name().unwrap_or("-"),
                instance.nat_ip().unwrap_or("-"),
                instance.status.as_deref().unwrap_or("")
            );
        }
    }

    /// Render a bare value so it can be captured by scripts.
    pub fn render_value(&self, value: &str) {
        println!("{value}");
    }

    pub fn render_pool_change(&self, change: &PoolChange<'_>) {
        let msg = match change {
            PoolChange::Added { pool, instance } => format!("Added {instance} to target pool {pool}"),
            PoolChange::Removed { pool, instance } => {
                format!("Removed {instance} from target pool {pool}")
            }
        };
        self.ctx.success(&msg);
    }

    /// Render the current gcetools configuration.
    pub fn render_config(&self, config: &GceToolsConfig, path: &Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!("  {:<30} {}", "cache.enabled:", config.cache.enabled);
        println!("  {:<30} {}", "cache.expiration:", config.cache.expiration);
        println!("  {:<30} {}", "gcloud.binary:", config.gcloud.binary);
        println!("  {:<30} {}", "gcloud.timeout:", config.gcloud.timeout);
        println!(
            "  {:<30} {}",
            "gcloud.instances_zone_since:", config.gcloud.instances_zone_since
        );
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["GCETOOLS_CONFIG", "GCETOOLS_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }

    /// Render the cache file status.
    pub fn render_cache_status(&self, status: &CacheStatus, fresh: bool) {
        self.ctx.kv("Path:", &status.path.display().to_string());
        match (status.created, status.age) {
            (Some(created), Some(age)) => {
                let created: chrono::DateTime<chrono::Local> = created.into();
                self.ctx
                    .kv("Created:", &created.format("%Y-%m-%d %H:%M:%S").to_string());
                self.ctx.kv("Age:", &format!("{}s", age.as_secs()));
                if let Some(size) = status.size {
                    self.ctx.kv("Size:", &format!("{size} bytes"));
                }
                if fresh {
                    self.ctx.success("Cache is fresh");
                } else {
                    self.ctx.warn("Cache is expired; the next refresh calls gcloud");
                }
            }
            _ => self.ctx.info("No cached instance listing"),
        }
    }
}
