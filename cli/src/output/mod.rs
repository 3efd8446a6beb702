//! Output formatting module

pub mod human;
pub mod json;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use gcetools_common::{Instance, RoleTable};
use owo_colors::OwoColorize as _;
pub use styles::Styles;

pub use human::HumanRenderer;
pub use json::JsonRenderer;

use crate::domain::config::GceToolsConfig;
use crate::infra::cache::CacheStatus;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// A completed target-pool membership change.
#[derive(Debug, Clone, Copy)]
pub enum PoolChange<'a> {
    Added { pool: &'a str, instance: &'a str },
    Removed { pool: &'a str, instance: &'a str },
}

impl PoolChange<'_> {
    #[must_use]
    pub fn action(&self) -> &'static str {
        match self {
            Self::Added { .. } => "added",
            Self::Removed { .. } => "removed",
        }
    }
}

/// Dispatches rendering to the human or JSON renderer.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render the role table produced by a refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_roles(&self, roles: &RoleTable, roledefs: Option<&Path>) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_roles(roles, roledefs);
                Ok(())
            }
            Self::Json(r) => r.render_roles(roles, roledefs),
        }
    }

    /// Render one instance record.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_instance(&self, instance: &Instance) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_instance(instance);
                Ok(())
            }
            Self::Json(r) => r.render_instance(instance),
        }
    }

    /// Render a fetched instance sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_instances(&self, instances: &[Instance]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_instances(instances);
                Ok(())
            }
            Self::Json(r) => r.render_instances(instances),
        }
    }

    /// Render a single projected field (`instance name`, `instance zone`).
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_value(&self, field: &str, value: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_value(value);
                Ok(())
            }
            Self::Json(r) => r.render_value(field, value),
        }
    }

    /// Render a target-pool membership change.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_pool_change(&self, change: &PoolChange<'_>) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_pool_change(change);
                Ok(())
            }
            Self::Json(r) => r.render_pool_change(change),
        }
    }

    /// Render the active configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &GceToolsConfig, path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, path);
                Ok(())
            }
            Self::Json(r) => r.render_config(config, path),
        }
    }

    /// Render the cache file status.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_cache_status(&self, status: &CacheStatus, fresh: bool) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_cache_status(status, fresh);
                Ok(())
            }
            Self::Json(r) => r.render_cache_status(status, fresh),
        }
    }
}
