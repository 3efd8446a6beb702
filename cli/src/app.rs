//! Application context: unified state passed to every command handler.
//!
//! `AppContext` loads the configuration once, applies the global cache flags
//! on top of it, and knows how to build the gcloud session the inventory
//! commands run against.

use std::time::Duration;

use anyhow::Result;

use crate::application::GceSession;
use crate::application::ports::ConfigStore;
use crate::application::services::session::SessionSettings;
use crate::domain::config::GceToolsConfig;
use crate::domain::inventory::CachePolicy;
use crate::infra::cache::FileInventoryCache;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::gcloud::GcloudCli;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Session type used by the CLI: real `gcloud`, on-disk cache.
pub type LiveSession = GceSession<GcloudCli<TokioCommandRunner>, FileInventoryCache>;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Cache overrides from the command line.
#[derive(Default)]
pub struct CacheFlags {
    /// Neither read nor write the instance cache.
    pub no_cache: bool,
    /// Replace `cache.expiration` for this invocation.
    pub expiration: Option<u64>,
}

impl CacheFlags {
    /// Apply the overrides to the configured policy.
    #[must_use]
    pub fn apply(&self, mut policy: CachePolicy) -> CachePolicy {
        if let Some(secs) = self.expiration {
            policy.expiration = Duration::from_secs(secs);
        }
        if self.no_cache {
            policy.use_cache = false;
        }
        policy
    }
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Cache options.
    pub cache: CacheFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Configuration store.
    pub config_store: YamlConfigStore,
    /// Configuration as loaded at startup.
    pub config: GceToolsConfig,
    /// Effective cache policy after command-line overrides.
    pub cache_policy: CachePolicy,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        Self::with_store(flags, YamlConfigStore::default())
    }

    /// Construct an `AppContext` reading configuration from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read.
    pub fn with_store(flags: &AppFlags, config_store: YamlConfigStore) -> Result<Self> {
        let config = config_store.load()?;
        let cache_policy = flags.cache.apply(config.cache_policy());

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store,
            config,
            cache_policy,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Settings applied by lookups that refresh implicitly.
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            cache: self.cache_policy,
            instances_zone_since: self.config.instances_zone_since(),
        }
    }

    /// Probe the configured `gcloud` binary and open a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined or the
    /// probe fails.
    pub async fn connect(&self) -> Result<LiveSession> {
        let gcloud =
            GcloudCli::with_timeout(&self.config.gcloud.binary, self.config.gcloud_timeout());
        let cache = FileInventoryCache::new()?;
        GceSession::connect(gcloud, cache, self.session_settings()).await
    }
}
