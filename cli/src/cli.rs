//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, CacheFlags, OutputFlags};
use crate::commands;

/// Compute Engine inventory for task-runner roles
#[derive(Parser)]
#[command(
    name = "gcetools",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Always list live and leave the instance cache untouched
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Seconds a cached instance listing stays fresh (overrides cache.expiration)
    #[arg(long, global = true, value_name = "SECS")]
    pub cache_expiration: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Derive roles from instance tags and merge them into a roledefs file
    Roles(commands::roles::RolesArgs),

    /// Look up an instance by name or external IP
    #[command(subcommand)]
    Instance(commands::instance::InstanceCommand),

    /// List the members of a managed instance group
    Group(commands::group::GroupArgs),

    /// Manage target-pool membership
    #[command(subcommand)]
    Pool(commands::pool::PoolCommand),

    /// Inspect or clear the instance cache
    #[command(subcommand)]
    Cache(commands::cache::CacheCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or the command
    /// fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            no_cache,
            cache_expiration,
            command,
        } = self;

        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            cache: CacheFlags {
                no_cache,
                expiration: cache_expiration,
            },
        };

        match command {
            Command::Version => {
                commands::version::run(json);
                Ok(ExitCode::SUCCESS)
            }
            Command::Roles(args) => {
                let app = AppContext::new(&flags)?;
                let mut session = app.connect().await?;
                commands::roles::run(&app, &mut session, &args).await
            }
            Command::Instance(cmd) => {
                let app = AppContext::new(&flags)?;
                let mut session = app.connect().await?;
                commands::instance::run(&app, &mut session, &cmd).await
            }
            Command::Group(args) => {
                let app = AppContext::new(&flags)?;
                let mut session = app.connect().await?;
                commands::group::run(&app, &mut session, &args).await
            }
            Command::Pool(cmd) => {
                let app = AppContext::new(&flags)?;
                let session = app.connect().await?;
                commands::pool::run(&app, &session, &cmd).await
            }
            Command::Cache(cmd) => commands::cache::run(&AppContext::new(&flags)?, &cmd),
            Command::Config(cmd) => commands::config::run(&AppContext::new(&flags)?, &cmd),
        }
    }
}
