//! `gcetools cache`: inspect or drop the instance listing cache.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::infra::cache::FileInventoryCache;

/// Cache subcommands.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show the cache file, its age and whether it would be reused
    Status,
    /// Delete the cache file
    Clear,
}

/// Run the cache command.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined or the cache
/// file cannot be inspected or removed.
pub fn run(app: &AppContext, cmd: &CacheCommand) -> Result<ExitCode> {
    run_with(app, &FileInventoryCache::new()?, cmd)
}

fn run_with(app: &AppContext, cache: &FileInventoryCache, cmd: &CacheCommand) -> Result<ExitCode> {
    match cmd {
        CacheCommand::Status => {
            let status = cache.status()?;
            let fresh = status.age.is_some_and(|age| app.cache_policy.is_fresh(age));
            app.renderer().render_cache_status(&status, fresh)?;
        }
        CacheCommand::Clear => {
            if cache.clear()? {
                app.output
                    .success(&format!("Removed {}", cache.path().display()));
            } else {
                app.output.info("No cached instance listing");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
