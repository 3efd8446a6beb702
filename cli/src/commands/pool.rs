//! `gcetools pool`: add or remove target-pool members.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::GceSession;
use crate::application::ports::{Gcloud, InventoryCache};
use crate::output::PoolChange;

/// Target-pool subcommands.
#[derive(Subcommand, Debug)]
pub enum PoolCommand {
    /// Add an instance to a target pool
    Add {
        /// Target pool name
        pool: String,
        /// Instance name
        instance: String,
        /// Zone of the instance
        zone: String,
    },
    /// Remove an instance from a target pool
    Remove {
        /// Target pool name
        pool: String,
        /// Instance name
        instance: String,
        /// Zone of the instance
        zone: String,
    },
}

/// Run the pool command.
///
/// # Errors
///
/// Returns an error if gcloud rejects the change.
pub async fn run<G: Gcloud, C: InventoryCache>(
    app: &AppContext,
    session: &GceSession<G, C>,
    cmd: &PoolCommand,
) -> Result<ExitCode> {
    let change = match cmd {
        PoolCommand::Add {
            pool,
            instance,
            zone,
        } => {
            session.target_pool_add_instance(pool, instance, zone).await?;
            PoolChange::Added { pool, instance }
        }
        PoolCommand::Remove {
            pool,
            instance,
            zone,
        } => {
            session
                .target_pool_remove_instance(pool, instance, zone)
                .await?;
            PoolChange::Removed { pool, instance }
        }
    };
    app.renderer().render_pool_change(&change)?;
    Ok(ExitCode::SUCCESS)
}
