//! `gcetools roles`: build the role table and merge it into `roledefs`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::GceSession;
use crate::application::ports::{Gcloud, InventoryCache, RoleRegistryStore};
use crate::commands::ScopeArgs;
use crate::domain::inventory::GroupScope;
use crate::infra::roledefs::JsonRoleRegistryFile;

/// Arguments for the roles command.
#[derive(Args, Debug)]
pub struct RolesArgs {
    /// Task-runner roledefs file to merge the roles into
    #[arg(long, value_name = "FILE")]
    pub roledefs: Option<PathBuf>,

    /// Only consider members of this managed instance group
    #[arg(long)]
    pub group: Option<String>,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

/// Run the roles command.
///
/// # Errors
///
/// Returns an error if the roledefs file cannot be read or written, or the
/// refresh fails.
pub async fn run<G: Gcloud, C: InventoryCache>(
    app: &AppContext,
    session: &mut GceSession<G, C>,
    args: &RolesArgs,
) -> Result<ExitCode> {
    let store = args.roledefs.clone().map(JsonRoleRegistryFile::new);
    if let Some(store) = &store {
        session.set_registry(store.load()?);
    }

    match &args.group {
        Some(group) => {
            let scope = GroupScope::from_flags(
                group,
                args.scope.region.as_deref(),
                args.scope.zone.as_deref(),
            )?;
            session.instances_by_group(group, scope).await?;
        }
        None => {
            session.update_roles().await?;
        }
    }

    if let Some(store) = &store {
        store.save(session.registry())?;
    }

    app.renderer()
        .render_roles(session.roles(), store.as_ref().map(JsonRoleRegistryFile::path))?;
    Ok(ExitCode::SUCCESS)
}
