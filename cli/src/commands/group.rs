//! `gcetools group`: list the members of a managed instance group.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::GceSession;
use crate::application::ports::{Gcloud, InventoryCache};
use crate::commands::ScopeArgs;
use crate::domain::inventory::GroupScope;

/// Arguments for the group command.
#[derive(Args, Debug)]
pub struct GroupArgs {
    /// Managed instance group name
    pub group: String,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

/// Run the group command.
///
/// # Errors
///
/// Returns an error if the listing or a member describe call fails.
pub async fn run<G: Gcloud, C: InventoryCache>(
    app: &AppContext,
    session: &mut GceSession<G, C>,
    args: &GroupArgs,
) -> Result<ExitCode> {
    let scope = GroupScope::from_flags(
        &args.group,
        args.scope.region.as_deref(),
        args.scope.zone.as_deref(),
    )?;
    let members = session.instances_by_group(&args.group, scope).await?;
    app.renderer().render_instances(members)?;
    Ok(ExitCode::SUCCESS)
}
