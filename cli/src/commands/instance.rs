//! `gcetools instance`: look up one instance by name or external address.

use std::net::IpAddr;
use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::GceSession;
use crate::application::ports::{Gcloud, InventoryCache};

/// Instance subcommands.
#[derive(Subcommand, Debug)]
pub enum InstanceCommand {
    /// Show an instance record
    Show {
        /// Instance name or external IP
        target: String,
    },
    /// Print the name of the instance owning an external IP
    Name {
        /// External IP
        ip: String,
    },
    /// Print the zone of an instance
    Zone {
        /// Instance name or external IP
        target: String,
    },
}

/// Run the instance command.
///
/// Returns `ExitCode::FAILURE` when no instance matches.
///
/// # Errors
///
/// Returns an error if the implicit refresh fails.
pub async fn run<G: Gcloud, C: InventoryCache>(
    app: &AppContext,
    session: &mut GceSession<G, C>,
    cmd: &InstanceCommand,
) -> Result<ExitCode> {
    match cmd {
        InstanceCommand::Show { target } => {
            let found = if is_address(target) {
                session.instance_by_ip(target).await?
            } else {
                session.instance_by_name(target).await?
            };
            match found {
                Some(instance) => {
                    app.renderer().render_instance(instance)?;
                    Ok(ExitCode::SUCCESS)
                }
                None => not_found(app, target),
            }
        }
        InstanceCommand::Name { ip } => match session.instance_name_by_ip(ip).await? {
            Some(name) => {
                app.renderer().render_value("name", name)?;
                Ok(ExitCode::SUCCESS)
            }
            None => not_found(app, ip),
        },
        InstanceCommand::Zone { target } => {
            let zone = if is_address(target) {
                session.instance_zone_by_ip(target).await?
            } else {
                session.instance_zone_by_name(target).await?
            };
            match zone {
                Some(zone) => {
                    app.renderer().render_value("zone", short_zone(zone))?;
                    Ok(ExitCode::SUCCESS)
                }
                None => not_found(app, target),
            }
        }
    }
}

fn is_address(target: &str) -> bool {
    target.parse::<IpAddr>().is_ok()
}

/// Zones come back as resource URLs from `describe`; print the bare name.
fn short_zone(zone: &str) -> &str {
    zone.rsplit('/').next().unwrap_or(zone)
}

#[allow(clippy::unnecessary_wraps)]
fn not_found(app: &AppContext, target: &str) -> Result<ExitCode> {
    app.output.error(&format!("No instance matches '{target}'"));
    Ok(ExitCode::FAILURE)
}
