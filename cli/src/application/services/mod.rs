//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`: never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

use std::process::Output;

use anyhow::Result;

use crate::domain::error::GcloudError;

pub mod capability;
pub mod config_service;
pub mod inventory;
pub mod session;
pub mod target_pool;

/// Return stdout of a finished gcloud command, or `CommandFailed` when it
/// exited non-zero.
///
/// # Errors
///
/// Returns [`GcloudError::CommandFailed`] on a non-zero exit status.
pub fn successful_stdout(command: &str, output: Output) -> Result<Vec<u8>> {
    if output.status.success() {
        return Ok(output.stdout);
    }
    Err(GcloudError::CommandFailed {
        command: command.to_string(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
    .into())
}
