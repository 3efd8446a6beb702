//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── gcloud errors ─────────────────────────────────────────────────────────────

/// Errors raised while talking to the `gcloud` binary.
#[derive(Debug, Error)]
pub enum GcloudError {
    #[error(
        "Failed to run 'gcloud version'. That means you don't have gcloud installed or it's not part of the path.\nTo install gcloud see https://cloud.google.com/sdk/"
    )]
    NotInstalled,

    #[error("'{command}' failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Instance group '{group}' accepts --region or --zone, not both.")]
    ConflictingScope { group: String },
}

impl GcloudError {
    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInstalled => "GCLOUD_NOT_INSTALLED",
            Self::CommandFailed { .. } => "GCLOUD_COMMAND_FAILED",
            Self::ConflictingScope { .. } => "CONFLICTING_SCOPE",
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
