//! gcetools - Compute Engine inventory for task-runner roles

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gcetools_cli::cli::Cli;
use gcetools_cli::domain::{ConfigError, GcloudError};
use gcetools_cli::output::json::format_error;

/// Environment variable holding the tracing filter directive.
const LOG_ENV: &str = "GCETOOLS_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            report_error(&e, json);
            ExitCode::FAILURE
        }
    }
}

fn report_error(e: &anyhow::Error, json: bool) {
    if !json {
        eprintln!("Error: {e:#}");
        return;
    }
    let code = if let Some(err) = e.downcast_ref::<GcloudError>() {
        err.code()
    } else if e.downcast_ref::<ConfigError>().is_some() {
        "INVALID_CONFIG"
    } else {
        "ERROR"
    };
    match format_error(&format!("{e:#}"), code) {
        Ok(obj) => println!("{obj}"),
        Err(_) => eprintln!("Error: {e:#}"),
    }
}
