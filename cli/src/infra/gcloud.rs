//! Infrastructure implementation of the `Gcloud` port.
//!
//! `GcloudCli<R>` routes every gcloud invocation through a `CommandRunner`
//! so tests can inject a recording runner without spawning processes.

use std::process::Output;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, Gcloud};
use crate::domain::inventory::GroupScope;
use crate::domain::version::ZoneFlag;
use crate::infra::command_runner::TokioCommandRunner;

pub struct GcloudCli<R: CommandRunner> {
    runner: R,
    binary: String,
}

impl<R: CommandRunner> GcloudCli<R> {
    pub fn new(runner: R, binary: impl Into<String>) -> Self {
        Self {
            runner,
            binary: binary.into(),
        }
    }

    async fn gcloud(&self, args: &[&str]) -> Result<Output> {
        self.runner
            .run(&self.binary, args)
            .await
            .with_context(|| format!("gcloud {}", args.first().copied().unwrap_or_default()))
    }
}

impl GcloudCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn with_timeout(binary: &str, timeout: std::time::Duration) -> Self {
        Self::new(TokioCommandRunner::new(timeout), binary)
    }
}

impl<R: CommandRunner> Gcloud for GcloudCli<R> {
    async fn version(&self) -> Result<Output> {
        self.gcloud(&["version"]).await
    }

    async fn list_instances(&self) -> Result<Output> {
        self.gcloud(&["compute", "instances", "list", "--format=json"])
            .await
    }

    async fn list_group_instances(&self, group: &str, scope: &GroupScope) -> Result<Output> {
        let scope_flag = scope.flag();
        let mut args = vec![
            "compute",
            "instance-groups",
            "managed",
            "list-instances",
            group,
            "--format=json",
        ];
        if let Some(flag) = scope_flag.as_deref() {
            args.push(flag);
        }
        self.gcloud(&args).await
    }

    async fn describe_instance(&self, name: &str, zone: Option<&str>) -> Result<Output> {
        let mut args = vec!["compute", "instances", "describe", name];
        if let Some(zone) = zone {
            args.push("--zone");
            args.push(zone);
        }
        args.push("--format=json");
        self.gcloud(&args).await
    }

    async fn target_pool_add(
        &self,
        pool: &str,
        instance: &str,
        zone_flag: ZoneFlag,
        zone: &str,
    ) -> Result<Output> {
        self.gcloud(&[
            "compute",
            "target-pools",
            "add-instances",
            pool,
            "--instances",
            instance,
            zone_flag.as_str(),
            zone,
            "--format=json",
        ])
        .await
    }

    async fn target_pool_remove(
        &self,
        pool: &str,
        instance: &str,
        zone_flag: ZoneFlag,
        zone: &str,
    ) -> Result<Output> {
        self.gcloud(&[
            "compute",
            "target-pools",
            "remove-instances",
            pool,
            "--instances",
            instance,
            zone_flag.as_str(),
            zone,
            "--format=json",
        ])
        .await
    }
}
