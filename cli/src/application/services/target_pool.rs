//! Target-pool membership changes.

use anyhow::Result;

use crate::application::ports::Gcloud;
use crate::application::services::successful_stdout;
use crate::domain::version::ZoneFlag;

/// Attach `instance` (in `zone`) to `pool`.
///
/// # Errors
///
/// Returns an error if gcloud cannot be run or exits non-zero.
pub async fn add_instance(
    gcloud: &impl Gcloud,
    zone_flag: ZoneFlag,
    pool: &str,
    instance: &str,
    zone: &str,
) -> Result<()> {
    tracing::debug!(pool, instance, zone, flag = %zone_flag, "adding instance to target pool");
    let output = gcloud.target_pool_add(pool, instance, zone_flag, zone).await?;
    successful_stdout(
        &format!("gcloud compute target-pools add-instances {pool}"),
        output,
    )?;
    Ok(())
}

/// Detach `instance` (in `zone`) from `pool`.
///
/// # Errors
///
/// Returns an error if gcloud cannot be run or exits non-zero.
pub async fn remove_instance(
    gcloud: &impl Gcloud,
    zone_flag: ZoneFlag,
    pool: &str,
    instance: &str,
    zone: &str,
) -> Result<()> {
    tracing::debug!(pool, instance, zone, flag = %zone_flag, "removing instance from target pool");
    let output = gcloud
        .target_pool_remove(pool, instance, zone_flag, zone)
        .await?;
    successful_stdout(
        &format!("gcloud compute target-pools remove-instances {pool}"),
        output,
    )?;
    Ok(())
}
