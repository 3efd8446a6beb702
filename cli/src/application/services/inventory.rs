//! Inventory fetcher: cache-or-gcloud listing and group member resolution.

use anyhow::{Context, Result};
use gcetools_common::{Instance, MemberRef};

use crate::application::ports::{Gcloud, InventoryCache};
use crate::application::services::successful_stdout;
use crate::domain::inventory::{CachePolicy, InventoryQuery};

/// Fetch the instance listing for `query`.
///
/// The cache slot holds the full instance listing only. For
/// [`InventoryQuery::AllInstances`] a fresh cache file is returned as-is
/// without calling gcloud; otherwise gcloud is run and, when
/// `policy.use_cache` is set, its raw output replaces the cache file.
/// Group listings always call gcloud and never touch the cache.
///
/// # Errors
///
/// Returns an error if gcloud fails, its output is not a JSON array of
/// instances, or the cache cannot be read or written.
pub async fn fetch(
    gcloud: &impl Gcloud,
    cache: &impl InventoryCache,
    query: &InventoryQuery,
    policy: CachePolicy,
) -> Result<Vec<Instance>> {
    let cacheable = policy.use_cache && matches!(query, InventoryQuery::AllInstances);
    if cacheable
        && let Some(age) = cache.age()?
    {
        if policy.is_fresh(age) {
            tracing::debug!(age_secs = age.as_secs(), "using cached instance listing");
            let raw = cache.read()?;
            return parse_instances(&raw).context("parsing cached instance listing");
        }
        tracing::debug!(
            age_secs = age.as_secs(),
            expiration_secs = policy.expiration.as_secs(),
            "instance cache expired"
        );
    }

    let (command, output) = match query {
        InventoryQuery::AllInstances => (
            "gcloud compute instances list".to_string(),
            gcloud.list_instances().await?,
        ),
        InventoryQuery::Group { name, scope } => (
            format!("gcloud compute instance-groups managed list-instances {name}"),
            gcloud.list_group_instances(name, scope).await?,
        ),
    };
    let raw = successful_stdout(&command, output)?;
    let instances =
        parse_instances(&raw).with_context(|| format!("parsing output of '{command}'"))?;
    tracing::debug!(count = instances.len(), "fetched instance listing");

    if cacheable {
        cache.write(&raw)?;
    }
    Ok(instances)
}

/// Parse a `--format=json` instance listing. Empty output is an empty list.
///
/// # Errors
///
/// Returns an error if the bytes are not a JSON array of objects.
pub fn parse_instances(raw: &[u8]) -> Result<Vec<Instance>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_slice(raw)?)
}

/// Replace every group-membership stub with its full description.
///
/// Named records pass through unchanged; each stub costs exactly one
/// `describe` call, issued sequentially.
///
/// # Errors
///
/// Returns an error on the first describe call that fails.
pub async fn resolve_members(gcloud: &impl Gcloud, instances: &[Instance]) -> Result<Vec<Instance>> {
    let mut resolved = Vec::with_capacity(instances.len());
    for instance in instances {
        if instance.name().is_some() {
            resolved.push(instance.clone());
            continue;
        }
        let Some(member) = instance.member_ref() else {
            tracing::warn!("skipping instance record with neither a name nor an instance reference");
            continue;
        };
        resolved.push(describe(gcloud, &member).await?);
    }
    Ok(resolved)
}

/// Fetch the full record for one group member.
///
/// # Errors
///
/// Returns an error if the describe call fails or returns unparsable JSON.
pub async fn describe(gcloud: &impl Gcloud, member: &MemberRef) -> Result<Instance> {
    tracing::debug!(instance = %member.name, zone = ?member.zone, "describing group member");
    let output = gcloud
        .describe_instance(&member.name, member.zone.as_deref())
        .await?;
    let raw = successful_stdout(
        &format!("gcloud compute instances describe {}", member.name),
        output,
    )?;
    serde_json::from_slice(&raw)
        .with_context(|| format!("parsing description of instance '{}'", member.name))
}
