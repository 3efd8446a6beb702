//! Unit tests for `GceSession`: probe, fetch/cache, indexes, roles, groups
//! and target pools, driven through a scripted gcloud.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use gcetools_cli::application::{GceSession, SessionSettings};
use gcetools_cli::domain::error::GcloudError;
use gcetools_cli::domain::inventory::{CachePolicy, GroupScope, InventoryQuery};
use gcetools_common::RoleRegistry;
use serde_json::json;

use crate::helpers::{
    API_X1, FakeGcloud, GROUP_LISTING, LISTING, MemoryCache, err_output, ok_output,
};

const HOUR: Duration = Duration::from_secs(3600);

fn settings(cache: CachePolicy) -> SessionSettings {
    SessionSettings {
        cache,
        ..SessionSettings::default()
    }
}

async fn open_session(
    gcloud: FakeGcloud,
    cache: MemoryCache,
) -> GceSession<FakeGcloud, MemoryCache> {
    GceSession::connect(gcloud, cache, SessionSettings::default())
        .await
        .expect("connect")
}

fn gcloud_error(err: &anyhow::Error) -> &GcloudError {
    err.downcast_ref::<GcloudError>()
        .expect("expected a GcloudError")
}

// ── Probe ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_records_sdk_version() {
    let session = open_session(FakeGcloud::new("138.0.0"), MemoryCache::default()).await;
    assert_eq!(
        session.capability().version,
        Some(semver::Version::new(138, 0, 0))
    );
    assert!(!session.is_loaded());
}

#[tokio::test]
async fn test_connect_missing_gcloud_is_not_installed() {
    let Err(err) = GceSession::connect(
        FakeGcloud::missing(),
        MemoryCache::default(),
        SessionSettings::default(),
    )
    .await
    else {
        panic!("connect should fail without gcloud");
    };
    assert!(matches!(gcloud_error(&err), GcloudError::NotInstalled));
    assert!(err.to_string().contains("https://cloud.google.com/sdk/"));
}

#[tokio::test]
async fn test_connect_failing_version_command_is_not_installed() {
    let gcloud = FakeGcloud::new("1.0.0").with_version_output(err_output(127, b"not found"));
    let Err(err) =
        GceSession::connect(gcloud, MemoryCache::default(), SessionSettings::default()).await
    else {
        panic!("connect should fail when 'gcloud version' exits non-zero");
    };
    assert!(matches!(gcloud_error(&err), GcloudError::NotInstalled));
}

#[tokio::test]
async fn test_connect_probes_exactly_once() {
    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let log = gcloud.log();
    let mut session = open_session(gcloud, MemoryCache::default()).await;

    session.update_roles().await.unwrap();
    session.instance_by_name("web1").await.unwrap();

    assert_eq!(log.count("version"), 1);
}

// ── Roles ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_roles_groups_external_addresses_by_tag() {
    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let log = gcloud.log();
    let mut session = open_session(gcloud, MemoryCache::default()).await;

    let fetched = session.update_roles().await.unwrap();
    assert_eq!(fetched.len(), 3);

    let roles = session.roles();
    assert_eq!(
        roles.hosts("web").unwrap(),
        ["35.1.1.1".to_string(), "35.1.1.2".to_string()]
    );
    assert_eq!(roles.hosts("http").unwrap(), ["35.1.1.1".to_string()]);
    // db1 has no external address
    assert!(roles.hosts("db").is_none());
    assert_eq!(log.calls(), ["version", "list"]);
}

#[tokio::test]
async fn test_update_roles_merges_into_existing_registry() {
    let mut registry = RoleRegistry::new();
    registry.insert("web", json!(["10.9.9.9"]));
    registry.insert("bastion", json!({"hosts": ["bastion.example.com"]}));

    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let mut session = open_session(gcloud, MemoryCache::default()).await;
    session.set_registry(registry);
    session.update_roles().await.unwrap();

    let registry = session.registry();
    assert_eq!(registry.hosts("web").unwrap(), ["35.1.1.1", "35.1.1.2"]);
    assert_eq!(
        registry.get("bastion").unwrap(),
        &json!({"hosts": ["bastion.example.com"]})
    );
    assert_eq!(registry.hosts("http").unwrap(), ["35.1.1.1"]);
}

#[tokio::test]
async fn test_update_roles_empty_project_yields_no_roles() {
    let gcloud = FakeGcloud::new("138.0.0").with_listing("");
    let mut session = open_session(gcloud, MemoryCache::default()).await;

    assert!(session.update_roles().await.unwrap().is_empty());
    assert!(session.roles().is_empty());
    assert!(session.is_loaded());
}

// ── Lookups ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_lookups_refresh_once_on_first_use() {
    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let log = gcloud.log();
    let mut session = open_session(gcloud, MemoryCache::default()).await;

    assert_eq!(
        session.instance_zone_by_name("web1").await.unwrap(),
        Some("us-central1-a")
    );
    assert_eq!(
        session.instance_name_by_ip("35.1.1.2").await.unwrap(),
        Some("web2")
    );
    assert_eq!(
        session.instance_zone_by_ip("35.1.1.2").await.unwrap(),
        Some("us-central1-b")
    );
    assert_eq!(log.count("list"), 1);
}

#[tokio::test]
async fn test_lookups_unknown_keys_are_absent() {
    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let mut session = open_session(gcloud, MemoryCache::default()).await;

    assert!(session.instance_by_name("nope").await.unwrap().is_none());
    assert!(session.instance_by_ip("1.2.3.4").await.unwrap().is_none());
    // internal addresses are not indexed
    assert!(session.instance_by_ip("10.0.0.2").await.unwrap().is_none());
    assert!(session.instance_zone_by_name("").await.unwrap().is_none());
}

#[tokio::test]
async fn test_lookup_after_failed_refresh_retries() {
    let gcloud = FakeGcloud::new("138.0.0")
        .with_list_output(err_output(1, b"ERROR: (gcloud.compute.instances.list) auth"));
    let log = gcloud.log();
    let mut session = open_session(gcloud, MemoryCache::default()).await;

    let err = session.instance_by_name("web1").await.unwrap_err();
    assert!(matches!(
        gcloud_error(&err),
        GcloudError::CommandFailed { stderr, .. } if stderr.contains("auth")
    ));
    assert!(!session.is_loaded());

    session.instance_by_name("web1").await.unwrap_err();
    assert_eq!(log.count("list"), 2);
}

// ── Cache ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fresh_cache_skips_gcloud() {
    let gcloud = FakeGcloud::new("138.0.0").with_listing("[]");
    let log = gcloud.log();
    let cache = MemoryCache::holding(LISTING, HOUR);
    let mut session = open_session(gcloud, cache.clone()).await;

    session.update_roles().await.unwrap();

    assert_eq!(log.count("list"), 0);
    assert_eq!(session.instances().len(), 3);
    assert_eq!(cache.writes(), 0);
}

#[tokio::test]
async fn test_cached_listing_matches_live_results() {
    let cache = MemoryCache::default();
    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let mut live = open_session(gcloud, cache.clone()).await;
    live.update_roles().await.unwrap();

    let gcloud = FakeGcloud::new("138.0.0");
    let log = gcloud.log();
    let mut cached = open_session(gcloud, cache).await;
    cached.update_roles().await.unwrap();

    assert_eq!(log.count("list"), 0);
    assert_eq!(cached.roles(), live.roles());
    for ip in ["35.1.1.1", "35.1.1.2"] {
        assert_eq!(
            cached.instance_name_by_ip(ip).await.unwrap(),
            live.instance_name_by_ip(ip).await.unwrap()
        );
    }
}

#[tokio::test]
async fn test_expired_cache_lists_live_and_rewrites_cache() {
    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let log = gcloud.log();
    let cache = MemoryCache::holding("[]", 25 * HOUR);
    let mut session = open_session(gcloud, cache.clone()).await;

    session.update_roles().await.unwrap();

    assert_eq!(log.count("list"), 1);
    assert_eq!(cache.writes(), 1);
    assert_eq!(cache.contents().as_deref(), Some(LISTING));
}

#[tokio::test]
async fn test_cache_expiration_is_exclusive() {
    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let log = gcloud.log();
    let cache = MemoryCache::holding("[]", HOUR);
    let policy = CachePolicy {
        use_cache: true,
        expiration: HOUR,
    };
    let mut session = GceSession::connect(gcloud, cache, settings(policy))
        .await
        .unwrap();

    session.update_roles().await.unwrap();
    assert_eq!(log.count("list"), 1);
}

#[tokio::test]
async fn test_disabled_cache_neither_reads_nor_writes() {
    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let log = gcloud.log();
    let cache = MemoryCache::holding("[]", Duration::ZERO);
    let mut session = GceSession::connect(gcloud, cache.clone(), settings(CachePolicy::disabled()))
        .await
        .unwrap();

    session.update_roles().await.unwrap();

    assert_eq!(log.count("list"), 1);
    assert_eq!(cache.writes(), 0);
    assert_eq!(cache.contents().as_deref(), Some("[]"));
}

#[tokio::test]
async fn test_unparsable_listing_is_not_cached() {
    let gcloud = FakeGcloud::new("138.0.0").with_list_output(ok_output(b"WARNING: not json"));
    let cache = MemoryCache::default();
    let mut session = open_session(gcloud, cache.clone()).await;

    assert!(session.update_roles().await.is_err());
    assert_eq!(cache.writes(), 0);
}

#[tokio::test]
async fn test_refresh_with_explicit_query_and_policy() {
    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let cache = MemoryCache::holding("[]", Duration::ZERO);
    let mut session = open_session(gcloud, cache).await;

    let fetched = session
        .refresh(&InventoryQuery::AllInstances, CachePolicy::disabled())
        .await
        .unwrap();
    assert_eq!(fetched.len(), 3);
}

// ── Groups ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_group_members_are_described_once_each() {
    let gcloud = FakeGcloud::new("138.0.0")
        .with_group(GROUP_LISTING)
        .with_describe("api-x1", API_X1);
    let log = gcloud.log();
    let cache = MemoryCache::default();
    let mut session = open_session(gcloud, cache.clone()).await;

    let members = session
        .instances_by_group("api", GroupScope::Zone("europe-west1-b".to_string()))
        .await
        .unwrap();

    // the raw listing is returned, stubs and all
    assert_eq!(members.len(), 1);
    assert!(members[0].is_member_stub());
    assert_eq!(
        log.calls(),
        [
            "version",
            "group api --zone=europe-west1-b",
            "describe api-x1 europe-west1-b"
        ]
    );
    assert_eq!(session.roles().hosts("api").unwrap(), ["35.9.9.9".to_string()]);
    assert_eq!(cache.writes(), 0);
}

#[tokio::test]
async fn test_group_refresh_replaces_lookup_tables() {
    let gcloud = FakeGcloud::new("138.0.0")
        .with_listing(LISTING)
        .with_group(GROUP_LISTING)
        .with_describe("api-x1", API_X1);
    let log = gcloud.log();
    let mut session = open_session(gcloud, MemoryCache::default()).await;

    session.update_roles().await.unwrap();
    session
        .instances_by_group("api", GroupScope::All)
        .await
        .unwrap();

    assert!(
        session
            .instance_zone_by_name("api-x1")
            .await
            .unwrap()
            .is_some_and(|z| z.ends_with("/zones/europe-west1-b"))
    );
    assert!(session.instance_by_name("web1").await.unwrap().is_none());
    assert_eq!(log.count("list"), 1);
    assert_eq!(log.count("group api"), 1);
}

#[tokio::test]
async fn test_group_member_describe_failure_keeps_previous_state() {
    let gcloud = FakeGcloud::new("138.0.0")
        .with_listing(LISTING)
        .with_group(GROUP_LISTING);
    let mut session = open_session(gcloud, MemoryCache::default()).await;
    session.update_roles().await.unwrap();

    let err = session
        .instances_by_group("api", GroupScope::Region("europe-west1".to_string()))
        .await
        .unwrap_err();

    assert!(matches!(
        gcloud_error(&err),
        GcloudError::CommandFailed { .. }
    ));
    assert!(session.instance_by_name("web1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_group_refresh_ignores_fresh_inventory_cache() {
    let gcloud = FakeGcloud::new("138.0.0")
        .with_group(GROUP_LISTING)
        .with_describe("api-x1", API_X1);
    let log = gcloud.log();
    let cache = MemoryCache::holding(LISTING, Duration::from_secs(1));
    let mut session = open_session(gcloud, cache.clone()).await;

    let members = session
        .refresh(&InventoryQuery::group("api", GroupScope::All), CachePolicy::default())
        .await
        .unwrap();

    assert_eq!(members.len(), 1);
    assert_eq!(log.count("group api"), 1);
    assert_eq!(cache.writes(), 0);
    assert_eq!(cache.contents().as_deref(), Some(LISTING));
}

#[tokio::test]
async fn test_group_refresh_leaves_cold_cache_for_full_inventory() {
    let cache = MemoryCache::default();
    let gcloud = FakeGcloud::new("138.0.0")
        .with_group(GROUP_LISTING)
        .with_describe("api-x1", API_X1);
    let mut group_session = open_session(gcloud, cache.clone()).await;
    group_session
        .refresh(&InventoryQuery::group("api", GroupScope::All), CachePolicy::default())
        .await
        .unwrap();
    assert_eq!(cache.writes(), 0);
    assert!(cache.contents().is_none());

    let gcloud = FakeGcloud::new("138.0.0").with_listing(LISTING);
    let log = gcloud.log();
    let mut session = open_session(gcloud, cache.clone()).await;

    assert!(session.instance_by_name("web1").await.unwrap().is_some());
    assert_eq!(log.count("list"), 1);
    assert_eq!(cache.contents().as_deref(), Some(LISTING));
}

#[tokio::test]
async fn test_group_records_without_reference_are_skipped() {
    let listing = r#"[
      {"status": "RUNNING"},
      {"instance": "https://www.googleapis.com/compute/v1/projects/p/zones/europe-west1-b/instances/api-x1"},
      {"instance": "projects/p/zones/europe-west1-b"}
    ]"#;
    let gcloud = FakeGcloud::new("138.0.0")
        .with_group(listing)
        .with_describe("api-x1", API_X1);
    let log = gcloud.log();
    let mut session = open_session(gcloud, MemoryCache::default()).await;

    let members = session
        .instances_by_group("api", GroupScope::All)
        .await
        .unwrap();
    assert_eq!(members.len(), 3);

    assert_eq!(log.count("describe"), 1);
    assert_eq!(log.count("describe api-x1 europe-west1-b"), 1);
    assert_eq!(session.roles().hosts("api").unwrap(), ["35.9.9.9".to_string()]);
    assert_eq!(
        session.instance_name_by_ip("35.9.9.9").await.unwrap(),
        Some("api-x1")
    );
}

// ── Target pools ─────────────────────────────────────────────────────────────

async fn pool_calls(version: &str) -> Vec<String> {
    let gcloud = FakeGcloud::new(version);
    let log = gcloud.log();
    let session = open_session(gcloud, MemoryCache::default()).await;
    session
        .target_pool_add_instance("lb", "web1", "us-central1-a")
        .await
        .unwrap();
    session
        .target_pool_remove_instance("lb", "web1", "us-central1-a")
        .await
        .unwrap();
    log.calls().into_iter().filter(|c| c.starts_with("pool")).collect()
}

#[tokio::test]
async fn test_target_pool_before_threshold_uses_zone() {
    assert_eq!(
        pool_calls("0.9.77").await,
        [
            "pool-add lb web1 --zone us-central1-a",
            "pool-remove lb web1 --zone us-central1-a"
        ]
    );
}

#[tokio::test]
async fn test_target_pool_from_threshold_uses_instances_zone() {
    for version in ["0.9.78", "0.9.79", "138.0.0"] {
        assert_eq!(
            pool_calls(version).await,
            [
                "pool-add lb web1 --instances-zone us-central1-a",
                "pool-remove lb web1 --instances-zone us-central1-a"
            ],
            "version {version}"
        );
    }
}

#[tokio::test]
async fn test_target_pool_unparsable_version_uses_instances_zone() {
    let gcloud = FakeGcloud::new("x").with_version_output(ok_output(b"\n"));
    let log = gcloud.log();
    let session = open_session(gcloud, MemoryCache::default()).await;
    assert!(session.capability().version.is_none());

    session
        .target_pool_add_instance("lb", "web1", "us-central1-a")
        .await
        .unwrap();
    assert_eq!(log.count("pool-add lb web1 --instances-zone"), 1);
}

#[tokio::test]
async fn test_target_pool_threshold_is_configurable() {
    let gcloud = FakeGcloud::new("0.9.80");
    let log = gcloud.log();
    let settings = SessionSettings {
        instances_zone_since: semver::Version::new(1, 0, 0),
        ..SessionSettings::default()
    };
    let session = GceSession::connect(gcloud, MemoryCache::default(), settings)
        .await
        .unwrap();

    session
        .target_pool_add_instance("lb", "web1", "us-central1-a")
        .await
        .unwrap();
    assert_eq!(log.count("pool-add lb web1 --zone "), 1);
}

#[tokio::test]
async fn test_target_pool_failure_reports_stderr() {
    let gcloud = FakeGcloud::new("138.0.0")
        .with_pool_output(err_output(1, b"ERROR: target pool lb not found"));
    let session = open_session(gcloud, MemoryCache::default()).await;

    let err = session
        .target_pool_remove_instance("lb", "web1", "us-central1-a")
        .await
        .unwrap_err();
    assert!(matches!(
        gcloud_error(&err),
        GcloudError::CommandFailed { stderr, .. } if stderr == "ERROR: target pool lb not found"
    ));
}
