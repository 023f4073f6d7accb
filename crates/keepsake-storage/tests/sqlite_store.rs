// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The entity store over a real SQLite file.

use keepsake_config::model::StorageConfig;
use keepsake_core::model::CustomizationSettings;
use keepsake_storage::{LoadOptions, SqliteGateway, Store, migrate_all};
use keepsake_test_utils::fixtures;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn config(dir: &std::path::Path) -> StorageConfig {
    StorageConfig {
        database_path: dir.join("keepsake.db").to_string_lossy().into_owned(),
        wal_mode: true,
        quota_bytes: 50 * 1024 * 1024,
    }
}

#[tokio::test]
async fn store_round_trips_through_sqlite() {
    let dir = tempdir().unwrap();
    let config = config(dir.path());

    {
        let gateway = SqliteGateway::open(&config).await.unwrap();
        let (mut store, report) = Store::open(gateway, LoadOptions::default()).await.unwrap();
        assert!(report.is_clean());
        store.put_gem(fixtures::maximal_gem("g1")).await.unwrap();
        store.put_session(fixtures::maximal_session("s1", Some("g1"))).await.unwrap();
        store.put_profile(fixtures::maximal_profile("p1")).await.unwrap();
        store.put_memory(fixtures::profile_memory("m1", "p1")).await.unwrap();
        store.put_passion_story(fixtures::maximal_passion("pw1")).await.unwrap();
        let mut settings = CustomizationSettings::default();
        settings.background_blur = 999.0;
        store.put_settings(settings).await.unwrap();
        store.gateway().inner().close().await.unwrap();
    }

    let gateway = SqliteGateway::open(&config).await.unwrap();
    let (store, report) = Store::open(gateway, LoadOptions::default()).await.unwrap();
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(store.session("s1"), Some(&fixtures::maximal_session("s1", Some("g1"))));
    assert_eq!(store.profile("p1"), Some(&fixtures::maximal_profile("p1")));
    assert_eq!(store.settings().background_blur, 20.0);

    let (info, stats) = store
        .storage_info(config.quota_bytes, &CancellationToken::new())
        .unwrap();
    assert_eq!(info.breakdown.total(), info.usage);
    assert_eq!(stats.sessions, 1);
    assert_eq!(stats.gems, 1);
}

#[tokio::test]
async fn migrate_all_then_load_is_clean() {
    let dir = tempdir().unwrap();
    let config = config(dir.path());
    let gateway = SqliteGateway::open(&config).await.unwrap();
    let legacy = serde_json::to_vec(&fixtures::legacy_profile_json("p1")).unwrap();
    keepsake_core::PersistenceGateway::save(&gateway, "profile/p1", legacy)
        .await
        .unwrap();

    let report = migrate_all(&gateway).await.unwrap();
    assert_eq!(report.upgraded, ["profile/p1"]);

    let (store, load) = Store::open(gateway, LoadOptions::default()).await.unwrap();
    assert_eq!(load.migrated, 0);
    assert_eq!(load.stored_version, Some(keepsake_core::CURRENT_SCHEMA_VERSION));
    assert!(store.profile("p1").is_some());
}
