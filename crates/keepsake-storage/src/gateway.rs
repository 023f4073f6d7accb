// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`PersistenceGateway`].

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use tracing::debug;

use keepsake_config::model::StorageConfig;
use keepsake_core::{KeepsakeError, PersistenceGateway};

use crate::database::{Database, map_tr_err};

/// Records stored as rows of the `records` table, one row per key.
pub struct SqliteGateway {
    db: Database,
}

impl SqliteGateway {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open the database named by the storage configuration.
    pub async fn open(config: &StorageConfig) -> Result<Self, KeepsakeError> {
        let db = Database::open(&config.database_path, config.wal_mode).await?;
        Ok(Self::new(db))
    }

    pub async fn close(&self) -> Result<(), KeepsakeError> {
        self.db.close().await
    }
}

#[async_trait]
impl PersistenceGateway for SqliteGateway {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, KeepsakeError> {
        let key = key.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<Option<Vec<u8>>, rusqlite::Error> {
                conn.query_row(
                    "SELECT value FROM records WHERE key = ?1",
                    rusqlite::params![key],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), KeepsakeError> {
        let key = key.to_string();
        let len = bytes.len();
        let saved = key.clone();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO records (key, value, updated_at)
                     VALUES (?1, ?2, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
                     ON CONFLICT(key) DO UPDATE SET
                         value = excluded.value,
                         updated_at = excluded.updated_at",
                    rusqlite::params![key, bytes],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!(key = %saved, bytes = len, "record saved");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KeepsakeError> {
        let key = key.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute("DELETE FROM records WHERE key = ?1", rusqlite::params![key])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KeepsakeError> {
        let prefix = prefix.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<Vec<String>, rusqlite::Error> {
                // substr rather than LIKE: keys may contain `%` and `_`.
                let mut stmt = conn.prepare(
                    "SELECT key FROM records
                     WHERE substr(key, 1, length(?1)) = ?1
                     ORDER BY key",
                )?;
                let keys = stmt
                    .query_map(rusqlite::params![prefix], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(keys)
            })
            .await
            .map_err(map_tr_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn memory_gateway() -> SqliteGateway {
        SqliteGateway::new(Database::open(":memory:", false).await.unwrap())
    }

    #[tokio::test]
    async fn save_then_load() {
        let gateway = memory_gateway().await;
        gateway.save("gem/g1", b"{\"id\":\"g1\"}".to_vec()).await.unwrap();
        let loaded = gateway.load("gem/g1").await.unwrap();
        assert_eq!(loaded.as_deref(), Some(&b"{\"id\":\"g1\"}"[..]));
    }

    #[tokio::test]
    async fn load_missing_key_is_none() {
        let gateway = memory_gateway().await;
        assert!(gateway.load("gem/nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites() {
        let gateway = memory_gateway().await;
        gateway.save("settings", b"old".to_vec()).await.unwrap();
        gateway.save("settings", b"new".to_vec()).await.unwrap();
        assert_eq!(gateway.load("settings").await.unwrap(), Some(b"new".to_vec()));
        assert_eq!(gateway.list_keys("").await.unwrap(), ["settings"]);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let gateway = memory_gateway().await;
        gateway.save("favorite/f1", b"x".to_vec()).await.unwrap();
        gateway.delete("favorite/f1").await.unwrap();
        gateway.delete("favorite/f1").await.unwrap();
        assert!(gateway.load("favorite/f1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_keys_matches_literal_prefix_in_order() {
        let gateway = memory_gateway().await;
        for key in ["session/b", "session-messages/a", "session/a", "session_x/1", "settings"] {
            gateway.save(key, b"{}".to_vec()).await.unwrap();
        }
        assert_eq!(gateway.list_keys("session/").await.unwrap(), ["session/a", "session/b"]);
        assert_eq!(gateway.list_keys("session_").await.unwrap(), ["session_x/1"]);
        assert_eq!(gateway.list_keys("").await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("keepsake.db").to_string_lossy().into_owned(),
            wal_mode: true,
            quota_bytes: 1024,
        };

        let gateway = SqliteGateway::open(&config).await.unwrap();
        gateway.save("memory/m1", b"{}".to_vec()).await.unwrap();
        gateway.close().await.unwrap();
        drop(gateway);

        let reopened = SqliteGateway::open(&config).await.unwrap();
        assert_eq!(reopened.list_keys("memory/").await.unwrap(), ["memory/m1"]);
    }
}
