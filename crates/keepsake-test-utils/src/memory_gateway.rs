// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory persistence gateway for deterministic tests.
//!
//! `MemoryGateway` keeps records in an ordered map and can be told to fail
//! saves or loads, so tests can exercise `PersistenceUnavailable` paths
//! without a database. Writes can also fail selectively, by key prefix or
//! after a number of successful writes, to stand in for a crash part way
//! through a composite operation.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError};

use async_trait::async_trait;
use tokio::sync::Mutex;

use keepsake_core::{KeepsakeError, PersistenceGateway};

/// A gateway backed by a `BTreeMap`. Clones share the same records.
#[derive(Clone, Default)]
pub struct MemoryGateway {
    records: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    fail_saves: Arc<AtomicBool>,
    fail_loads: Arc<AtomicBool>,
    saves: Arc<AtomicUsize>,
    crash: Arc<std::sync::Mutex<Crash>>,
}

/// Selective write failures.
#[derive(Default)]
struct Crash {
    prefix: Option<String>,
    /// Writes left before every write fails.
    budget: Option<usize>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway pre-loaded with raw records.
    pub fn with_records<K, V>(records: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Vec<u8>>,
    {
        let map = records
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            records: Arc::new(Mutex::new(map)),
            ..Self::default()
        }
    }

    /// Make every subsequent save and delete fail.
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent load and listing fail.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Make saves and deletes of keys starting with `prefix` fail.
    pub fn fail_writes_under(&self, prefix: impl Into<String>) {
        self.crash().prefix = Some(prefix.into());
    }

    /// Let `writes` more saves or deletes succeed, then fail every one
    /// after them.
    pub fn fail_writes_after(&self, writes: usize) {
        self.crash().budget = Some(writes);
    }

    /// Clear every injected failure.
    pub fn recover(&self) {
        self.fail_saves(false);
        self.fail_loads(false);
        *self.crash() = Crash::default();
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Write raw bytes directly, bypassing failure injection.
    pub async fn insert_raw(&self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.records.lock().await.insert(key.into(), bytes.into());
    }

    /// Raw bytes under `key`, bypassing failure injection.
    pub async fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.records.lock().await.get(key).cloned()
    }

    /// The record under `key` parsed as JSON.
    pub async fn json(&self, key: &str) -> Option<serde_json::Value> {
        self.raw(key)
            .await
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
    }

    /// Every stored key in order.
    pub async fn keys(&self) -> Vec<String> {
        self.records.lock().await.keys().cloned().collect()
    }

    fn crash(&self) -> std::sync::MutexGuard<'_, Crash> {
        self.crash.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn injected(op: &str, key: &str) -> KeepsakeError {
        KeepsakeError::persistence(std::io::Error::other(format!(
            "injected {op} failure for `{key}`"
        )))
    }

    fn check(flag: &AtomicBool, op: &str, key: &str) -> Result<(), KeepsakeError> {
        if flag.load(Ordering::SeqCst) {
            return Err(Self::injected(op, key));
        }
        Ok(())
    }

    fn check_write(&self, op: &str, key: &str) -> Result<(), KeepsakeError> {
        Self::check(&self.fail_saves, op, key)?;
        let mut crash = self.crash();
        if crash.prefix.as_deref().is_some_and(|p| key.starts_with(p)) {
            return Err(Self::injected(op, key));
        }
        match crash.budget.as_mut() {
            Some(0) => Err(Self::injected(op, key)),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    fn name(&self) -> &str {
        "memory"
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, KeepsakeError> {
        Self::check(&self.fail_loads, "load", key)?;
        Ok(self.records.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), KeepsakeError> {
        self.check_write("save", key)?;
        self.records.lock().await.insert(key.to_string(), bytes);
        self.saves.fetch_add(1, Ordering::SeqCst);
        tracing::trace!(key, "memory gateway save");
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), KeepsakeError> {
        self.check_write("delete", key)?;
        self.records.lock().await.remove(key);
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KeepsakeError> {
        Self::check(&self.fail_loads, "list", prefix)?;
        Ok(self
            .records
            .lock()
            .await
            .range(prefix.to_string()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect())
    }
}
