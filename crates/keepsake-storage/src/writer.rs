// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-key write serialization and read caching.
//!
//! Every write takes a [`Ticket`] from a global sequence when it is
//! submitted, then waits for the key's async mutex. A write whose ticket is
//! older than the last one applied to the same key is dropped, so a
//! fire-and-forget save that loses a race can never overwrite newer data.
//! Reads go through the same per-key mutex and populate a cache that every
//! successful save or delete of that key invalidates.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use keepsake_core::{KeepsakeError, PersistenceGateway};

/// Position of a write in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

enum Write {
    Save(Vec<u8>),
    Delete,
}

struct Shared<G> {
    gateway: G,
    sequence: AtomicU64,
    /// Last ticket applied per key. Entries outlive deletes: the ticket
    /// left behind is what drops an older save still in flight, so the map
    /// holds one entry per key written since the wrapper was created.
    slots: DashMap<String, Arc<Mutex<u64>>>,
    cache: DashMap<String, Vec<u8>>,
}

/// Wraps a gateway with per-key ordering and a read cache.
/// Clones share the same sequence, locks and cache.
pub struct SerializedGateway<G> {
    shared: Arc<Shared<G>>,
}

impl<G> Clone for SerializedGateway<G> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<G: PersistenceGateway> SerializedGateway<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            shared: Arc::new(Shared {
                gateway,
                sequence: AtomicU64::new(0),
                slots: DashMap::new(),
                cache: DashMap::new(),
            }),
        }
    }

    /// The wrapped gateway. Writes made through it bypass ordering and
    /// leave the cache stale.
    pub fn inner(&self) -> &G {
        &self.shared.gateway
    }

    /// Reserve the next position in the write order.
    pub fn ticket(&self) -> Ticket {
        Ticket(self.shared.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Save under a previously reserved ticket. Returns `false` when a
    /// newer write to the same key already landed and this one was dropped.
    pub async fn save_at(
        &self,
        ticket: Ticket,
        key: &str,
        bytes: Vec<u8>,
    ) -> Result<bool, KeepsakeError> {
        self.apply(ticket, key, Write::Save(bytes)).await
    }

    pub async fn delete_at(&self, ticket: Ticket, key: &str) -> Result<bool, KeepsakeError> {
        self.apply(ticket, key, Write::Delete).await
    }

    pub fn is_cached(&self, key: &str) -> bool {
        self.shared.cache.contains_key(key)
    }

    fn slot(&self, key: &str) -> Arc<Mutex<u64>> {
        self.shared.slots.entry(key.to_string()).or_default().value().clone()
    }

    async fn apply(&self, ticket: Ticket, key: &str, write: Write) -> Result<bool, KeepsakeError> {
        let slot = self.slot(key);
        let mut applied = slot.lock().await;
        if *applied > ticket.0 {
            debug!(key, ticket = ticket.0, newer = *applied, "dropping stale write");
            return Ok(false);
        }

        match write {
            Write::Save(bytes) => self.shared.gateway.save(key, bytes).await?,
            Write::Delete => self.shared.gateway.delete(key).await?,
        }
        *applied = ticket.0;
        self.shared.cache.remove(key);
        Ok(true)
    }
}

impl<G: PersistenceGateway + 'static> SerializedGateway<G> {
    /// Fire-and-forget save. The ticket is taken before this returns, so
    /// submission order decides which write wins even though the saves run
    /// concurrently.
    pub fn submit(
        &self,
        key: impl Into<String>,
        bytes: Vec<u8>,
    ) -> JoinHandle<Result<bool, KeepsakeError>> {
        let ticket = self.ticket();
        let key = key.into();
        let this = self.clone();
        tokio::spawn(async move { this.save_at(ticket, &key, bytes).await })
    }
}

#[async_trait]
impl<G: PersistenceGateway> PersistenceGateway for SerializedGateway<G> {
    fn name(&self) -> &str {
        self.shared.gateway.name()
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, KeepsakeError> {
        let slot = self.slot(key);
        let _guard = slot.lock().await;
        if let Some(hit) = self.shared.cache.get(key) {
            return Ok(Some(hit.value().clone()));
        }
        let loaded = self.shared.gateway.load(key).await?;
        if let Some(bytes) = &loaded {
            self.shared.cache.insert(key.to_string(), bytes.clone());
        }
        Ok(loaded)
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), KeepsakeError> {
        let ticket = self.ticket();
        self.save_at(ticket, key, bytes).await.map(|_| ())
    }

    async fn delete(&self, key: &str) -> Result<(), KeepsakeError> {
        let ticket = self.ticket();
        self.delete_at(ticket, key).await.map(|_| ())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KeepsakeError> {
        self.shared.gateway.list_keys(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_test_utils::MemoryGateway;

    #[tokio::test]
    async fn stale_ticket_never_overwrites_newer_write() {
        let gateway = SerializedGateway::new(MemoryGateway::new());
        let older = gateway.ticket();
        let newer = gateway.ticket();

        assert!(gateway.save_at(newer, "settings", b"new".to_vec()).await.unwrap());
        assert!(!gateway.save_at(older, "settings", b"old".to_vec()).await.unwrap());
        assert_eq!(gateway.inner().raw("settings").await, Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn stale_delete_is_dropped_too() {
        let gateway = SerializedGateway::new(MemoryGateway::new());
        let delete = gateway.ticket();
        let save = gateway.ticket();
        gateway.save_at(save, "gem/g1", b"{}".to_vec()).await.unwrap();
        assert!(!gateway.delete_at(delete, "gem/g1").await.unwrap());
        assert!(gateway.inner().raw("gem/g1").await.is_some());
    }

    #[tokio::test]
    async fn stale_save_cannot_resurrect_a_deleted_record() {
        let gateway = SerializedGateway::new(MemoryGateway::with_records([("gem/g1", "v1")]));
        let save = gateway.ticket();
        gateway.delete("gem/g1").await.unwrap();

        assert!(!gateway.save_at(save, "gem/g1", b"v0".to_vec()).await.unwrap());
        assert_eq!(gateway.load("gem/g1").await.unwrap(), None);
        assert_eq!(gateway.shared.slots.len(), 1);
    }

    #[tokio::test]
    async fn tickets_on_different_keys_do_not_interact() {
        let gateway = SerializedGateway::new(MemoryGateway::new());
        let older = gateway.ticket();
        let newer = gateway.ticket();
        assert!(gateway.save_at(newer, "a", b"1".to_vec()).await.unwrap());
        assert!(gateway.save_at(older, "b", b"2".to_vec()).await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn racing_submits_keep_the_last_submitted_value() {
        let gateway = SerializedGateway::new(MemoryGateway::new());
        let handles: Vec<_> = (0..50)
            .map(|i| gateway.submit("session/s1", format!("{i}").into_bytes()))
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(gateway.load("session/s1").await.unwrap(), Some(b"49".to_vec()));
    }

    #[tokio::test]
    async fn reads_are_cached_until_the_key_is_written() {
        let memory = MemoryGateway::with_records([("gem/g1", "v1")]);
        let gateway = SerializedGateway::new(memory.clone());

        assert_eq!(gateway.load("gem/g1").await.unwrap(), Some(b"v1".to_vec()));
        assert!(gateway.is_cached("gem/g1"));

        // A write behind the wrapper's back is not seen.
        memory.insert_raw("gem/g1", "sneaky").await;
        assert_eq!(gateway.load("gem/g1").await.unwrap(), Some(b"v1".to_vec()));

        gateway.save("gem/g1", b"v2".to_vec()).await.unwrap();
        assert!(!gateway.is_cached("gem/g1"));
        assert_eq!(gateway.load("gem/g1").await.unwrap(), Some(b"v2".to_vec()));

        gateway.delete("gem/g1").await.unwrap();
        assert_eq!(gateway.load("gem/g1").await.unwrap(), None);
        assert!(!gateway.is_cached("gem/g1"));
    }

    #[tokio::test]
    async fn failed_save_keeps_cache_and_reports_error() {
        let memory = MemoryGateway::with_records([("settings", "v1")]);
        let gateway = SerializedGateway::new(memory.clone());
        gateway.load("settings").await.unwrap();

        memory.fail_saves(true);
        let err = gateway.save("settings", b"v2".to_vec()).await.unwrap_err();
        assert!(matches!(err, KeepsakeError::PersistenceUnavailable { .. }));
        assert_eq!(gateway.load("settings").await.unwrap(), Some(b"v1".to_vec()));
    }
}
