// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Byte-oriented key/value persistence.

use async_trait::async_trait;

use crate::error::KeepsakeError;

/// A key/value surface that stores opaque bytes.
///
/// No transaction spans more than one key: callers must order composite
/// writes so that a crash between two of them leaves valid data behind.
/// Every failure is reported as [`KeepsakeError::PersistenceUnavailable`].
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Short backend name for logs (`sqlite`, `memory`).
    fn name(&self) -> &str;

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, KeepsakeError>;

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), KeepsakeError>;

    /// Remove a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), KeepsakeError>;

    /// Every key starting with `prefix`, in ascending byte order.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KeepsakeError>;
}

#[async_trait]
impl<G: PersistenceGateway + ?Sized> PersistenceGateway for std::sync::Arc<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, KeepsakeError> {
        (**self).load(key).await
    }

    async fn save(&self, key: &str, bytes: Vec<u8>) -> Result<(), KeepsakeError> {
        (**self).save(key, bytes).await
    }

    async fn delete(&self, key: &str) -> Result<(), KeepsakeError> {
        (**self).delete(key).await
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, KeepsakeError> {
        (**self).list_keys(prefix).await
    }
}
