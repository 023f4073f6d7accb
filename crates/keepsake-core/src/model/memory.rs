// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::Serialize;

use crate::types::{Entity, EntityKind, new_id, now_millis};

/// A fact remembered about the user, optionally scoped to one companion.
///
/// Memories are never edited in place: a correction is a new item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryItem {
    id: String,
    content: String,
    created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_id: Option<String>,
}

impl MemoryItem {
    pub fn new(content: impl Into<String>) -> Self {
        Self::restore(new_id(), content, now_millis(), None)
    }

    pub fn for_profile(content: impl Into<String>, profile_id: impl Into<String>) -> Self {
        Self::restore(new_id(), content, now_millis(), Some(profile_id.into()))
    }

    pub fn restore(
        id: impl Into<String>,
        content: impl Into<String>,
        created_at: i64,
        profile_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            created_at,
            profile_id,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn profile_id(&self) -> Option<&str> {
        self.profile_id.as_deref()
    }
}

impl Entity for MemoryItem {
    const KIND: EntityKind = EntityKind::MemoryItem;

    fn id(&self) -> &str {
        &self.id
    }
}
