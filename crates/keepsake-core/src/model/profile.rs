// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The user's own profile, the default assistant profile, bookmarks and
//! favorite prompts.

use serde::Serialize;

use crate::types::{Entity, EntityKind, new_id, now_millis};

/// Singleton describing the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub nickname: String,
    pub age: String,
    pub bio: String,
    pub avatar_url: String,
}

/// Singleton describing the default assistant used when no persona is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiProfile {
    pub name: String,
    pub age: String,
    pub avatar_url: String,
    pub persona: String,
    pub personality: String,
    pub rules: String,
    pub enabled: bool,
}

/// A saved excerpt of a chat. `chat_id` may outlive the chat it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub content: String,
    pub chat_id: String,
    pub chat_title: String,
    pub created_at: i64,
}

impl Bookmark {
    pub fn new(
        content: impl Into<String>,
        chat_id: impl Into<String>,
        chat_title: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            content: content.into(),
            chat_id: chat_id.into(),
            chat_title: chat_title.into(),
            created_at: now_millis(),
        }
    }
}

impl Entity for Bookmark {
    const KIND: EntityKind = EntityKind::Bookmark;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FavoritePrompt {
    pub id: String,
    pub text: String,
}

impl FavoritePrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            text: text.into(),
        }
    }
}

impl Entity for FavoritePrompt {
    const KIND: EntityKind = EntityKind::FavoritePrompt;

    fn id(&self) -> &str {
        &self.id
    }
}
