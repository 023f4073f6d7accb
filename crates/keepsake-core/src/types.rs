// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the entity model and the persistence layer.

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

/// Current persisted schema version. Records without a `schemaVersion`
/// field are treated as version [`OLDEST_SCHEMA_VERSION`].
pub const CURRENT_SCHEMA_VERSION: u32 = 5;

/// The oldest schema version the migration engine knows how to read.
pub const OLDEST_SCHEMA_VERSION: u32 = 1;

/// Name of the version tag written into every persisted record.
pub const SCHEMA_VERSION_FIELD: &str = "schemaVersion";

/// Identifies the shape a raw record is validated against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum EntityKind {
    ChatSession,
    /// The message list of one chat session, persisted under its own key.
    ChatMessages,
    ChatMessage,
    Gem,
    CompanionProfile,
    StoryState,
    PassionWeaverStory,
    CodeSnippet,
    Workflow,
    MemoryItem,
    Bookmark,
    FavoritePrompt,
    CustomizationSettings,
    UserProfile,
    AiProfile,
}

/// An entity stored as one record per id in its own collection.
pub trait Entity: Serialize {
    const KIND: EntityKind;

    fn id(&self) -> &str;
}

/// Generate a fresh entity identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current time as milliseconds since the Unix epoch, the timestamp unit
/// used by every persisted record.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
