// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway key layout.
//!
//! Collections live under `<prefix>/<id>`; singletons under a fixed key.
//! Anything the store could not use may be moved under `quarantine/`.

use keepsake_core::EntityKind;

pub const SESSION: &str = "session/";
pub const SESSION_MESSAGES: &str = "session-messages/";
pub const GEM: &str = "gem/";
pub const PROFILE: &str = "profile/";
pub const STORY: &str = "story/";
pub const PASSION: &str = "passion/";
pub const SNIPPET: &str = "snippet/";
pub const WORKFLOW: &str = "workflow/";
pub const MEMORY: &str = "memory/";
pub const BOOKMARK: &str = "bookmark/";
pub const FAVORITE: &str = "favorite/";

pub const SETTINGS: &str = "settings";
pub const USER_PROFILE: &str = "user-profile";
pub const AI_PROFILE: &str = "ai-profile";
pub const SCHEMA_VERSION: &str = "meta/schema-version";

pub const QUARANTINE: &str = "quarantine/";

/// Every collection prefix with the kind its records hold.
pub const COLLECTIONS: [(&str, EntityKind); 11] = [
    (SESSION, EntityKind::ChatSession),
    (SESSION_MESSAGES, EntityKind::ChatMessages),
    (GEM, EntityKind::Gem),
    (PROFILE, EntityKind::CompanionProfile),
    (STORY, EntityKind::StoryState),
    (PASSION, EntityKind::PassionWeaverStory),
    (SNIPPET, EntityKind::CodeSnippet),
    (WORKFLOW, EntityKind::Workflow),
    (MEMORY, EntityKind::MemoryItem),
    (BOOKMARK, EntityKind::Bookmark),
    (FAVORITE, EntityKind::FavoritePrompt),
];

pub const SINGLETONS: [(&str, EntityKind); 3] = [
    (SETTINGS, EntityKind::CustomizationSettings),
    (USER_PROFILE, EntityKind::UserProfile),
    (AI_PROFILE, EntityKind::AiProfile),
];

/// Key of a record in a collection.
pub fn record(prefix: &str, id: &str) -> String {
    format!("{prefix}{id}")
}

pub fn session(id: &str) -> String {
    record(SESSION, id)
}

pub fn session_messages(id: &str) -> String {
    record(SESSION_MESSAGES, id)
}

/// Where a quarantined record is moved to.
pub fn quarantine(key: &str) -> String {
    format!("{QUARANTINE}{key}")
}

/// The id part of a collection key.
pub fn id_of<'a>(prefix: &str, key: &'a str) -> Option<&'a str> {
    key.strip_prefix(prefix).filter(|id| !id.is_empty())
}

/// The kind stored under `key`, if the key belongs to the layout.
pub fn kind_of(key: &str) -> Option<EntityKind> {
    COLLECTIONS
        .iter()
        .find(|(prefix, _)| id_of(prefix, key).is_some())
        .or_else(|| SINGLETONS.iter().find(|(singleton, _)| *singleton == key))
        .map(|(_, kind)| *kind)
}
