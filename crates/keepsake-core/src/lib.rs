// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Keepsake, the persisted-state layer of a companion
//! chat application.
//!
//! This crate holds the entity model, the closed catalogues that act as
//! wire contracts, the shared error type and the persistence gateway trait.
//! Validation and migration of raw records live in `keepsake-schema`;
//! storage backends in `keepsake-storage`.

pub mod catalog;
pub mod error;
pub mod model;
pub mod traits;
pub mod types;
pub mod violation;

// Re-export key items at crate root for ergonomic imports.
pub use catalog::{Catalogue, UnknownToken};
pub use error::KeepsakeError;
pub use traits::PersistenceGateway;
pub use types::{
    CURRENT_SCHEMA_VERSION, Entity, EntityKind, OLDEST_SCHEMA_VERSION, SCHEMA_VERSION_FIELD,
    new_id, now_millis,
};
pub use violation::{Validated, ValidationFailure, ValidationWarning, Violation};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    #[test]
    fn keepsake_error_has_all_variants() {
        let _config = KeepsakeError::Config("test".into());
        let _malformed = KeepsakeError::MalformedEntity {
            kind: EntityKind::Gem,
            id: None,
            violations: vec![],
        };
        let _unknown = KeepsakeError::UnknownEnumValue {
            kind: EntityKind::ChatMessage,
            id: None,
            field: "author".into(),
            value: "bot".into(),
            violations: vec![],
        };
        let _migration = KeepsakeError::MigrationFailed {
            kind: EntityKind::Gem,
            from: 9,
            reason: "newer".into(),
        };
        let _page = KeepsakeError::InvalidPageIndex { index: 1, len: 0 };
        let _io = KeepsakeError::persistence(std::io::Error::other("test"));
        let _transition = KeepsakeError::InvalidTransition("test".into());
        let _cancelled = KeepsakeError::Cancelled;
        let _internal = KeepsakeError::Internal("test".into());
    }

    #[test]
    fn entity_kinds_line_up() {
        fn kind_of<E: Entity>() -> EntityKind {
            E::KIND
        }
        assert_eq!(kind_of::<ChatSession>(), EntityKind::ChatSession);
        assert_eq!(kind_of::<Gem>(), EntityKind::Gem);
        assert_eq!(kind_of::<CompanionProfile>(), EntityKind::CompanionProfile);
        assert_eq!(kind_of::<StoryState>(), EntityKind::StoryState);
        assert_eq!(kind_of::<PassionWeaverStory>(), EntityKind::PassionWeaverStory);
        assert_eq!(kind_of::<CodeSnippet>(), EntityKind::CodeSnippet);
        assert_eq!(kind_of::<Workflow>(), EntityKind::Workflow);
        assert_eq!(kind_of::<MemoryItem>(), EntityKind::MemoryItem);
        assert_eq!(kind_of::<Bookmark>(), EntityKind::Bookmark);
        assert_eq!(kind_of::<FavoritePrompt>(), EntityKind::FavoritePrompt);
    }

    #[test]
    fn gateway_trait_is_object_safe() {
        fn _assert_gateway(_: &dyn PersistenceGateway) {}
    }
}
