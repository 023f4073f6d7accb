// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every Keepsake crate.

use thiserror::Error;

use crate::types::EntityKind;
use crate::violation::{ValidationFailure, Violation};

/// The primary error type used across the schema, migration and storage layers.
#[derive(Debug, Error)]
pub enum KeepsakeError {
    /// Configuration errors (invalid TOML, out-of-range settings).
    #[error("configuration error: {0}")]
    Config(String),

    /// A record is missing required fields, has wrongly typed fields, or
    /// breaks a structural invariant.
    #[error("malformed {kind} record{}: {}", id_suffix(id), summarize(violations))]
    MalformedEntity {
        kind: EntityKind,
        id: Option<String>,
        violations: Vec<Violation>,
    },

    /// A closed-catalogue field carries a token outside its catalogue.
    #[error("unknown value `{value}` for `{field}` in {kind} record{}", id_suffix(id))]
    UnknownEnumValue {
        kind: EntityKind,
        id: Option<String>,
        field: String,
        value: String,
        violations: Vec<Violation>,
    },

    /// No upgrade path exists from the recorded schema version.
    #[error("cannot migrate {kind} record from schema version {from}: {reason}")]
    MigrationFailed {
        kind: EntityKind,
        from: u32,
        reason: String,
    },

    /// A page-position transition would leave the index outside `[0, len)`.
    #[error("page index {index} is out of range for {len} page(s)")]
    InvalidPageIndex { index: usize, len: usize },

    /// The persistence gateway failed to read or write.
    #[error("persistence unavailable: {source}")]
    PersistenceUnavailable {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A state-machine method was called in a state that does not allow it.
    #[error("invalid transition: {0}")]
    InvalidTransition(String),

    /// A long-running read was interrupted by its cancellation token.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl KeepsakeError {
    /// Wrap any error as a gateway failure.
    pub fn persistence<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        KeepsakeError::PersistenceUnavailable {
            source: source.into(),
        }
    }

    /// Returns true for errors that only affect a single record and
    /// should quarantine it rather than abort a load.
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            KeepsakeError::MalformedEntity { .. }
                | KeepsakeError::UnknownEnumValue { .. }
                | KeepsakeError::MigrationFailed { .. }
        )
    }

    /// Every violation carried by a validation error, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            KeepsakeError::MalformedEntity { violations, .. }
            | KeepsakeError::UnknownEnumValue { violations, .. } => violations,
            _ => &[],
        }
    }
}

impl From<ValidationFailure> for KeepsakeError {
    fn from(failure: ValidationFailure) -> Self {
        let ValidationFailure {
            kind,
            id,
            violations,
        } = failure;

        // Only catalogue violations: the record is well formed but speaks a
        // token we do not know.
        if !violations.is_empty() && violations.iter().all(Violation::is_catalogue) {
            if let Some(Violation::UnknownEnumValue { field, value, .. }) = violations.first() {
                let (field, value) = (field.clone(), value.clone());
                return KeepsakeError::UnknownEnumValue {
                    kind,
                    id,
                    field,
                    value,
                    violations,
                };
            }
        }

        KeepsakeError::MalformedEntity {
            kind,
            id,
            violations,
        }
    }
}

fn id_suffix(id: &Option<String>) -> String {
    match id {
        Some(id) => format!(" `{id}`"),
        None => String::new(),
    }
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_only_failure_becomes_unknown_enum_value() {
        let failure = ValidationFailure {
            kind: EntityKind::ChatMessage,
            id: Some("m1".into()),
            violations: vec![Violation::UnknownEnumValue {
                field: "author".into(),
                value: "bot".into(),
                catalogue: "MessageAuthor",
            }],
        };
        let err = KeepsakeError::from(failure);
        match err {
            KeepsakeError::UnknownEnumValue { field, value, .. } => {
                assert_eq!(field, "author");
                assert_eq!(value, "bot");
            }
            other => panic!("expected UnknownEnumValue, got {other:?}"),
        }
    }

    #[test]
    fn missing_field_wins_over_catalogue_violation() {
        let failure = ValidationFailure {
            kind: EntityKind::ChatMessage,
            id: None,
            violations: vec![
                Violation::UnknownEnumValue {
                    field: "author".into(),
                    value: "bot".into(),
                    catalogue: "MessageAuthor",
                },
                Violation::Missing { field: "id".into() },
            ],
        };
        let err = KeepsakeError::from(failure);
        assert!(matches!(err, KeepsakeError::MalformedEntity { .. }));
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn malformed_message_lists_every_violation() {
        let err = KeepsakeError::MalformedEntity {
            kind: EntityKind::Gem,
            id: Some("g1".into()),
            violations: vec![
                Violation::Missing { field: "name".into() },
                Violation::WrongType {
                    field: "avatar".into(),
                    expected: "string",
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("gem"));
        assert!(msg.contains("`g1`"));
        assert!(msg.contains("name"));
        assert!(msg.contains("avatar"));
    }

    #[test]
    fn record_level_classification() {
        assert!(
            KeepsakeError::MigrationFailed {
                kind: EntityKind::Gem,
                from: 9,
                reason: "too new".into()
            }
            .is_record_level()
        );
        assert!(!KeepsakeError::persistence(std::io::Error::other("disk")).is_record_level());
        assert!(!KeepsakeError::InvalidPageIndex { index: 5, len: 4 }.is_record_level());
    }
}
