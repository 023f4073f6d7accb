// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema validation and migration of persisted Keepsake records.
//!
//! Raw records arrive as `serde_json::Value`. [`migrate`] brings a record
//! up to [`CURRENT_SCHEMA_VERSION`](keepsake_core::CURRENT_SCHEMA_VERSION),
//! then [`validate`] turns it into a typed entity or a
//! [`ValidationFailure`] listing every violated field.
//!
//! Unknown fields are ignored, missing optional fields take their
//! defaults, out-of-range numbers are clamped with a warning, and
//! closed-catalogue fields are never coerced.

mod chat;
mod companion;
mod fiction;
mod records;
mod settings;

pub mod migrate;
pub mod reader;

use keepsake_core::{EntityKind, Validated, ValidationFailure, Violation};
use serde_json::Value;

pub use migrate::{MIGRATIONS, Migrated, Migration, migrate, record_version};
pub use reader::{Findings, FromRecord, Identified, RecordReader};

/// A record type that is persisted on its own and validated as a whole.
pub trait Schema: FromRecord {
    const KIND: EntityKind;
}

/// Validate a raw record as `T`.
///
/// The record is accepted only when no violation was found anywhere in it;
/// fix-ups applied on the way are returned as warnings.
pub fn validate<T: Schema>(value: &Value) -> Result<Validated<T>, ValidationFailure> {
    let Value::Object(object) = value else {
        return Err(ValidationFailure {
            kind: T::KIND,
            id: None,
            violations: vec![Violation::WrongType {
                field: "$".into(),
                expected: "an object",
            }],
        });
    };

    let mut findings = Findings::default();
    let read = T::read(&mut RecordReader::new(object, &mut findings));
    match read {
        Some(value) if findings.is_clean() => Ok(Validated {
            value,
            warnings: findings.warnings,
        }),
        _ => {
            let mut violations = findings.violations;
            if violations.is_empty() {
                violations.push(Violation::Invariant {
                    field: "$".into(),
                    message: "could not be read".into(),
                });
            }
            Err(ValidationFailure {
                kind: T::KIND,
                id: record_id(object),
                violations,
            })
        }
    }
}

/// The id a failure is reported under: `id`, or `sessionId` for message lists.
fn record_id(object: &serde_json::Map<String, Value>) -> Option<String> {
    ["id", "sessionId"]
        .iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}
