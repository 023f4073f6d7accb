// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured validation outcomes: violations that reject a record and
//! warnings that only annotate it.

use std::fmt;

use crate::types::EntityKind;

/// A single reason a record cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A required field is absent or null.
    Missing { field: String },
    /// A field is present with the wrong JSON type.
    WrongType {
        field: String,
        expected: &'static str,
    },
    /// A closed-catalogue field holds a token outside the catalogue.
    UnknownEnumValue {
        field: String,
        value: String,
        catalogue: &'static str,
    },
    /// A structural invariant does not hold (duplicate ids, out-of-range index).
    Invariant { field: String, message: String },
}

impl Violation {
    /// Path of the offending field, e.g. `setup.tone` or `steps[1].type`.
    pub fn field(&self) -> &str {
        match self {
            Violation::Missing { field }
            | Violation::WrongType { field, .. }
            | Violation::UnknownEnumValue { field, .. }
            | Violation::Invariant { field, .. } => field,
        }
    }

    pub fn is_catalogue(&self) -> bool {
        matches!(self, Violation::UnknownEnumValue { .. })
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Missing { field } => write!(f, "`{field}` is required"),
            Violation::WrongType { field, expected } => {
                write!(f, "`{field}` must be {expected}")
            }
            Violation::UnknownEnumValue {
                field,
                value,
                catalogue,
            } => write!(f, "`{field}` value `{value}` is not a {catalogue}"),
            Violation::Invariant { field, message } => write!(f, "`{field}` {message}"),
        }
    }
}

/// Every violation found in one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub kind: EntityKind,
    pub id: Option<String>,
    pub violations: Vec<Violation>,
}

/// A recoverable problem that was fixed up while accepting a record
/// (clamped numbers, dropped duplicates, quarantined nested items).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.field, self.message)
    }
}

/// A record accepted by the validator, with any fix-ups applied on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    pub value: T,
    pub warnings: Vec<ValidationWarning>,
}

impl<T> Validated<T> {
    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Validated<U> {
        Validated {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
