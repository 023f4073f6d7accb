// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! What happened while loading or upgrading the stored records.

use serde::Serialize;

use keepsake_core::ValidationWarning;

/// A record the store refused to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quarantined {
    pub key: String,
    pub reason: String,
    /// Set when the record was moved under `quarantine/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moved_to: Option<String>,
}

/// A fix-up applied to an accepted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordWarning {
    pub key: String,
    pub field: String,
    pub message: String,
}

impl RecordWarning {
    pub fn new(key: &str, warning: ValidationWarning) -> Self {
        Self {
            key: key.to_string(),
            field: warning.field,
            message: warning.message,
        }
    }
}

/// A cross-record repair: a missing message list, a dangling reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repair {
    pub key: String,
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Records accepted into a collection or singleton.
    pub loaded: usize,
    /// Accepted records that were stored at an older schema version.
    pub migrated: usize,
    /// Value of the `meta/schema-version` marker, if one was written.
    pub stored_version: Option<u32>,
    pub quarantined: Vec<Quarantined>,
    pub warnings: Vec<RecordWarning>,
    pub repairs: Vec<Repair>,
}

impl LoadReport {
    /// True when every record loaded as stored.
    pub fn is_clean(&self) -> bool {
        self.quarantined.is_empty() && self.warnings.is_empty() && self.repairs.is_empty()
    }

    pub fn repair(&mut self, key: impl Into<String>, action: impl Into<String>) {
        self.repairs.push(Repair {
            key: key.into(),
            action: action.into(),
        });
    }
}

/// Outcome of rewriting every outdated record at the current version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Records read.
    pub scanned: usize,
    /// Records rewritten.
    pub upgraded: Vec<String>,
    /// Values dropped or adjusted while rewriting upgraded records.
    pub warnings: Vec<RecordWarning>,
    /// Records that could not be upgraded and were left untouched.
    pub failed: Vec<Quarantined>,
}
