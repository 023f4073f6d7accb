// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema migration engine.
//!
//! A record carries the version it was written at in `schemaVersion`
//! (absent means the oldest version). [`migrate`] runs every step from that
//! version up to [`CURRENT_SCHEMA_VERSION`] and stamps the result. Each step
//! is a pure function of the raw record and is idempotent on its own, so
//! running the chain over an already current record changes nothing.

use keepsake_core::catalog::{Alignment, ChartKind};
use keepsake_core::model::companion::{EXPLICIT_ATTRIBUTE_FIELDS, MATURITY_FLAG_FIELD};
use keepsake_core::model::media::LEGACY_CHART_SCHEMA;
use keepsake_core::{
    CURRENT_SCHEMA_VERSION, Catalogue, EntityKind, KeepsakeError, OLDEST_SCHEMA_VERSION,
    SCHEMA_VERSION_FIELD,
};
use serde_json::{Map, Value, json};
use tracing::debug;

pub type MigrationStep = fn(EntityKind, &mut Map<String, Value>) -> Result<(), String>;

/// One upgrade from version `from` to `from + 1`.
#[derive(Clone, Copy)]
pub struct Migration {
    pub from: u32,
    pub name: &'static str,
    pub apply: MigrationStep,
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("from", &self.from)
            .field("name", &self.name)
            .finish()
    }
}

/// The full chain, ordered by source version.
pub const MIGRATIONS: [Migration; 4] = [
    Migration {
        from: 1,
        name: "companion_maturity_flag",
        apply: companion_maturity_flag,
    },
    Migration {
        from: 2,
        name: "persona_instruction_defaults",
        apply: persona_instruction_defaults,
    },
    Migration {
        from: 3,
        name: "passion_weaver_backfill",
        apply: passion_weaver_backfill,
    },
    Migration {
        from: 4,
        name: "tagged_chart_spec",
        apply: tagged_chart_spec,
    },
];

/// A record brought up to the current version.
#[derive(Debug, Clone, PartialEq)]
pub struct Migrated {
    pub value: Value,
    /// Version the record was stored at.
    pub from: u32,
    /// Names of the steps that ran.
    pub applied: Vec<&'static str>,
}

impl Migrated {
    pub fn was_upgraded(&self) -> bool {
        self.from < CURRENT_SCHEMA_VERSION
    }
}

/// The version a raw record was written at.
pub fn record_version(kind: EntityKind, object: &Map<String, Value>) -> Result<u32, KeepsakeError> {
    let Some(raw) = object.get(SCHEMA_VERSION_FIELD).filter(|v| !v.is_null()) else {
        return Ok(OLDEST_SCHEMA_VERSION);
    };
    raw.as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| *v >= OLDEST_SCHEMA_VERSION)
        .ok_or_else(|| KeepsakeError::MigrationFailed {
            kind,
            from: 0,
            reason: format!("`{SCHEMA_VERSION_FIELD}` {raw} is not a schema version"),
        })
}

/// Upgrade a raw record of `kind` to [`CURRENT_SCHEMA_VERSION`].
pub fn migrate(kind: EntityKind, value: Value) -> Result<Migrated, KeepsakeError> {
    let Value::Object(mut object) = value else {
        return Err(KeepsakeError::MigrationFailed {
            kind,
            from: OLDEST_SCHEMA_VERSION,
            reason: "record is not a JSON object".into(),
        });
    };

    let from = record_version(kind, &object)?;
    if from > CURRENT_SCHEMA_VERSION {
        return Err(KeepsakeError::MigrationFailed {
            kind,
            from,
            reason: format!("newer than the supported version {CURRENT_SCHEMA_VERSION}"),
        });
    }

    let mut applied = Vec::new();
    for step in MIGRATIONS.iter().filter(|m| m.from >= from) {
        (step.apply)(kind, &mut object).map_err(|reason| KeepsakeError::MigrationFailed {
            kind,
            from,
            reason: format!("{}: {reason}", step.name),
        })?;
        debug!(kind = %kind, step = step.name, "applied migration step");
        applied.push(step.name);
    }

    object.insert(SCHEMA_VERSION_FIELD.into(), Value::from(CURRENT_SCHEMA_VERSION));
    Ok(Migrated {
        value: Value::Object(object),
        from,
        applied,
    })
}

// --- Steps ---

/// v1 → v2: profiles written before the maturity gate are standard
/// profiles and lose any explicit attribute they carried.
fn companion_maturity_flag(kind: EntityKind, record: &mut Map<String, Value>) -> Result<(), String> {
    if kind != EntityKind::CompanionProfile {
        return Ok(());
    }
    let flagged = record.get(MATURITY_FLAG_FIELD).is_some_and(|v| !v.is_null());
    if !flagged {
        record.insert(MATURITY_FLAG_FIELD.into(), Value::Bool(false));
        for field in EXPLICIT_ATTRIBUTE_FIELDS {
            record.remove(field);
        }
    }
    Ok(())
}

const INSTRUCTION_FIELDS: [&str; 4] = ["persona", "personality", "rules", "outputStyle"];

/// v2 → v3: persona instructions become an object of four strings.
fn persona_instruction_defaults(
    kind: EntityKind,
    record: &mut Map<String, Value>,
) -> Result<(), String> {
    if kind != EntityKind::Gem {
        return Ok(());
    }
    let mut instructions = match record.remove("instructions") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::String(persona)) => {
            let mut map = Map::new();
            map.insert("persona".into(), Value::String(persona));
            map
        }
        Some(Value::Object(map)) => map,
        Some(other) => return Err(format!("`instructions` cannot be read from {}", shape(&other))),
    };
    for field in INSTRUCTION_FIELDS {
        match instructions.get(field) {
            None | Some(Value::Null) => {
                instructions.insert(field.into(), Value::String(String::new()));
            }
            Some(Value::String(_)) => {}
            Some(other) => {
                return Err(format!("`instructions.{field}` is {}", shape(other)));
            }
        }
    }
    record.insert("instructions".into(), Value::Object(instructions));
    Ok(())
}

/// v3 → v4: passion stories gain the fields added with choice tracking.
fn passion_weaver_backfill(kind: EntityKind, record: &mut Map<String, Value>) -> Result<(), String> {
    if kind != EntityKind::PassionWeaverStory {
        return Ok(());
    }
    backfill(record, "choiceHistory", || Value::Array(Vec::new()));
    backfill(record, "pageVisuals", || Value::Object(Map::new()));
    backfill(record, "alignmentScores", || Value::Object(Map::new()));

    let Some(Value::Object(scores)) = record.get_mut("alignmentScores") else {
        return Err("`alignmentScores` is not an object".into());
    };
    for alignment in Alignment::all() {
        backfill(scores, alignment.token(), || Value::from(0));
    }
    Ok(())
}

fn backfill(record: &mut Map<String, Value>, key: &str, default: impl FnOnce() -> Value) {
    let entry = record.entry(key).or_insert(Value::Null);
    if entry.is_null() {
        *entry = default();
    }
}

/// v4 → v5: untyped chart payloads are wrapped as opaque charts.
fn tagged_chart_spec(kind: EntityKind, record: &mut Map<String, Value>) -> Result<(), String> {
    let list_key = match kind {
        EntityKind::ChatMessage => {
            tag_chart(record);
            return Ok(());
        }
        EntityKind::ChatSession | EntityKind::ChatMessages => "messages",
        EntityKind::CompanionProfile => "chatHistory",
        _ => return Ok(()),
    };
    if let Some(Value::Array(messages)) = record.get_mut(list_key) {
        for message in messages.iter_mut().filter_map(Value::as_object_mut) {
            tag_chart(message);
        }
    }
    Ok(())
}

fn tag_chart(message: &mut Map<String, Value>) {
    let Some(chart) = message.get_mut("chartSpec") else {
        return;
    };
    if chart.is_null() || has_known_kind(chart) {
        return;
    }
    let payload = chart.take();
    *chart = json!({
        "kind": ChartKind::Opaque.token(),
        "schemaId": LEGACY_CHART_SCHEMA,
        "payload": payload,
    });
}

fn has_known_kind(chart: &Value) -> bool {
    chart
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|kind| ChartKind::parse_token(kind).is_ok())
}

fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
