// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the migration chain.

use keepsake_core::EntityKind;
use keepsake_schema::{MIGRATIONS, migrate};
use proptest::prelude::*;
use serde_json::{Map, Value};

/// Keys the migration steps look at, plus a few they do not.
const KEYS: &[&str] = &[
    "id",
    "name",
    "schemaVersion",
    "is18PlusMode",
    "breastSize",
    "hairColor",
    "instructions",
    "persona",
    "outputStyle",
    "choiceHistory",
    "pageVisuals",
    "alignmentScores",
    "lust",
    "messages",
    "chatHistory",
    "chartSpec",
    "kind",
    "payload",
];

const KINDS: &[EntityKind] = &[
    EntityKind::ChatSession,
    EntityKind::ChatMessages,
    EntityKind::ChatMessage,
    EntityKind::Gem,
    EntityKind::CompanionProfile,
    EntityKind::PassionWeaverStory,
    EntityKind::Workflow,
    EntityKind::CustomizationSettings,
];

fn key() -> impl Strategy<Value = String> {
    prop::sample::select(KEYS).prop_map(str::to_owned)
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-2i64..8).prop_map(Value::from),
        prop::sample::select(vec!["", "bar", "pie", "opaque", "x"]).prop_map(Value::from),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(key(), inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn record() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map(key(), json_value(), 0..8).prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn full_chain_is_idempotent(kind in prop::sample::select(KINDS), raw in record()) {
        if let Ok(once) = migrate(kind, Value::Object(raw)) {
            let twice = migrate(kind, once.value.clone());
            prop_assert!(twice.is_ok(), "second pass failed: {:?}", twice);
            let twice = twice.unwrap();
            prop_assert!(twice.applied.is_empty());
            prop_assert_eq!(twice.value, once.value);
        }
    }

    #[test]
    fn each_step_is_idempotent(kind in prop::sample::select(KINDS), raw in record()) {
        for step in MIGRATIONS {
            let mut once = raw.clone();
            if (step.apply)(kind, &mut once).is_ok() {
                let mut twice = once.clone();
                prop_assert!((step.apply)(kind, &mut twice).is_ok(), "{} failed on its own output", step.name);
                prop_assert_eq!(&twice, &once, "{} is not idempotent", step.name);
            }
        }
    }
}

#[test]
fn chain_covers_every_version_once() {
    let versions: Vec<u32> = MIGRATIONS.iter().map(|m| m.from).collect();
    assert_eq!(versions, [1, 2, 3, 4]);
}
