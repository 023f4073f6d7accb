// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize → migrate → validate must give back the same entity.

use std::fmt::Debug;

use keepsake_core::model::{CustomizationSettings, Maturity};
use keepsake_core::{EntityKind, KeepsakeError};
use keepsake_schema::{Schema, migrate, validate};
use keepsake_test_utils::fixtures::*;
use serde::Serialize;

fn round_trip<T: Schema + Serialize + PartialEq + Debug>(entity: &T) {
    let raw = serde_json::to_value(entity).unwrap();
    let migrated = migrate(T::KIND, raw).unwrap();
    let validated = validate::<T>(&migrated.value).unwrap();
    assert!(
        validated.warnings.is_empty(),
        "{:?} produced warnings: {:?}",
        T::KIND,
        validated.warnings
    );
    assert_eq!(&validated.value, entity);
}

#[test]
fn conversation_round_trips() {
    round_trip(&minimal_message("m"));
    round_trip(&maximal_message("m"));
    round_trip(&minimal_session("s"));
    round_trip(&maximal_session("s", Some("g")));
    round_trip(&minimal_gem("g"));
    round_trip(&maximal_gem("g"));
}

#[test]
fn companion_round_trips() {
    round_trip(&minimal_profile("p"));
    round_trip(&maximal_profile("p"));
}

#[test]
fn fiction_round_trips() {
    round_trip(&minimal_story("s"));
    round_trip(&maximal_story("s"));
    round_trip(&minimal_passion("pw"));
    round_trip(&maximal_passion("pw"));
}

#[test]
fn record_round_trips() {
    round_trip(&minimal_snippet("c"));
    round_trip(&maximal_snippet("c"));
    round_trip(&minimal_workflow("w"));
    round_trip(&maximal_workflow("w"));
    round_trip(&minimal_memory("m"));
    round_trip(&profile_memory("m", "p"));
    round_trip(&bookmark("b", "s"));
    round_trip(&favorite("f"));
}

#[test]
fn singleton_round_trips() {
    round_trip(&CustomizationSettings::default());
    round_trip(&maximal_settings());
    round_trip(&user_profile());
    round_trip(&ai_profile());
}

#[test]
fn legacy_profile_with_explicit_attribute_loads_as_standard() {
    let migrated = migrate(EntityKind::CompanionProfile, legacy_profile_json("p1")).unwrap();
    assert!(migrated.was_upgraded());
    let profile = validate::<keepsake_core::model::CompanionProfile>(&migrated.value)
        .unwrap()
        .into_inner();
    assert_eq!(profile.maturity, Maturity::Standard);
    let written = serde_json::to_value(&profile).unwrap();
    assert!(written.get("breastSize").is_none());
}

#[test]
fn bot_author_is_unknown_enum_value() {
    let raw = serde_json::json!({"id": "m1", "author": "bot", "content": "beep"});
    let migrated = migrate(EntityKind::ChatMessage, raw).unwrap();
    let err = KeepsakeError::from(
        validate::<keepsake_core::model::ChatMessage>(&migrated.value).unwrap_err(),
    );
    assert!(matches!(err, KeepsakeError::UnknownEnumValue { ref value, .. } if value == "bot"));
}
