// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rewriting every outdated record at the current schema version.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use keepsake_core::model::{
    AiProfile, Bookmark, ChatSession, CodeSnippet, CompanionProfile, CustomizationSettings,
    FavoritePrompt, Gem, MemoryItem, MessageLog, PassionWeaverStory, SessionMessages, StoryState,
    UserProfile, Workflow,
};
use keepsake_core::{
    CURRENT_SCHEMA_VERSION, EntityKind, KeepsakeError, PersistenceGateway, SCHEMA_VERSION_FIELD,
    ValidationWarning, now_millis,
};
use keepsake_schema::{Schema, migrate, record_version, validate};

use crate::codec;
use crate::keys;
use crate::report::{MigrationReport, Quarantined, RecordWarning};

/// Upgrade every record stored below the current schema version, then
/// write the `meta/schema-version` marker.
///
/// Records that cannot be upgraded are left untouched and listed as failed.
/// Legacy sessions that embed their messages are split into metadata and
/// a message list; the split never overwrites an existing message list.
pub async fn migrate_all<G: PersistenceGateway + ?Sized>(
    gateway: &G,
) -> Result<MigrationReport, KeepsakeError> {
    let mut report = MigrationReport::default();

    for (prefix, kind) in keys::COLLECTIONS {
        for key in gateway.list_keys(prefix).await? {
            upgrade_key(gateway, &key, kind, &mut report).await?;
        }
    }
    for (key, kind) in keys::SINGLETONS {
        upgrade_key(gateway, key, kind, &mut report).await?;
    }

    let mut marker = Map::new();
    marker.insert(SCHEMA_VERSION_FIELD.into(), CURRENT_SCHEMA_VERSION.into());
    marker.insert("migratedAt".into(), now_millis().into());
    gateway
        .save(keys::SCHEMA_VERSION, Value::Object(marker).to_string().into_bytes())
        .await?;

    info!(
        scanned = report.scanned,
        upgraded = report.upgraded.len(),
        warnings = report.warnings.len(),
        failed = report.failed.len(),
        "migration complete"
    );
    Ok(report)
}

async fn upgrade_key<G: PersistenceGateway + ?Sized>(
    gateway: &G,
    key: &str,
    kind: EntityKind,
    report: &mut MigrationReport,
) -> Result<(), KeepsakeError> {
    let Some(bytes) = gateway.load(key).await? else {
        return Ok(());
    };
    report.scanned += 1;

    let outcome = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(object)) => match record_version(kind, &object) {
            Ok(CURRENT_SCHEMA_VERSION) => return Ok(()),
            Ok(_) => rewrite(kind, Value::Object(object)),
            Err(e) => Err(e),
        },
        Ok(_) => Err(KeepsakeError::MigrationFailed {
            kind,
            from: 0,
            reason: "record is not an object".into(),
        }),
        Err(e) => Err(KeepsakeError::MigrationFailed {
            kind,
            from: 0,
            reason: format!("record is not valid JSON: {e}"),
        }),
    };

    let (rewritten, warnings) = match outcome {
        Ok(pair) => pair,
        Err(e) if e.is_record_level() => {
            warn!(key, error = %e, "record left at its stored version");
            report.failed.push(Quarantined {
                key: key.to_string(),
                reason: e.to_string(),
                moved_to: None,
            });
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    match rewritten {
        Rewrite::Single(bytes) => gateway.save(key, bytes).await?,
        Rewrite::Session { meta, messages } => {
            // The legacy record holds the only copy of its messages until
            // the split-out list is stored.
            if let Some((messages_key, bytes)) = messages {
                if gateway.load(&messages_key).await?.is_none() {
                    gateway.save(&messages_key, bytes).await?;
                }
            }
            gateway.save(key, meta).await?;
        }
    }
    for warning in warnings {
        warn!(key, field = %warning.field, message = %warning.message, "record adjusted during upgrade");
        report.warnings.push(RecordWarning::new(key, warning));
    }
    report.upgraded.push(key.to_string());
    Ok(())
}

enum Rewrite {
    Single(Vec<u8>),
    /// Session metadata plus, for legacy records, the split-out message list.
    Session {
        meta: Vec<u8>,
        messages: Option<(String, Vec<u8>)>,
    },
}

/// The record at the current version, with what validation dropped or
/// adjusted on the way.
fn rewrite(
    kind: EntityKind,
    value: Value,
) -> Result<(Rewrite, Vec<ValidationWarning>), KeepsakeError> {
    let migrated = migrate(kind, value)?.value;
    let (bytes, warnings) = match kind {
        EntityKind::ChatSession => {
            let validated = validate::<ChatSession>(&migrated)?;
            let session = validated.value;
            let messages = match migrated.get("messages") {
                Some(_) => Some((
                    keys::session_messages(&session.id),
                    codec::encode(&session.messages_record())?,
                )),
                None => None,
            };
            let rewrite = Rewrite::Session {
                meta: codec::encode(&session.meta())?,
                messages,
            };
            return Ok((rewrite, validated.warnings));
        }
        EntityKind::ChatMessages => {
            let validated = validate::<MessageLog>(&migrated)?;
            let log = validated.value;
            let bytes = codec::encode(&SessionMessages {
                session_id: &log.session_id,
                messages: &log.messages,
            })?;
            (bytes, validated.warnings)
        }
        EntityKind::Gem => reencode::<Gem>(&migrated)?,
        EntityKind::CompanionProfile => reencode::<CompanionProfile>(&migrated)?,
        EntityKind::StoryState => reencode::<StoryState>(&migrated)?,
        EntityKind::PassionWeaverStory => reencode::<PassionWeaverStory>(&migrated)?,
        EntityKind::CodeSnippet => reencode::<CodeSnippet>(&migrated)?,
        EntityKind::Workflow => reencode::<Workflow>(&migrated)?,
        EntityKind::MemoryItem => reencode::<MemoryItem>(&migrated)?,
        EntityKind::Bookmark => reencode::<Bookmark>(&migrated)?,
        EntityKind::FavoritePrompt => reencode::<FavoritePrompt>(&migrated)?,
        EntityKind::CustomizationSettings => reencode::<CustomizationSettings>(&migrated)?,
        EntityKind::UserProfile => reencode::<UserProfile>(&migrated)?,
        EntityKind::AiProfile => reencode::<AiProfile>(&migrated)?,
        EntityKind::ChatMessage => {
            return Err(KeepsakeError::Internal(
                "chat messages are not stored on their own".into(),
            ));
        }
    };
    Ok((Rewrite::Single(bytes), warnings))
}

fn reencode<T: Schema + Serialize>(
    value: &Value,
) -> Result<(Vec<u8>, Vec<ValidationWarning>), KeepsakeError> {
    let validated = validate::<T>(value)?;
    Ok((codec::encode(&validated.value)?, validated.warnings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use keepsake_test_utils::{MemoryGateway, fixtures};
    use serde_json::json;

    fn bytes(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[tokio::test]
    async fn outdated_records_are_rewritten_and_marker_written() {
        let memory = MemoryGateway::with_records([
            ("profile/p1", bytes(fixtures::legacy_profile_json("p1"))),
            ("gem/g1", codec::encode(&fixtures::maximal_gem("g1")).unwrap()),
        ]);
        let report = migrate_all(&memory).await.unwrap();

        assert_eq!(report.scanned, 2);
        assert_eq!(report.upgraded, ["profile/p1"]);
        assert!(report.failed.is_empty());

        let profile = memory.json("profile/p1").await.unwrap();
        assert_eq!(profile[SCHEMA_VERSION_FIELD], CURRENT_SCHEMA_VERSION);
        assert_eq!(profile["is18PlusMode"], false);
        assert!(profile.get("breastSize").is_none());

        let marker = memory.json(keys::SCHEMA_VERSION).await.unwrap();
        assert_eq!(marker[SCHEMA_VERSION_FIELD], CURRENT_SCHEMA_VERSION);
    }

    #[tokio::test]
    async fn second_run_upgrades_nothing() {
        let memory = MemoryGateway::with_records([(
            "profile/p1",
            bytes(fixtures::legacy_profile_json("p1")),
        )]);
        migrate_all(&memory).await.unwrap();
        let again = migrate_all(&memory).await.unwrap();
        assert!(again.upgraded.is_empty());
        assert_eq!(again.scanned, 1);
    }

    #[tokio::test]
    async fn unupgradable_records_are_left_alone() {
        let broken_gem = json!({"id": "g1", "name": "n", "instructions": ["not", "a", "bundle"]});
        let future_gem = json!({"id": "g2", "name": "n", "schemaVersion": 99});
        let memory = MemoryGateway::with_records([
            ("gem/g1", bytes(broken_gem.clone())),
            ("gem/g2", bytes(future_gem)),
        ]);
        let report = migrate_all(&memory).await.unwrap();

        assert!(report.upgraded.is_empty());
        let failed: Vec<_> = report.failed.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(failed, ["gem/g1", "gem/g2"]);
        assert_eq!(memory.json("gem/g1").await.unwrap(), broken_gem);
    }

    #[tokio::test]
    async fn legacy_session_is_split_without_clobbering_a_newer_log() {
        let legacy = json!({
            "id": "s1",
            "title": "t",
            "messages": [{"id": "m1", "author": "user", "content": "old"}]
        });
        let mut current = fixtures::minimal_session("s1");
        current.messages = vec![fixtures::minimal_message("m9")];
        let memory = MemoryGateway::with_records([
            ("session/s1", bytes(legacy.clone())),
            ("session/s2", bytes(json!({"id": "s2", "title": "t2", "messages": legacy["messages"]}))),
            (
                "session-messages/s1",
                codec::encode(&current.messages_record()).unwrap(),
            ),
        ]);
        migrate_all(&memory).await.unwrap();

        assert!(memory.json("session/s1").await.unwrap().get("messages").is_none());
        let kept = memory.json("session-messages/s1").await.unwrap();
        assert_eq!(kept["messages"][0]["id"], "m9");
        let split = memory.json("session-messages/s2").await.unwrap();
        assert_eq!(split["messages"][0]["content"], "old");
    }

    fn legacy_session(id: &str, content: &str) -> Value {
        json!({
            "id": id,
            "title": "t",
            "messages": [{"id": "m1", "author": "user", "content": content}]
        })
    }

    async fn reloaded_messages(memory: &MemoryGateway, id: &str) -> Vec<String> {
        memory.recover();
        let (store, _) = crate::Store::open(memory.clone(), crate::LoadOptions::default())
            .await
            .unwrap();
        store
            .session(id)
            .unwrap()
            .messages
            .iter()
            .map(|m| m.content.clone())
            .collect()
    }

    #[tokio::test]
    async fn failed_split_leaves_the_legacy_session_intact() {
        let legacy = legacy_session("s1", "precious");
        let memory = MemoryGateway::with_records([("session/s1", bytes(legacy.clone()))]);
        memory.fail_writes_under(keys::SESSION_MESSAGES);

        let err = migrate_all(&memory).await.unwrap_err();
        assert!(matches!(err, KeepsakeError::PersistenceUnavailable { .. }));
        assert_eq!(memory.json("session/s1").await.unwrap(), legacy);
        assert_eq!(reloaded_messages(&memory, "s1").await, ["precious"]);
    }

    #[tokio::test]
    async fn crash_after_the_split_list_keeps_messages_and_resumes() {
        let memory =
            MemoryGateway::with_records([("session/s1", bytes(legacy_session("s1", "precious")))]);
        memory.fail_writes_after(1);

        assert!(migrate_all(&memory).await.is_err());
        assert!(memory.json("session/s1").await.unwrap().get("messages").is_some());
        assert_eq!(reloaded_messages(&memory, "s1").await, ["precious"]);

        let report = migrate_all(&memory).await.unwrap();
        assert_eq!(report.upgraded, ["session/s1"]);
        assert!(memory.json("session/s1").await.unwrap().get("messages").is_none());
        assert_eq!(reloaded_messages(&memory, "s1").await, ["precious"]);
    }

    #[tokio::test]
    async fn dropped_nested_items_are_reported() {
        let mut profile = fixtures::legacy_profile_json("p1");
        profile["chatHistory"] = json!([
            {"id": "a", "author": "user", "content": "keep"},
            {"id": "b", "author": "assistant", "content": "lost"}
        ]);
        let memory = MemoryGateway::with_records([("profile/p1", bytes(profile))]);

        let report = migrate_all(&memory).await.unwrap();
        assert_eq!(report.upgraded, ["profile/p1"]);
        assert_eq!(report.warnings.len(), 1);
        let warning = &report.warnings[0];
        assert_eq!(warning.key, "profile/p1");
        assert_eq!(warning.field, "chatHistory[1]");
        assert!(warning.message.starts_with("quarantined"), "{}", warning.message);

        let stored = memory.json("profile/p1").await.unwrap();
        assert_eq!(stored["chatHistory"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clean_upgrades_report_no_warnings() {
        let memory = MemoryGateway::with_records([(
            "profile/p1",
            bytes(fixtures::legacy_profile_json("p1")),
        )]);
        let report = migrate_all(&memory).await.unwrap();
        assert!(report.warnings.is_empty());
    }

    #[tokio::test]
    async fn gateway_failure_surfaces() {
        let memory = MemoryGateway::with_records([("gem/g1", "{}")]);
        memory.fail_loads(true);
        let err = migrate_all(&memory).await.unwrap_err();
        assert!(matches!(err, KeepsakeError::PersistenceUnavailable { .. }));
    }
}
