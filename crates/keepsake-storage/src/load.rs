// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading every stored record into typed collections.
//!
//! Each record is loaded on its own: one that cannot be parsed, migrated or
//! validated is quarantined and the load carries on. Only gateway failures
//! abort.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, warn};

use keepsake_config::model::LoadConfig;
use keepsake_core::model::{ChatMessage, ChatSession, CompanionProfile, MemoryItem, MessageLog};
use keepsake_core::{Entity, KeepsakeError, PersistenceGateway};
use keepsake_schema::Schema;

use crate::codec::{self, Decoded};
use crate::keys;
use crate::report::{LoadReport, Quarantined, RecordWarning};
use crate::store::Collections;

/// What the loader may write back while reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Move quarantined records under `quarantine/`.
    pub move_quarantined: bool,
    /// Save upgraded records back at the current schema version.
    pub rewrite_migrated: bool,
}

impl From<&LoadConfig> for LoadOptions {
    fn from(config: &LoadConfig) -> Self {
        Self {
            move_quarantined: config.move_quarantined,
            rewrite_migrated: config.rewrite_migrated,
        }
    }
}

pub(crate) struct Loader<'a, G> {
    gateway: &'a G,
    options: LoadOptions,
    report: LoadReport,
}

impl<'a, G: PersistenceGateway> Loader<'a, G> {
    pub(crate) fn new(gateway: &'a G, options: LoadOptions) -> Self {
        Self {
            gateway,
            options,
            report: LoadReport::default(),
        }
    }

    pub(crate) async fn run(mut self) -> Result<(Collections, LoadReport), KeepsakeError> {
        let gems = self.collection(keys::GEM).await?;
        let profiles: BTreeMap<String, CompanionProfile> = self.collection(keys::PROFILE).await?;
        let memories = self
            .collection_where(keys::MEMORY, |memory: &MemoryItem| match memory.profile_id() {
                Some(profile_id) if !profiles.contains_key(profile_id) => Err(format!(
                    "memory is scoped to missing companion profile `{profile_id}`"
                )),
                _ => Ok(()),
            })
            .await?;

        let mut data = Collections {
            sessions: self.sessions().await?,
            gems,
            profiles,
            stories: self.collection(keys::STORY).await?,
            passion_stories: self.collection(keys::PASSION).await?,
            snippets: self.collection(keys::SNIPPET).await?,
            workflows: self.collection(keys::WORKFLOW).await?,
            memories,
            bookmarks: self.collection(keys::BOOKMARK).await?,
            favorites: self.collection(keys::FAVORITE).await?,
            settings: self.singleton(keys::SETTINGS).await?.unwrap_or_default(),
            user_profile: self.singleton(keys::USER_PROFILE).await?,
            ai_profile: self.singleton(keys::AI_PROFILE).await?,
        };

        self.clear_dangling_personas(&mut data);
        self.report.stored_version = self.stored_version().await?;
        Ok((data, self.report))
    }

    async fn collection<T: Schema + Entity>(
        &mut self,
        prefix: &str,
    ) -> Result<BTreeMap<String, T>, KeepsakeError> {
        self.collection_where(prefix, |_: &T| Ok(())).await
    }

    /// Load a collection, quarantining records `accept` rejects. Records
    /// sharing an id resolve to the one stored under the later key.
    async fn collection_where<T, F>(
        &mut self,
        prefix: &str,
        accept: F,
    ) -> Result<BTreeMap<String, T>, KeepsakeError>
    where
        T: Schema + Entity,
        F: Fn(&T) -> Result<(), String>,
    {
        let mut records = BTreeMap::new();
        let mut origins = HashMap::new();
        for key in self.gateway.list_keys(prefix).await? {
            let Some(decoded) = self.record::<T>(&key).await? else {
                continue;
            };
            if let Err(reason) = accept(&decoded.value) {
                self.quarantine(&key, reason).await?;
                continue;
            }
            if decoded.upgraded && self.options.rewrite_migrated {
                self.gateway.save(&key, codec::encode(&decoded.value)?).await?;
            }
            let id = decoded.value.id().to_string();
            self.supersede(&mut origins, &id, &key);
            records.insert(id, decoded.value);
        }
        self.report.loaded += records.len();
        debug!(prefix, count = records.len(), "collection loaded");
        Ok(records)
    }

    async fn singleton<T: Schema + serde::Serialize>(
        &mut self,
        key: &str,
    ) -> Result<Option<T>, KeepsakeError> {
        let Some(decoded) = self.record::<T>(key).await? else {
            return Ok(None);
        };
        if decoded.upgraded && self.options.rewrite_migrated {
            self.gateway.save(key, codec::encode(&decoded.value)?).await?;
        }
        self.report.loaded += 1;
        Ok(Some(decoded.value))
    }

    /// Sessions joined with their message lists.
    async fn sessions(&mut self) -> Result<BTreeMap<String, ChatSession>, KeepsakeError> {
        let mut logs: BTreeMap<String, (String, Vec<ChatMessage>, bool)> = BTreeMap::new();
        let mut broken_logs = BTreeSet::new();
        for key in self.gateway.list_keys(keys::SESSION_MESSAGES).await? {
            match self.record::<MessageLog>(&key).await? {
                Some(decoded) => {
                    let MessageLog {
                        session_id,
                        messages,
                    } = decoded.value;
                    if let Some((previous, ..)) =
                        logs.insert(session_id.clone(), (key.clone(), messages, decoded.upgraded))
                    {
                        self.duplicate(&previous, &key, &session_id);
                    }
                }
                None => {
                    if let Some(id) = keys::id_of(keys::SESSION_MESSAGES, &key) {
                        broken_logs.insert(id.to_string());
                    }
                }
            }
        }

        let mut sessions = BTreeMap::new();
        let mut origins = HashMap::new();
        for key in self.gateway.list_keys(keys::SESSION).await? {
            let Some(decoded) = self.record::<ChatSession>(&key).await? else {
                continue;
            };
            let embedded = decoded.raw.get("messages").is_some();
            let mut session = decoded.value;
            let mut rewrite = decoded.upgraded;

            match logs.get(&session.id) {
                Some((_, messages, log_upgraded)) => {
                    session.messages = messages.clone();
                    rewrite |= *log_upgraded;
                }
                None if embedded => rewrite = true,
                None => {
                    let cause = if broken_logs.contains(&session.id) {
                        "message list was quarantined"
                    } else {
                        "message list is missing"
                    };
                    warn!(key = %key, cause, "session repaired with an empty message list");
                    self.report
                        .repair(key.as_str(), format!("{cause}; using an empty message list"));
                }
            }

            // Messages go first: until they are stored on their own, a
            // legacy record is the only copy of them.
            if rewrite && self.options.rewrite_migrated {
                self.gateway
                    .save(
                        &keys::session_messages(&session.id),
                        codec::encode(&session.messages_record())?,
                    )
                    .await?;
                self.gateway
                    .save(&keys::session(&session.id), codec::encode(&session.meta())?)
                    .await?;
            }

            self.supersede(&mut origins, &session.id, &key);
            sessions.insert(session.id.clone(), session);
        }

        for (session_id, (key, ..)) in logs {
            if !sessions.contains_key(&session_id) {
                self.quarantine(&key, format!("orphaned message list: no session `{session_id}`"))
                    .await?;
            }
        }

        self.report.loaded += sessions.len();
        debug!(count = sessions.len(), "sessions loaded");
        Ok(sessions)
    }

    /// Load and decode one key. `None` when the key vanished or the record
    /// was quarantined.
    async fn record<T: Schema>(&mut self, key: &str) -> Result<Option<Decoded<T>>, KeepsakeError> {
        let Some(bytes) = self.gateway.load(key).await? else {
            return Ok(None);
        };
        match codec::decode::<T>(&bytes) {
            Ok(decoded) => {
                if decoded.upgraded {
                    self.report.migrated += 1;
                }
                for warning in &decoded.warnings {
                    warn!(key, field = %warning.field, message = %warning.message, "record adjusted on load");
                    self.report.warnings.push(RecordWarning::new(key, warning.clone()));
                }
                Ok(Some(decoded))
            }
            Err(e) if e.is_record_level() => {
                self.quarantine(key, e.to_string()).await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn quarantine(&mut self, key: &str, reason: String) -> Result<(), KeepsakeError> {
        warn!(key, reason = %reason, "quarantined record");
        let mut moved_to = None;
        if self.options.move_quarantined {
            if let Some(bytes) = self.gateway.load(key).await? {
                let target = keys::quarantine(key);
                // Copy before delete: a crash in between leaves both.
                self.gateway.save(&target, bytes).await?;
                self.gateway.delete(key).await?;
                moved_to = Some(target);
            }
        }
        self.report.quarantined.push(Quarantined {
            key: key.to_string(),
            reason,
            moved_to,
        });
        Ok(())
    }

    fn supersede(&mut self, origins: &mut HashMap<String, String>, id: &str, key: &str) {
        if let Some(previous) = origins.insert(id.to_string(), key.to_string()) {
            self.duplicate(&previous, key, id);
        }
    }

    fn duplicate(&mut self, previous: &str, key: &str, id: &str) {
        warn!(key, superseded = previous, id, "duplicate id, keeping the later record");
        self.report.warnings.push(RecordWarning {
            key: previous.to_string(),
            field: "id".into(),
            message: format!("duplicate id `{id}`, superseded by `{key}`"),
        });
    }

    fn clear_dangling_personas(&mut self, data: &mut Collections) {
        for session in data.sessions.values_mut() {
            let Some(gem_id) = session.gem_id.as_deref() else {
                continue;
            };
            if data.gems.contains_key(gem_id) {
                continue;
            }
            let key = keys::session(&session.id);
            warn!(key = %key, gem_id, "session refers to a deleted persona");
            self.report
                .repair(key, format!("persona `{gem_id}` no longer exists; cleared gemId"));
            session.gem_id = None;
        }
    }

    async fn stored_version(&mut self) -> Result<Option<u32>, KeepsakeError> {
        let Some(bytes) = self.gateway.load(keys::SCHEMA_VERSION).await? else {
            return Ok(None);
        };
        let version = serde_json::from_slice::<serde_json::Value>(&bytes)
            .ok()
            .and_then(|v| v.get(keepsake_core::SCHEMA_VERSION_FIELD)?.as_u64())
            .and_then(|v| u32::try_from(v).ok());
        if version.is_none() {
            warn!(key = keys::SCHEMA_VERSION, "unreadable schema version marker");
        }
        Ok(version)
    }
}
