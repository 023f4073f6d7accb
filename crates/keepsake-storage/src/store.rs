// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The entity store: typed collections over a persistence gateway.
//!
//! Every mutation writes through the gateway before the in-memory copy
//! changes. Composite mutations order their writes so that a crash part
//! way through leaves records the next load can use or repair.

use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use keepsake_core::model::{
    AiProfile, Bookmark, ChatSession, CodeSnippet, CompanionProfile, CustomizationSettings,
    FavoritePrompt, Gem, MemoryItem, PassionWeaverStory, StorageInfo, StorageStats, StoryState,
    UserProfile, Workflow,
};
use keepsake_core::{Entity, EntityKind, KeepsakeError, PersistenceGateway, ValidationWarning, Violation};

use crate::accountant;
use crate::codec;
use crate::keys;
use crate::load::{LoadOptions, Loader};
use crate::report::LoadReport;
use crate::writer::SerializedGateway;

/// Everything the store holds, keyed by entity id.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub sessions: BTreeMap<String, ChatSession>,
    pub gems: BTreeMap<String, Gem>,
    pub profiles: BTreeMap<String, CompanionProfile>,
    pub stories: BTreeMap<String, StoryState>,
    pub passion_stories: BTreeMap<String, PassionWeaverStory>,
    pub snippets: BTreeMap<String, CodeSnippet>,
    pub workflows: BTreeMap<String, Workflow>,
    pub memories: BTreeMap<String, MemoryItem>,
    pub bookmarks: BTreeMap<String, Bookmark>,
    pub favorites: BTreeMap<String, FavoritePrompt>,
    pub settings: CustomizationSettings,
    pub user_profile: Option<UserProfile>,
    pub ai_profile: Option<AiProfile>,
}

pub struct Store<G> {
    gateway: SerializedGateway<G>,
    data: Collections,
}

impl<G: PersistenceGateway> Store<G> {
    /// Load every stored record.
    ///
    /// Damaged records are quarantined and listed in the report; the call
    /// fails only when the gateway itself does.
    pub async fn open(gateway: G, options: LoadOptions) -> Result<(Self, LoadReport), KeepsakeError> {
        let gateway = SerializedGateway::new(gateway);
        let (data, report) = Loader::new(&gateway, options).run().await?;
        info!(
            backend = gateway.name(),
            loaded = report.loaded,
            migrated = report.migrated,
            quarantined = report.quarantined.len(),
            repairs = report.repairs.len(),
            "store loaded"
        );
        Ok((Self { gateway, data }, report))
    }

    pub fn collections(&self) -> &Collections {
        &self.data
    }

    pub fn gateway(&self) -> &SerializedGateway<G> {
        &self.gateway
    }

    pub fn settings(&self) -> &CustomizationSettings {
        &self.data.settings
    }

    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.data.sessions.get(id)
    }

    pub fn gem(&self, id: &str) -> Option<&Gem> {
        self.data.gems.get(id)
    }

    pub fn profile(&self, id: &str) -> Option<&CompanionProfile> {
        self.data.profiles.get(id)
    }

    /// Memories scoped to one companion profile.
    pub fn profile_memories<'a>(&'a self, profile_id: &'a str) -> impl Iterator<Item = &'a MemoryItem> {
        self.data
            .memories
            .values()
            .filter(move |m| m.profile_id() == Some(profile_id))
    }

    /// Storage accounting over the loaded collections.
    pub fn storage_info(
        &self,
        quota: u64,
        cancel: &CancellationToken,
    ) -> Result<(StorageInfo, StorageStats), KeepsakeError> {
        accountant::compute(&self.data, quota, cancel)
    }

    // --- Sessions ---

    /// Write metadata first, then messages: a crash in between leaves a
    /// session that loads with its previous (or an empty) message list.
    pub async fn put_session(&mut self, session: ChatSession) -> Result<(), KeepsakeError> {
        self.gateway
            .save(&keys::session(&session.id), codec::encode(&session.meta())?)
            .await?;
        self.gateway
            .save(
                &keys::session_messages(&session.id),
                codec::encode(&session.messages_record())?,
            )
            .await?;
        debug!(id = %session.id, messages = session.messages.len(), "session saved");
        self.data.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    /// Metadata goes first so a crash leaves an orphaned message list,
    /// which the next load quarantines.
    pub async fn delete_session(&mut self, id: &str) -> Result<(), KeepsakeError> {
        self.gateway.delete(&keys::session(id)).await?;
        self.gateway.delete(&keys::session_messages(id)).await?;
        self.data.sessions.remove(id);
        Ok(())
    }

    // --- Personas ---

    pub async fn put_gem(&mut self, gem: Gem) -> Result<(), KeepsakeError> {
        self.save_entity(keys::GEM, &gem).await?;
        self.data.gems.insert(gem.id.clone(), gem);
        Ok(())
    }

    /// Delete a persona after clearing it from every session that uses it.
    /// Returns the ids of the sessions that were updated.
    pub async fn delete_gem(&mut self, id: &str) -> Result<Vec<String>, KeepsakeError> {
        let referencing: Vec<String> = self
            .data
            .sessions
            .values()
            .filter(|s| s.gem_id.as_deref() == Some(id))
            .map(|s| s.id.clone())
            .collect();

        for session_id in &referencing {
            let Some(session) = self.data.sessions.get(session_id) else {
                continue;
            };
            let mut cleared = session.clone();
            cleared.gem_id = None;
            self.gateway
                .save(&keys::session(session_id), codec::encode(&cleared.meta())?)
                .await?;
            self.data.sessions.insert(session_id.clone(), cleared);
        }

        self.gateway.delete(&keys::record(keys::GEM, id)).await?;
        self.data.gems.remove(id);
        debug!(id, sessions = referencing.len(), "persona deleted");
        Ok(referencing)
    }

    // --- Companions and memories ---

    pub async fn put_profile(&mut self, profile: CompanionProfile) -> Result<(), KeepsakeError> {
        self.save_entity(keys::PROFILE, &profile).await?;
        self.data.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Delete a companion profile and the memories scoped to it. Memories
    /// go first so no memory is ever left pointing at a missing profile.
    pub async fn delete_profile(&mut self, id: &str) -> Result<(), KeepsakeError> {
        let scoped: Vec<String> = self
            .profile_memories(id)
            .map(|m| m.id().to_string())
            .collect();
        for memory_id in &scoped {
            self.gateway.delete(&keys::record(keys::MEMORY, memory_id)).await?;
            self.data.memories.remove(memory_id);
        }
        self.gateway.delete(&keys::record(keys::PROFILE, id)).await?;
        self.data.profiles.remove(id);
        debug!(id, memories = scoped.len(), "companion profile deleted");
        Ok(())
    }

    /// Store a memory. A profile-scoped memory requires its profile to be
    /// stored already.
    pub async fn put_memory(&mut self, memory: MemoryItem) -> Result<(), KeepsakeError> {
        if let Some(profile_id) = memory.profile_id() {
            if !self.data.profiles.contains_key(profile_id) {
                return Err(KeepsakeError::MalformedEntity {
                    kind: EntityKind::MemoryItem,
                    id: Some(memory.id().to_string()),
                    violations: vec![Violation::Invariant {
                        field: "profileId".into(),
                        message: format!("names no stored companion profile `{profile_id}`"),
                    }],
                });
            }
        }
        self.save_entity(keys::MEMORY, &memory).await?;
        self.data.memories.insert(memory.id().to_string(), memory);
        Ok(())
    }

    pub async fn delete_memory(&mut self, id: &str) -> Result<(), KeepsakeError> {
        self.gateway.delete(&keys::record(keys::MEMORY, id)).await?;
        self.data.memories.remove(id);
        Ok(())
    }

    // --- Fiction ---

    pub async fn put_story(&mut self, story: StoryState) -> Result<(), KeepsakeError> {
        self.save_entity(keys::STORY, &story).await?;
        self.data.stories.insert(story.id.clone(), story);
        Ok(())
    }

    pub async fn delete_story(&mut self, id: &str) -> Result<(), KeepsakeError> {
        self.gateway.delete(&keys::record(keys::STORY, id)).await?;
        self.data.stories.remove(id);
        Ok(())
    }

    pub async fn put_passion_story(&mut self, story: PassionWeaverStory) -> Result<(), KeepsakeError> {
        self.save_entity(keys::PASSION, &story).await?;
        self.data.passion_stories.insert(story.id.clone(), story);
        Ok(())
    }

    pub async fn delete_passion_story(&mut self, id: &str) -> Result<(), KeepsakeError> {
        self.gateway.delete(&keys::record(keys::PASSION, id)).await?;
        self.data.passion_stories.remove(id);
        Ok(())
    }

    // --- Snippets and workflows ---

    pub async fn put_snippet(&mut self, snippet: CodeSnippet) -> Result<(), KeepsakeError> {
        self.save_entity(keys::SNIPPET, &snippet).await?;
        self.data.snippets.insert(snippet.id().to_string(), snippet);
        Ok(())
    }

    pub async fn delete_snippet(&mut self, id: &str) -> Result<(), KeepsakeError> {
        self.gateway.delete(&keys::record(keys::SNIPPET, id)).await?;
        self.data.snippets.remove(id);
        Ok(())
    }

    /// Store a workflow. Step ids must be unique.
    pub async fn put_workflow(&mut self, workflow: Workflow) -> Result<(), KeepsakeError> {
        let violations = workflow.invariant_violations();
        if !violations.is_empty() {
            return Err(KeepsakeError::MalformedEntity {
                kind: EntityKind::Workflow,
                id: Some(workflow.id.clone()),
                violations,
            });
        }
        self.save_entity(keys::WORKFLOW, &workflow).await?;
        self.data.workflows.insert(workflow.id.clone(), workflow);
        Ok(())
    }

    pub async fn delete_workflow(&mut self, id: &str) -> Result<(), KeepsakeError> {
        self.gateway.delete(&keys::record(keys::WORKFLOW, id)).await?;
        self.data.workflows.remove(id);
        Ok(())
    }

    // --- Bookmarks and favorites ---

    pub async fn put_bookmark(&mut self, bookmark: Bookmark) -> Result<(), KeepsakeError> {
        self.save_entity(keys::BOOKMARK, &bookmark).await?;
        self.data.bookmarks.insert(bookmark.id.clone(), bookmark);
        Ok(())
    }

    pub async fn delete_bookmark(&mut self, id: &str) -> Result<(), KeepsakeError> {
        self.gateway.delete(&keys::record(keys::BOOKMARK, id)).await?;
        self.data.bookmarks.remove(id);
        Ok(())
    }

    pub async fn put_favorite(&mut self, favorite: FavoritePrompt) -> Result<(), KeepsakeError> {
        self.save_entity(keys::FAVORITE, &favorite).await?;
        self.data.favorites.insert(favorite.id.clone(), favorite);
        Ok(())
    }

    pub async fn delete_favorite(&mut self, id: &str) -> Result<(), KeepsakeError> {
        self.gateway.delete(&keys::record(keys::FAVORITE, id)).await?;
        self.data.favorites.remove(id);
        Ok(())
    }

    // --- Singletons ---

    /// Clamp out-of-range values, save, and return what was clamped.
    pub async fn put_settings(
        &mut self,
        mut settings: CustomizationSettings,
    ) -> Result<Vec<ValidationWarning>, KeepsakeError> {
        let warnings = settings.clamp_in_place();
        self.gateway
            .save(keys::SETTINGS, codec::encode(&settings)?)
            .await?;
        self.data.settings = settings;
        Ok(warnings)
    }

    pub async fn put_user_profile(&mut self, profile: UserProfile) -> Result<(), KeepsakeError> {
        self.gateway
            .save(keys::USER_PROFILE, codec::encode(&profile)?)
            .await?;
        self.data.user_profile = Some(profile);
        Ok(())
    }

    pub async fn put_ai_profile(&mut self, profile: AiProfile) -> Result<(), KeepsakeError> {
        self.gateway
            .save(keys::AI_PROFILE, codec::encode(&profile)?)
            .await?;
        self.data.ai_profile = Some(profile);
        Ok(())
    }

    async fn save_entity<T: Entity>(&self, prefix: &str, entity: &T) -> Result<(), KeepsakeError> {
        self.gateway
            .save(&keys::record(prefix, entity.id()), codec::encode(entity)?)
            .await
    }
}
