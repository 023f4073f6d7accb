// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation entities: messages, sessions and personas.

use serde::Serialize;

use crate::catalog::MessageAuthor;
use crate::model::media::{ChartSpec, CodeBlock, GroundingMetadata, ImageFile};
use crate::types::{Entity, EntityKind, new_id};

/// One turn in a conversation.
///
/// The author is fixed at creation. `is_generating_image` is a transient
/// UI flag: it is never serialized and is always `false` after a load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    author: MessageAuthor,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_file: Option<ImageFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_block: Option<CodeBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_spec: Option<ChartSpec>,
    #[serde(skip)]
    pub is_generating_image: bool,
}

impl ChatMessage {
    pub fn new(author: MessageAuthor, content: impl Into<String>) -> Self {
        Self::restore(new_id(), author, content)
    }

    /// Rebuild a message with a known id, e.g. from a persisted record.
    pub fn restore(id: impl Into<String>, author: MessageAuthor, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            author,
            content: content.into(),
            image_file: None,
            grounding_metadata: None,
            code_block: None,
            chart_spec: None,
            is_generating_image: false,
        }
    }

    pub fn author(&self) -> MessageAuthor {
        self.author
    }
}

/// One conversation thread.
///
/// Persisted as two records: the metadata ([`SessionMeta`]) and the
/// ordered message list ([`SessionMessages`]). `gem_id` may name a persona
/// that no longer exists; the store nulls such references on load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gem_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub priority_context: Vec<String>,
}

impl ChatSession {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            messages: Vec::new(),
            gem_id: None,
            notes: None,
            priority_context: Vec::new(),
        }
    }

    /// Append a message, replacing any earlier message with the same id.
    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.retain(|m| m.id != message.id);
        self.messages.push(message);
    }

    pub fn meta(&self) -> SessionMeta<'_> {
        SessionMeta {
            id: &self.id,
            title: &self.title,
            gem_id: self.gem_id.as_deref(),
            notes: self.notes.as_deref(),
            priority_context: &self.priority_context,
        }
    }

    pub fn messages_record(&self) -> SessionMessages<'_> {
        SessionMessages {
            session_id: &self.id,
            messages: &self.messages,
        }
    }
}

impl Entity for ChatSession {
    const KIND: EntityKind = EntityKind::ChatSession;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Serialized view of a session without its messages.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMeta<'a> {
    pub id: &'a str,
    pub title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gem_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
    pub priority_context: &'a [String],
}

/// Serialized view of a session's message list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMessages<'a> {
    pub session_id: &'a str,
    pub messages: &'a [ChatMessage],
}

/// A validated message list record, before it is joined to its session.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageLog {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
}

/// The instruction bundle of a persona. Every field is a string and
/// defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GemInstructions {
    pub persona: String,
    pub personality: String,
    pub rules: String,
    pub output_style: String,
}

/// A reusable AI persona ("Gem").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gem {
    pub id: String,
    pub name: String,
    pub instructions: GemInstructions,
    /// Emoji or single character.
    pub avatar: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_image_url: Option<String>,
}

impl Gem {
    pub fn new(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            instructions: GemInstructions::default(),
            avatar: avatar.into(),
            card_image_url: None,
        }
    }
}

impl Entity for Gem {
    const KIND: EntityKind = EntityKind::Gem;

    fn id(&self) -> &str {
        &self.id
    }
}
