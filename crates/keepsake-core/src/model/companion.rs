// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The companion profile aggregate and its maturity gate.

use serde::{Serialize, Serializer};

use crate::catalog::{Personality, RelationshipStatus};
use crate::model::chat::ChatMessage;
use crate::model::media::GeneratedImage;
use crate::types::{Entity, EntityKind, new_id, now_millis};

/// Wire name of the maturity flag.
pub const MATURITY_FLAG_FIELD: &str = "is18PlusMode";

/// Wire names of the attribute fields that only exist on explicit profiles.
pub const EXPLICIT_ATTRIBUTE_FIELDS: [&str; 11] = [
    "bodyType",
    "hairColor",
    "hairStyle",
    "eyeColor",
    "breastSize",
    "breastShape",
    "nippleColor",
    "buttSize",
    "buttShape",
    "pussyType",
    "pussyColor",
];

/// Physical attributes of an 18+ profile. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplicitAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hair_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breast_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breast_shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nipple_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub butt_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub butt_shape: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pussy_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pussy_color: Option<String>,
}

impl ExplicitAttributes {
    /// Mutable slots in the same order as [`EXPLICIT_ATTRIBUTE_FIELDS`].
    pub fn slots_mut(&mut self) -> [&mut Option<String>; 11] {
        [
            &mut self.body_type,
            &mut self.hair_color,
            &mut self.hair_style,
            &mut self.eye_color,
            &mut self.breast_size,
            &mut self.breast_shape,
            &mut self.nipple_color,
            &mut self.butt_size,
            &mut self.butt_shape,
            &mut self.pussy_type,
            &mut self.pussy_color,
        ]
    }
}

/// Maturity gate of a companion profile.
///
/// Explicit attributes can only exist under [`Maturity::Explicit`], so a
/// standard profile can never carry them. On the wire this is the
/// `is18PlusMode` flag plus the attribute fields inline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Maturity {
    #[default]
    Standard,
    Explicit(ExplicitAttributes),
}

impl Maturity {
    pub fn is_explicit(&self) -> bool {
        matches!(self, Maturity::Explicit(_))
    }

    pub fn attributes(&self) -> Option<&ExplicitAttributes> {
        match self {
            Maturity::Standard => None,
            Maturity::Explicit(attrs) => Some(attrs),
        }
    }
}

#[derive(Serialize)]
struct MaturityWire<'a> {
    #[serde(rename = "is18PlusMode")]
    flag: bool,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    attributes: Option<&'a ExplicitAttributes>,
}

impl Serialize for Maturity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MaturityWire {
            flag: self.is_explicit(),
            attributes: self.attributes(),
        }
        .serialize(serializer)
    }
}

/// A long-lived companion ("AI girlfriend") with its own chat history
/// and image gallery. `created_at` is fixed once the profile exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionProfile {
    pub id: String,
    pub name: String,
    /// Avatar URL.
    pub avatar: String,
    pub personality: Personality,
    /// Description used when generating images.
    pub appearance: String,
    pub backstory: String,
    pub relationship_status: RelationshipStatus,
    pub interests: String,
    pub gallery: Vec<GeneratedImage>,
    pub chat_history: Vec<ChatMessage>,
    created_at: i64,
    #[serde(flatten)]
    pub maturity: Maturity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_video_url: Option<String>,
}

impl CompanionProfile {
    pub fn new(name: impl Into<String>) -> Self {
        let mut profile = Self::restore(new_id(), now_millis());
        profile.name = name.into();
        profile
    }

    /// An empty standard profile with a known id and creation time.
    pub fn restore(id: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            avatar: String::new(),
            personality: Personality::Default,
            appearance: String::new(),
            backstory: String::new(),
            relationship_status: RelationshipStatus::JustMet,
            interests: String::new(),
            gallery: Vec::new(),
            chat_history: Vec::new(),
            created_at,
            maturity: Maturity::Standard,
            card_video_url: None,
        }
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }
}

impl Entity for CompanionProfile {
    const KIND: EntityKind = EntityKind::CompanionProfile;

    fn id(&self) -> &str {
        &self.id
    }
}
