// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Companion profile reader and the maturity gate.

use keepsake_core::EntityKind;
use keepsake_core::catalog::{Personality, RelationshipStatus};
use keepsake_core::model::companion::{EXPLICIT_ATTRIBUTE_FIELDS, MATURITY_FLAG_FIELD};
use keepsake_core::model::{CompanionProfile, ExplicitAttributes, Maturity};

use crate::Schema;
use crate::reader::{FromRecord, RecordReader};

/// Explicit attributes are read only when the flag is set. On a standard
/// profile they are dropped with a warning so they can never surface.
fn read_maturity(r: &mut RecordReader<'_>) -> Maturity {
    if r.bool_or(MATURITY_FLAG_FIELD, false) {
        let mut attributes = ExplicitAttributes::default();
        for (slot, field) in attributes.slots_mut().into_iter().zip(EXPLICIT_ATTRIBUTE_FIELDS) {
            *slot = r.optional_str(field);
        }
        return Maturity::Explicit(attributes);
    }

    let stray: Vec<&str> = EXPLICIT_ATTRIBUTE_FIELDS
        .into_iter()
        .filter(|field| r.get(field).is_some())
        .collect();
    if !stray.is_empty() {
        r.warn(
            MATURITY_FLAG_FIELD,
            format!("standard profile: dropped {}", stray.join(", ")),
        );
    }
    Maturity::Standard
}

impl FromRecord for CompanionProfile {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let name = r.required_str("name");
        let avatar = r.text("avatar");
        let personality = r.required_catalogue::<Personality>("personality");
        let appearance = r.text("appearance");
        let backstory = r.text("backstory");
        let relationship_status = r.required_catalogue::<RelationshipStatus>("relationshipStatus");
        let interests = r.text("interests");
        let gallery = r.entity_list("gallery");
        let chat_history = r.entity_list("chatHistory");
        let created_at = r.required_i64("createdAt");
        let maturity = read_maturity(r);
        let card_video_url = r.optional_str("cardVideoUrl");

        let mut profile = CompanionProfile::restore(id?, created_at?);
        profile.name = name?;
        profile.avatar = avatar;
        profile.personality = personality?;
        profile.appearance = appearance;
        profile.backstory = backstory;
        profile.relationship_status = relationship_status?;
        profile.interests = interests;
        profile.gallery = gallery;
        profile.chat_history = chat_history;
        profile.maturity = maturity;
        profile.card_video_url = card_video_url;
        Some(profile)
    }
}

impl Schema for CompanionProfile {
    const KIND: EntityKind = EntityKind::CompanionProfile;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate;
    use serde_json::{Value, json};

    fn profile(extra: Value) -> Value {
        let mut base = json!({
            "id": "p1",
            "name": "Mika",
            "avatar": "https://example.test/mika.png",
            "personality": "Tsundere",
            "relationshipStatus": "Dating",
            "createdAt": 1_700_000_000_000_i64
        });
        if let (Some(base), Value::Object(extra)) = (base.as_object_mut(), extra) {
            base.extend(extra);
        }
        base
    }

    #[test]
    fn explicit_profile_keeps_attributes() {
        let profile = validate::<CompanionProfile>(&profile(json!({
            "is18PlusMode": true, "hairColor": "silver"
        })))
        .unwrap()
        .into_inner();
        let attrs = profile.maturity.attributes().unwrap();
        assert_eq!(attrs.hair_color.as_deref(), Some("silver"));
        assert_eq!(attrs.body_type, None);
    }

    #[test]
    fn standard_profile_drops_attributes_with_warning() {
        let validated = validate::<CompanionProfile>(&profile(json!({
            "is18PlusMode": false, "breastSize": "large"
        })))
        .unwrap();
        assert_eq!(validated.value.maturity, Maturity::Standard);
        assert_eq!(validated.warnings.len(), 1);
        assert!(validated.warnings[0].message.contains("breastSize"));
    }

    #[test]
    fn unknown_personality_is_rejected() {
        let failure =
            validate::<CompanionProfile>(&profile(json!({"personality": "Grumpy"}))).unwrap_err();
        assert!(failure.violations[0].is_catalogue());
        assert_eq!(failure.violations[0].field(), "personality");
    }

    #[test]
    fn gallery_item_without_url_is_quarantined() {
        let validated = validate::<CompanionProfile>(&profile(json!({
            "gallery": [
                {"id": "i1", "url": "data:image/png;base64,AAAA", "prompt": "beach"},
                {"id": "i2", "prompt": "no url"}
            ]
        })))
        .unwrap();
        assert_eq!(validated.value.gallery.len(), 1);
        assert_eq!(validated.warnings[0].field, "gallery[1]");
    }

    #[test]
    fn created_at_is_required() {
        let mut raw = profile(json!({}));
        raw.as_object_mut().unwrap().remove("createdAt");
        let failure = validate::<CompanionProfile>(&raw).unwrap_err();
        assert_eq!(failure.violations[0].field(), "createdAt");
    }
}
