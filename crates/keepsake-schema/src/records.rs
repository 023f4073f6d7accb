// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Readers for snippets, workflows, memories and the small user records.

use keepsake_core::EntityKind;
use keepsake_core::catalog::WorkflowStepKind;
use keepsake_core::model::{
    AiProfile, Bookmark, CodeSnippet, FavoritePrompt, MemoryItem, UserProfile, Workflow,
    WorkflowStep,
};

use crate::Schema;
use crate::reader::{FromRecord, RecordReader};

impl FromRecord for CodeSnippet {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let title = r.required_str("title");
        let code = r.required_nested("code");
        let created_at = r.required_i64("createdAt");
        let card_image_url = r.optional_str("cardImageUrl");
        Some(CodeSnippet::restore(id?, title?, code?, created_at?, card_image_url))
    }
}

impl Schema for CodeSnippet {
    const KIND: EntityKind = EntityKind::CodeSnippet;
}

impl FromRecord for WorkflowStep {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let kind = r.required_catalogue::<WorkflowStepKind>("type");
        let title = r.text("title");
        let prompt_template = r.text("promptTemplate");
        Some(Self {
            id: id?,
            kind: kind?,
            title,
            prompt_template,
        })
    }
}

impl FromRecord for Workflow {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let name = r.required_str("name");
        let description = r.text("description");
        let initial_input_label = r.text("initialInputLabel");
        let steps = r.nested_list("steps");
        let card_image_url = r.optional_str("cardImageUrl");

        let workflow = Workflow {
            id: id?,
            name: name?,
            description,
            initial_input_label,
            steps,
            card_image_url,
        };
        for violation in workflow.invariant_violations() {
            r.violate(violation);
        }
        Some(workflow)
    }
}

impl Schema for Workflow {
    const KIND: EntityKind = EntityKind::Workflow;
}

impl FromRecord for MemoryItem {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let content = r.required_str("content");
        let created_at = r.required_i64("createdAt");
        let profile_id = r.optional_str("profileId");
        Some(MemoryItem::restore(id?, content?, created_at?, profile_id))
    }
}

impl Schema for MemoryItem {
    const KIND: EntityKind = EntityKind::MemoryItem;
}

impl FromRecord for Bookmark {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let content = r.required_str("content");
        let chat_id = r.required_str("chatId");
        let chat_title = r.text("chatTitle");
        let created_at = r.required_i64("createdAt");
        Some(Self {
            id: id?,
            content: content?,
            chat_id: chat_id?,
            chat_title,
            created_at: created_at?,
        })
    }
}

impl Schema for Bookmark {
    const KIND: EntityKind = EntityKind::Bookmark;
}

impl FromRecord for FavoritePrompt {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let text = r.required_str("text");
        Some(Self { id: id?, text: text? })
    }
}

impl Schema for FavoritePrompt {
    const KIND: EntityKind = EntityKind::FavoritePrompt;
}

impl FromRecord for UserProfile {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        Some(Self {
            name: r.text("name"),
            nickname: r.text("nickname"),
            age: r.text("age"),
            bio: r.text("bio"),
            avatar_url: r.text("avatarUrl"),
        })
    }
}

impl Schema for UserProfile {
    const KIND: EntityKind = EntityKind::UserProfile;
}

impl FromRecord for AiProfile {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        Some(Self {
            name: r.text("name"),
            age: r.text("age"),
            avatar_url: r.text("avatarUrl"),
            persona: r.text("persona"),
            personality: r.text("personality"),
            rules: r.text("rules"),
            enabled: r.bool_or("enabled", false),
        })
    }
}

impl Schema for AiProfile {
    const KIND: EntityKind = EntityKind::AiProfile;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate;
    use keepsake_core::Violation;
    use serde_json::json;

    #[test]
    fn workflow_steps_after_first_need_input_marker() {
        let failure = validate::<Workflow>(&json!({
            "id": "w1",
            "name": "Research brief",
            "steps": [
                {"id": "a", "type": "research_topic", "title": "Research", "promptTemplate": "Research [INPUT]"},
                {"id": "b", "type": "summarize_text", "title": "Summarize", "promptTemplate": "Summarize it"},
                {"id": "a", "type": "generate_pdf", "title": "PDF", "promptTemplate": "[INPUT]"}
            ]
        }))
        .unwrap_err();
        let fields: Vec<_> = failure.violations.iter().map(|v| v.field()).collect();
        assert_eq!(fields, ["steps[1].promptTemplate", "steps[2].id"]);
    }

    #[test]
    fn unknown_step_type_is_rejected() {
        let failure = validate::<Workflow>(&json!({
            "id": "w1",
            "name": "n",
            "steps": [{"id": "a", "type": "send_email", "title": "t", "promptTemplate": ""}]
        }))
        .unwrap_err();
        assert_eq!(
            failure.violations,
            [Violation::UnknownEnumValue {
                field: "steps[0].type".into(),
                value: "send_email".into(),
                catalogue: "workflow step type",
            }]
        );
    }

    #[test]
    fn memory_content_is_required() {
        let failure = validate::<MemoryItem>(&json!({"id": "m1", "createdAt": 1})).unwrap_err();
        assert_eq!(failure.violations[0].field(), "content");
    }

    #[test]
    fn snippet_code_fields_default_to_empty() {
        let snippet = validate::<CodeSnippet>(&json!({
            "id": "c1", "title": "Hello", "code": {"html": "<b>hi</b>"}, "createdAt": 5
        }))
        .unwrap()
        .into_inner();
        assert_eq!(snippet.code().css, "");
        assert_eq!(snippet.created_at(), 5);
    }

    #[test]
    fn ai_profile_is_disabled_by_default() {
        let profile = validate::<AiProfile>(&json!({"name": "Nova"})).unwrap().into_inner();
        assert!(!profile.enabled);
        assert_eq!(profile.persona, "");
    }
}
