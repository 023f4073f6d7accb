// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::Serialize;

use crate::model::media::CodeBlock;
use crate::types::{Entity, EntityKind, new_id, now_millis};

/// A saved piece of generated code. Only the title can change after it is
/// saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    id: String,
    title: String,
    code: CodeBlock,
    created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    card_image_url: Option<String>,
}

impl CodeSnippet {
    pub fn new(title: impl Into<String>, code: CodeBlock) -> Self {
        Self::restore(new_id(), title, code, now_millis(), None)
    }

    pub fn restore(
        id: impl Into<String>,
        title: impl Into<String>,
        code: CodeBlock,
        created_at: i64,
        card_image_url: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            code,
            created_at,
            card_image_url,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn code(&self) -> &CodeBlock {
        &self.code
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn card_image_url(&self) -> Option<&str> {
        self.card_image_url.as_deref()
    }

    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }
}

impl Entity for CodeSnippet {
    const KIND: EntityKind = EntityKind::CodeSnippet;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_keeps_code() {
        let code = CodeBlock {
            html: "<h1>hi</h1>".into(),
            ..Default::default()
        };
        let mut snippet = CodeSnippet::new("draft", code.clone());
        snippet.rename("landing page");
        assert_eq!(snippet.title(), "landing page");
        assert_eq!(snippet.code(), &code);
    }
}
