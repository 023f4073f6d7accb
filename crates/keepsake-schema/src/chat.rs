// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Readers for conversation records and the value records they carry.

use keepsake_core::EntityKind;
use keepsake_core::catalog::{ChartKind, MessageAuthor};
use keepsake_core::model::{
    ChartSeries, ChartSpec, ChatMessage, ChatSession, CodeBlock, GeneratedImage, Gem,
    GemInstructions, GroundingChunk, GroundingMetadata, ImageFile, MessageLog, PieChart, PieSlice,
    SeriesChart, WebSource,
};

use crate::Schema;
use crate::reader::{FromRecord, Identified, RecordReader};

// --- Value records ---

impl FromRecord for ImageFile {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let data = r.required_str("data");
        let mime_type = r.required_str("mimeType");
        Some(Self {
            data: data?,
            mime_type: mime_type?,
        })
    }
}

impl FromRecord for CodeBlock {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        Some(Self {
            html: r.text("html"),
            css: r.text("css"),
            javascript: r.text("javascript"),
            language: r.optional_str("language"),
        })
    }
}

impl FromRecord for WebSource {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        Some(Self {
            uri: r.optional_str("uri"),
            title: r.optional_str("title"),
        })
    }
}

impl FromRecord for GroundingChunk {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        Some(Self {
            web: r.optional_nested("web"),
        })
    }
}

impl FromRecord for GroundingMetadata {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let grounding_chunks = r
            .get("groundingChunks")
            .is_some()
            .then(|| r.nested_list("groundingChunks"));
        Some(Self { grounding_chunks })
    }
}

impl FromRecord for GeneratedImage {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let url = r.required_str("url");
        let prompt = r.text("prompt");
        let negative_prompt = r.optional_str("negativePrompt");
        Some(Self {
            id: id?,
            url: url?,
            prompt,
            negative_prompt,
        })
    }
}

impl Identified for GeneratedImage {
    fn record_id(&self) -> &str {
        &self.id
    }
}

// --- Charts ---

impl FromRecord for ChartSeries {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let name = r.required_str("name");
        let values = r.number_list("values");
        Some(Self { name: name?, values })
    }
}

impl FromRecord for SeriesChart {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        Some(Self {
            title: r.optional_str("title"),
            labels: r.string_list("labels"),
            series: r.nested_list("series"),
        })
    }
}

impl FromRecord for PieSlice {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let label = r.required_str("label");
        let value = r.required_f64("value");
        Some(Self {
            label: label?,
            value: value?,
        })
    }
}

impl FromRecord for PieChart {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        Some(Self {
            title: r.optional_str("title"),
            slices: r.nested_list("slices"),
        })
    }
}

/// The `kind` tag sits beside the chart fields.
impl FromRecord for ChartSpec {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let kind = r.required_catalogue::<ChartKind>("kind")?;
        match kind {
            ChartKind::Bar => SeriesChart::read(r).map(ChartSpec::Bar),
            ChartKind::Line => SeriesChart::read(r).map(ChartSpec::Line),
            ChartKind::Pie => PieChart::read(r).map(ChartSpec::Pie),
            ChartKind::Opaque => {
                let schema_id = r.required_str("schemaId");
                let payload = r.get("payload").cloned();
                if payload.is_none() {
                    r.missing("payload");
                }
                Some(ChartSpec::Opaque {
                    schema_id: schema_id?,
                    payload: payload?,
                })
            }
        }
    }
}

// --- Messages and sessions ---

impl FromRecord for ChatMessage {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let author = r.required_catalogue::<MessageAuthor>("author");
        let content = r.text("content");
        let image_file = r.optional_nested("imageFile");
        let grounding_metadata = r.optional_nested("groundingMetadata");
        let code_block = r.optional_nested("codeBlock");
        let chart_spec = r.optional_nested("chartSpec");

        let mut message = ChatMessage::restore(id?, author?, content);
        message.image_file = image_file;
        message.grounding_metadata = grounding_metadata;
        message.code_block = code_block;
        message.chart_spec = chart_spec;
        Some(message)
    }
}

impl Identified for ChatMessage {
    fn record_id(&self) -> &str {
        &self.id
    }
}

impl Schema for ChatMessage {
    const KIND: EntityKind = EntityKind::ChatMessage;
}

/// Session metadata. Legacy records still embed their `messages`; current
/// ones keep them in a separate [`MessageLog`] record.
impl FromRecord for ChatSession {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let title = r.required_str("title");
        let gem_id = r.optional_str("gemId");
        let notes = r.optional_str("notes");
        let priority_context = r.string_list("priorityContext");
        let messages = r.entity_list("messages");
        Some(Self {
            id: id?,
            title: title?,
            messages,
            gem_id,
            notes,
            priority_context,
        })
    }
}

impl Schema for ChatSession {
    const KIND: EntityKind = EntityKind::ChatSession;
}

impl FromRecord for MessageLog {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let session_id = r.required_str("sessionId");
        let messages = r.entity_list("messages");
        Some(Self {
            session_id: session_id?,
            messages,
        })
    }
}

impl Schema for MessageLog {
    const KIND: EntityKind = EntityKind::ChatMessages;
}

// --- Personas ---

impl FromRecord for GemInstructions {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        Some(Self {
            persona: r.text("persona"),
            personality: r.text("personality"),
            rules: r.text("rules"),
            output_style: r.text("outputStyle"),
        })
    }
}

impl FromRecord for Gem {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let name = r.required_str("name");
        let instructions = r.required_nested("instructions");
        let avatar = r.text("avatar");
        let card_image_url = r.optional_str("cardImageUrl");
        Some(Self {
            id: id?,
            name: name?,
            instructions: instructions?,
            avatar,
            card_image_url,
        })
    }
}

impl Schema for Gem {
    const KIND: EntityKind = EntityKind::Gem;
}
