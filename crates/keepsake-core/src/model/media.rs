// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small value records attached to messages, snippets and galleries.

use serde::Serialize;
use serde_json::Value;

use crate::catalog::ChartKind;

/// An inline image, usually a base64 data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFile {
    pub data: String,
    pub mime_type: String,
}

/// Generated web code, rendered as one page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeBlock {
    pub html: String,
    pub css: String,
    pub javascript: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// A web source cited by a grounded answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WebSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroundingChunk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<WebSource>,
}

/// Search grounding attached to an AI answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grounding_chunks: Option<Vec<GroundingChunk>>,
}

/// An image in a companion's gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedImage {
    pub id: String,
    pub url: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
}

/// One named series of a bar or line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Bar and line charts share a label axis and value series.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesChart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PieChart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub slices: Vec<PieSlice>,
}

/// Schema id given to chart payloads written before charts were typed.
pub const LEGACY_CHART_SCHEMA: &str = "legacy-any";

/// A chart attached to a message by the data visualizer.
///
/// Serialized with an inline `kind` tag. Payloads whose shape is not known
/// are carried verbatim as [`ChartSpec::Opaque`] together with a schema id
/// naming the producer's format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChartSpec {
    Bar(SeriesChart),
    Line(SeriesChart),
    Pie(PieChart),
    Opaque {
        #[serde(rename = "schemaId")]
        schema_id: String,
        payload: Value,
    },
}

impl ChartSpec {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartSpec::Bar(_) => ChartKind::Bar,
            ChartSpec::Line(_) => ChartKind::Line,
            ChartSpec::Pie(_) => ChartKind::Pie,
            ChartSpec::Opaque { .. } => ChartKind::Opaque,
        }
    }

    /// Wrap an untyped legacy payload.
    pub fn legacy(payload: Value) -> Self {
        ChartSpec::Opaque {
            schema_id: LEGACY_CHART_SCHEMA.to_string(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chart_spec_is_tagged_by_kind() {
        let chart = ChartSpec::Pie(PieChart {
            title: None,
            slices: vec![PieSlice {
                label: "a".into(),
                value: 1.5,
            }],
        });
        assert_eq!(
            serde_json::to_value(&chart).unwrap(),
            json!({"kind": "pie", "slices": [{"label": "a", "value": 1.5}]})
        );
    }

    #[test]
    fn legacy_chart_wraps_payload() {
        let chart = ChartSpec::legacy(json!({"anything": [1, 2]}));
        assert_eq!(chart.kind(), ChartKind::Opaque);
        assert_eq!(
            serde_json::to_value(&chart).unwrap(),
            json!({"kind": "opaque", "schemaId": "legacy-any", "payload": {"anything": [1, 2]}})
        );
    }

    #[test]
    fn code_block_omits_absent_language() {
        let block = CodeBlock {
            html: "<p></p>".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&block).unwrap();
        assert!(value.get("language").is_none());
        assert_eq!(value["javascript"], "");
    }
}
