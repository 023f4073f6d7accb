// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed entity model. Every entity serializes to its camelCase wire shape;
//! reading raw records back goes through the schema validator.

pub mod chat;
pub mod companion;
pub mod fiction;
pub mod media;
pub mod memory;
pub mod passion;
pub mod profile;
pub mod settings;
pub mod snippet;
pub mod stats;
pub mod story;
pub mod workflow;

pub use chat::{ChatMessage, ChatSession, Gem, GemInstructions, MessageLog, SessionMessages, SessionMeta};
pub use companion::{CompanionProfile, ExplicitAttributes, Maturity};
pub use fiction::PageHistory;
pub use media::{
    ChartSeries, ChartSpec, CodeBlock, GeneratedImage, GroundingChunk, GroundingMetadata,
    ImageFile, PieChart, PieSlice, SeriesChart, WebSource,
};
pub use memory::MemoryItem;
pub use passion::{
    AlignmentScores, Intensity, PageVisual, PassionWeaverChoice, PassionWeaverParts,
    PassionWeaverSetup, PassionWeaverStory,
};
pub use profile::{AiProfile, Bookmark, FavoritePrompt, UserProfile};
pub use settings::{CustomizationSettings, LiveCharacterState, NumericRange};
pub use snippet::CodeSnippet;
pub use stats::{StorageBreakdown, StorageInfo, StorageStats};
pub use story::{StoryCharacter, StorySetup, StoryState};
pub use workflow::{Workflow, WorkflowExecutionResult, WorkflowExecutionState, WorkflowStep};
