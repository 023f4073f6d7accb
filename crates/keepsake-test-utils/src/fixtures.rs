// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimal and maximal instances of every entity kind.
//!
//! Minimal fixtures set only what a record needs to be accepted; maximal
//! ones fill every optional field, so round-trip tests cover both ends.

use std::collections::BTreeMap;

use serde_json::json;

use keepsake_core::catalog::{
    Alignment, AnimationIntensity, BackgroundType, ButtonAlign, CharacterGender, ContentModel,
    MessageAuthor, PassionTone, Personality, RelationshipStatus, StoryMode, StoryPov,
    StorySceneType, StoryTone, Theme, WorkflowStepKind,
};
use keepsake_core::model::{
    AiProfile, AlignmentScores, Bookmark, ChartSeries, ChartSpec, ChatMessage, ChatSession, CodeBlock,
    CodeSnippet, CompanionProfile, CustomizationSettings, ExplicitAttributes, FavoritePrompt,
    GeneratedImage, Gem, GemInstructions, GroundingChunk, GroundingMetadata, ImageFile,
    Intensity, LiveCharacterState, Maturity, MemoryItem, PageHistory, PageVisual,
    PassionWeaverChoice, PassionWeaverParts, PassionWeaverSetup, PassionWeaverStory, PieChart,
    PieSlice, SeriesChart, StoryCharacter, StorySetup, StoryState, UserProfile, WebSource,
    Workflow, WorkflowStep,
};

/// Fixed timestamp so fixtures compare equal across runs.
pub const CREATED_AT: i64 = 1_718_000_000_000;

/// A small PNG-ish data URL used wherever an image payload is needed.
pub const IMAGE_DATA: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

// --- Conversation ---

pub fn minimal_message(id: &str) -> ChatMessage {
    ChatMessage::restore(id, MessageAuthor::User, "")
}

pub fn maximal_message(id: &str) -> ChatMessage {
    let mut message = ChatMessage::restore(id, MessageAuthor::Ai, "Here is the chart you asked for.");
    message.image_file = Some(ImageFile {
        data: IMAGE_DATA.into(),
        mime_type: "image/png".into(),
    });
    message.grounding_metadata = Some(GroundingMetadata {
        grounding_chunks: Some(vec![GroundingChunk {
            web: Some(WebSource {
                uri: Some("https://example.test/source".into()),
                title: Some("Source".into()),
            }),
        }]),
    });
    message.code_block = Some(CodeBlock {
        html: "<canvas id=\"c\"></canvas>".into(),
        css: "canvas { width: 100%; }".into(),
        javascript: "draw();".into(),
        language: Some("javascript".into()),
    });
    message.chart_spec = Some(ChartSpec::Line(SeriesChart {
        title: Some("Mood".into()),
        labels: vec!["mon".into(), "tue".into()],
        series: vec![ChartSeries {
            name: "happy".into(),
            values: vec![0.5, 0.75],
        }],
    }));
    message
}

pub fn minimal_session(id: &str) -> ChatSession {
    let mut session = ChatSession::new("New chat");
    session.id = id.into();
    session
}

pub fn maximal_session(id: &str, gem_id: Option<&str>) -> ChatSession {
    let mut session = minimal_session(id);
    session.title = "Planning the trip".into();
    session.gem_id = gem_id.map(str::to_owned);
    session.notes = Some("User prefers trains.".into());
    session.priority_context = vec!["budget is tight".into()];
    session.push_message(minimal_message("m1"));
    session.push_message(maximal_message("m2"));
    let mut system = ChatMessage::restore("m3", MessageAuthor::System, "context trimmed");
    system.chart_spec = Some(ChartSpec::Pie(PieChart {
        title: None,
        slices: vec![PieSlice {
            label: "rail".into(),
            value: 3.0,
        }],
    }));
    session.push_message(system);
    session
}

pub fn minimal_gem(id: &str) -> Gem {
    let mut gem = Gem::new("Helper", "");
    gem.id = id.into();
    gem
}

pub fn maximal_gem(id: &str) -> Gem {
    let mut gem = minimal_gem(id);
    gem.name = "Travel Planner".into();
    gem.avatar = "T".into();
    gem.instructions = GemInstructions {
        persona: "A seasoned travel agent.".into(),
        personality: "Upbeat".into(),
        rules: "Never book without asking.".into(),
        output_style: "Bulleted itineraries".into(),
    };
    gem.card_image_url = Some("https://example.test/gem.png".into());
    gem
}

// --- Companion profiles ---

pub fn minimal_profile(id: &str) -> CompanionProfile {
    let mut profile = CompanionProfile::restore(id, CREATED_AT);
    profile.name = "Mika".into();
    profile
}

pub fn maximal_profile(id: &str) -> CompanionProfile {
    let mut profile = minimal_profile(id);
    profile.avatar = "https://example.test/mika.png".into();
    profile.personality = Personality::Tsundere;
    profile.appearance = "silver hair, green eyes".into();
    profile.backstory = "Met at a bookshop.".into();
    profile.relationship_status = RelationshipStatus::Dating;
    profile.interests = "poetry, astronomy".into();
    profile.gallery = vec![GeneratedImage {
        id: "img1".into(),
        url: IMAGE_DATA.into(),
        prompt: "portrait at dusk".into(),
        negative_prompt: Some("blurry".into()),
    }];
    profile.chat_history = vec![minimal_message("h1"), maximal_message("h2")];
    let mut attributes = ExplicitAttributes::default();
    for (slot, value) in attributes.slots_mut().into_iter().zip(1..) {
        *slot = Some(format!("attribute {value}"));
    }
    profile.maturity = Maturity::Explicit(attributes);
    profile.card_video_url = Some("https://example.test/mika.mp4".into());
    profile
}

// --- Fiction ---

pub fn minimal_story(id: &str) -> StoryState {
    StoryState::from_parts(
        id,
        StorySetup::new(StoryMode::Interactive, ""),
        PageHistory::new(),
        Vec::new(),
    )
}

pub fn maximal_story(id: &str) -> StoryState {
    let setup = StorySetup {
        mode: StoryMode::Linear,
        main_prompt: "A lighthouse keeper finds a map.".into(),
        setting: "A storm-battered coast".into(),
        tone: StoryTone::Mysterious,
        pov: StoryPov::FirstPerson,
        plot_injection: "The map is blank at dawn.".into(),
        scene_type: StorySceneType::Dialogue,
        characters: vec![StoryCharacter {
            id: "c1".into(),
            name: "Ada".into(),
            description: "The keeper".into(),
        }],
    };
    let history = PageHistory::from_parts(vec!["one".into(), "two".into(), "three".into()], 1)
        .expect("fixture history is valid");
    StoryState::from_parts(id, setup, history, vec!["Follow the lights".into()])
}

pub fn passion_setup() -> PassionWeaverSetup {
    PassionWeaverSetup {
        main_prompt: "A masquerade ball".into(),
        user_character: "Elena".into(),
        partner_character: "Marco".into(),
        user_gender: CharacterGender::Woman,
        partner_gender: CharacterGender::Man,
        tone: PassionTone::Romantic,
        pov: StoryPov::ThirdPersonLimited,
        kinks: Vec::new(),
        intensity: Intensity::default(),
        is_extreme_mode: false,
    }
}

pub fn minimal_passion(id: &str) -> PassionWeaverStory {
    let mut story = PassionWeaverStory::new("Midnight", passion_setup());
    story.id = id.into();
    story
}

pub fn maximal_passion(id: &str) -> PassionWeaverStory {
    let mut setup = passion_setup();
    setup.kinks = vec!["masks".into()];
    setup.intensity = Intensity::new(5).expect("5 is a valid intensity");
    setup.is_extreme_mode = true;
    let choice = |text: &str, alignment| PassionWeaverChoice {
        text: text.into(),
        alignment,
    };
    let mut scores = AlignmentScores::default();
    scores.lust = 2;
    scores.good = 1;
    let mut page_visuals = BTreeMap::new();
    page_visuals.insert(
        1,
        PageVisual {
            url: IMAGE_DATA.into(),
            prompt: "candlelit balcony".into(),
        },
    );
    PassionWeaverStory::from_parts(PassionWeaverParts {
        id: id.into(),
        title: "Midnight".into(),
        last_updated_at: CREATED_AT,
        setup,
        history: PageHistory::from_parts(vec!["one".into(), "two".into()], 1)
            .expect("fixture history is valid"),
        choices: vec![choice("Lift the mask", Alignment::Lust)],
        choice_history: vec![
            choice("Dance", Alignment::Good),
            choice("Step closer", Alignment::Lust),
            choice("Whisper", Alignment::Lust),
        ],
        alignment_scores: scores,
        page_visuals,
    })
    .expect("fixture visuals are in range")
}

// --- Snippets, workflows, memories ---

pub fn minimal_snippet(id: &str) -> CodeSnippet {
    CodeSnippet::restore(id, "Snippet", CodeBlock::default(), CREATED_AT, None)
}

pub fn maximal_snippet(id: &str) -> CodeSnippet {
    CodeSnippet::restore(
        id,
        "Landing page",
        CodeBlock {
            html: "<h1>Hello</h1>".into(),
            css: "h1 { color: teal; }".into(),
            javascript: "console.log('hi');".into(),
            language: Some("html".into()),
        },
        CREATED_AT,
        Some("https://example.test/card.png".into()),
    )
}

pub fn minimal_workflow(id: &str) -> Workflow {
    let mut workflow = Workflow::new("Empty");
    workflow.id = id.into();
    workflow
}

pub fn maximal_workflow(id: &str) -> Workflow {
    let mut workflow = minimal_workflow(id);
    workflow.name = "Research brief".into();
    workflow.description = "Research a topic and turn it into slides.".into();
    workflow.initial_input_label = "Topic".into();
    workflow.card_image_url = Some("https://example.test/wf.png".into());
    workflow.steps = vec![
        step("s1", WorkflowStepKind::ResearchTopic, "Research [INPUT] in depth"),
        step("s2", WorkflowStepKind::SummarizeText, "Summarize: [INPUT]"),
        step("s3", WorkflowStepKind::GenerateSlides, "Make slides from [INPUT]"),
    ];
    workflow
}

fn step(id: &str, kind: WorkflowStepKind, template: &str) -> WorkflowStep {
    let mut step = WorkflowStep::new(kind, kind.to_string(), template);
    step.id = id.into();
    step
}

pub fn minimal_memory(id: &str) -> MemoryItem {
    MemoryItem::restore(id, "Likes tea", CREATED_AT, None)
}

pub fn profile_memory(id: &str, profile_id: &str) -> MemoryItem {
    MemoryItem::restore(id, "Favorite color is green", CREATED_AT, Some(profile_id.into()))
}

pub fn bookmark(id: &str, chat_id: &str) -> Bookmark {
    Bookmark {
        id: id.into(),
        content: "the itinerary".into(),
        chat_id: chat_id.into(),
        chat_title: "Planning the trip".into(),
        created_at: CREATED_AT,
    }
}

pub fn favorite(id: &str) -> FavoritePrompt {
    FavoritePrompt {
        id: id.into(),
        text: "Explain it like I'm five".into(),
    }
}

// --- Singletons ---

pub fn maximal_settings() -> CustomizationSettings {
    CustomizationSettings {
        theme: Theme::Light,
        background_type: BackgroundType::Image,
        background_image_url: IMAGE_DATA.into(),
        background_blur: 4.0,
        scroll_down_button_align: ButtonAlign::Right,
        animation_intensity: AnimationIntensity::Playful,
        live_character: Some(LiveCharacterState {
            url: "https://example.test/char.webm".into(),
            x: 120.0,
            y: 80.0,
            scale: 1.5,
        }),
        active_ai_model: ContentModel::Nsfw,
        live_talk_voice: Some("Kore".into()),
        ..CustomizationSettings::default()
    }
}

pub fn user_profile() -> UserProfile {
    UserProfile {
        name: "Sam".into(),
        nickname: "S".into(),
        age: "29".into(),
        bio: "Night owl.".into(),
        avatar_url: "https://example.test/sam.png".into(),
    }
}

pub fn ai_profile() -> AiProfile {
    AiProfile {
        name: "Nova".into(),
        age: "".into(),
        avatar_url: String::new(),
        persona: "Calm".into(),
        personality: "Warm".into(),
        rules: "Be brief.".into(),
        enabled: true,
    }
}

/// A version-1 companion profile record, written before the maturity flag
/// existed, that still carries an explicit attribute.
pub fn legacy_profile_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Old Mika",
        "avatar": "",
        "personality": "Default",
        "appearance": "",
        "backstory": "",
        "relationshipStatus": "Just Met",
        "interests": "",
        "gallery": [],
        "chatHistory": [],
        "createdAt": CREATED_AT,
        "breastSize": "large"
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximal_workflow_is_well_formed() {
        assert!(maximal_workflow("w").invariant_violations().is_empty());
    }

    #[test]
    fn maximal_settings_are_in_range() {
        assert!(maximal_settings().clamp_in_place().is_empty());
    }

    #[test]
    fn maximal_profile_is_explicit() {
        let profile = maximal_profile("p");
        let attrs = profile.maturity.attributes().unwrap();
        assert_eq!(attrs.pussy_color.as_deref(), Some("attribute 11"));
    }
}
