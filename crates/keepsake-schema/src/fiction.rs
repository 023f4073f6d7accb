// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Readers for the two interactive-fiction state machines.

use std::collections::BTreeMap;

use keepsake_core::catalog::{
    Alignment, CharacterGender, PassionTone, StoryMode, StoryPov, StorySceneType, StoryTone,
};
use keepsake_core::model::{
    AlignmentScores, Intensity, PageHistory, PageVisual, PassionWeaverChoice, PassionWeaverParts,
    PassionWeaverSetup, PassionWeaverStory, StoryCharacter, StorySetup, StoryState,
};
use keepsake_core::{Catalogue, EntityKind};

use crate::Schema;
use crate::reader::{FromRecord, RecordReader};

/// Pages plus position. A position outside the pages breaks the record.
fn read_history(r: &mut RecordReader<'_>) -> Option<PageHistory> {
    let pages = r.string_list("pages");
    let current = r.index_or("currentPageIndex", 0);
    let len = pages.len();
    match PageHistory::from_parts(pages, current) {
        Ok(history) => Some(history),
        Err(_) => {
            r.invariant(
                "currentPageIndex",
                format!("{current} is out of range for {len} page(s)"),
            );
            None
        }
    }
}

// --- Story writer ---

impl FromRecord for StoryCharacter {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let name = r.required_str("name");
        let description = r.text("description");
        Some(Self {
            id: id?,
            name: name?,
            description,
        })
    }
}

impl FromRecord for StorySetup {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let mode = r.required_catalogue::<StoryMode>("mode");
        let main_prompt = r.text("mainPrompt");
        let setting = r.text("setting");
        let tone = r.required_catalogue::<StoryTone>("tone");
        let pov = r.required_catalogue::<StoryPov>("pov");
        let plot_injection = r.text("plotInjection");
        let scene_type = r.required_catalogue::<StorySceneType>("sceneType");
        let characters = r.nested_list("characters");
        Some(Self {
            mode: mode?,
            main_prompt,
            setting,
            tone: tone?,
            pov: pov?,
            plot_injection,
            scene_type: scene_type?,
            characters,
        })
    }
}

impl FromRecord for StoryState {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let setup = r.required_nested("setup");
        let history = read_history(r);
        let choices = r.string_list("choices");
        Some(StoryState::from_parts(id?, setup?, history?, choices))
    }
}

impl Schema for StoryState {
    const KIND: EntityKind = EntityKind::StoryState;
}

// --- Passion Weaver ---

impl FromRecord for PassionWeaverSetup {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let main_prompt = r.text("mainPrompt");
        let user_character = r.text("userCharacter");
        let partner_character = r.text("partnerCharacter");
        let user_gender = r.required_catalogue::<CharacterGender>("userGender");
        let partner_gender = r.required_catalogue::<CharacterGender>("partnerGender");
        let tone = r.required_catalogue::<PassionTone>("tone");
        let pov = r.required_catalogue::<StoryPov>("pov");
        let kinks = r.string_list("kinks");
        let intensity = read_intensity(r);
        let is_extreme_mode = r.bool_or("isExtremeMode", false);
        Some(Self {
            main_prompt,
            user_character,
            partner_character,
            user_gender: user_gender?,
            partner_gender: partner_gender?,
            tone: tone?,
            pov: pov?,
            kinks,
            intensity,
            is_extreme_mode,
        })
    }
}

fn read_intensity(r: &mut RecordReader<'_>) -> Intensity {
    let default = Intensity::default();
    let raw = r.i64_or("intensity", i64::from(default.get()));
    let clamped = Intensity::clamped(raw);
    if i64::from(clamped.get()) != raw {
        r.warn(
            "intensity",
            format!(
                "value {raw} outside {}..={} clamped to {}",
                Intensity::MIN,
                Intensity::MAX,
                clamped.get()
            ),
        );
    }
    clamped
}

impl FromRecord for PassionWeaverChoice {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let text = r.required_str("text");
        let alignment = r.required_catalogue::<Alignment>("alignment");
        Some(Self {
            text: text?,
            alignment: alignment?,
        })
    }
}

/// Every alignment key defaults to zero; scores only ever count up.
impl FromRecord for AlignmentScores {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let mut scores = AlignmentScores::default();
        for &alignment in Alignment::all() {
            let key = alignment.token();
            let raw = r.i64_or(key, 0);
            match u32::try_from(raw) {
                Ok(score) => *scores.slot_mut(alignment) = score,
                Err(_) if raw < 0 => r.invariant(key, "must not be negative"),
                Err(_) => *scores.slot_mut(alignment) = u32::MAX,
            }
        }
        Some(scores)
    }
}

impl FromRecord for PageVisual {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let url = r.required_str("url");
        let prompt = r.text("prompt");
        Some(Self { url: url?, prompt })
    }
}

/// Visuals keyed by page index. Keys are JSON object keys, so indices
/// arrive as decimal strings.
fn read_page_visuals(r: &mut RecordReader<'_>) -> BTreeMap<usize, PageVisual> {
    let mut visuals = BTreeMap::new();
    let Some(entries) = r.object("pageVisuals") else {
        return visuals;
    };
    for (key, value) in entries {
        let entry_key = format!("pageVisuals.{key}");
        let Ok(index) = key.parse::<usize>() else {
            r.invariant(&entry_key, "is not a page index");
            continue;
        };
        if let Some(visual) = r.nested_at(&entry_key, value) {
            visuals.insert(index, visual);
        }
    }
    visuals
}

impl FromRecord for PassionWeaverStory {
    fn read(r: &mut RecordReader<'_>) -> Option<Self> {
        let id = r.required_str("id");
        let title = r.required_str("title");
        let last_updated_at = r.required_i64("lastUpdatedAt");
        let setup = r.required_nested("setup");
        let history = read_history(r);
        let choices = r.nested_list("choices");
        let choice_history = r.nested_list("choiceHistory");
        let alignment_scores = r.optional_nested("alignmentScores").unwrap_or_default();
        let mut page_visuals = read_page_visuals(r);

        let history = history?;
        let dropped: Vec<String> = page_visuals
            .split_off(&history.len())
            .into_keys()
            .map(|index| index.to_string())
            .collect();
        if !dropped.is_empty() {
            r.warn(
                "pageVisuals",
                format!(
                    "dropped visuals for missing page(s) {} of {}",
                    dropped.join(", "),
                    history.len()
                ),
            );
        }

        let parts = PassionWeaverParts {
            id: id?,
            title: title?,
            last_updated_at: last_updated_at?,
            setup: setup?,
            history,
            choices,
            choice_history,
            alignment_scores,
            page_visuals,
        };
        match PassionWeaverStory::from_parts(parts) {
            Ok(story) => Some(story),
            Err(err) => {
                r.invariant("pageVisuals", err.to_string());
                None
            }
        }
    }
}

impl Schema for PassionWeaverStory {
    const KIND: EntityKind = EntityKind::PassionWeaverStory;
}
