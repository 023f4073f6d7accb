// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passion Weaver: interactive fiction with alignment scoring and
//! per-page visuals.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::{Alignment, CharacterGender, PassionTone, StoryPov};
use crate::error::KeepsakeError;
use crate::model::fiction::PageHistory;
use crate::types::{Entity, EntityKind, new_id, now_millis};

/// Story intensity, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns `None` when `value` is outside `1..=5`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn clamped(value: i64) -> Self {
        Self(value.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(3)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassionWeaverSetup {
    pub main_prompt: String,
    pub user_character: String,
    pub partner_character: String,
    pub user_gender: CharacterGender,
    pub partner_gender: CharacterGender,
    pub tone: PassionTone,
    pub pov: StoryPov,
    pub kinks: Vec<String>,
    pub intensity: Intensity,
    pub is_extreme_mode: bool,
}

/// A choice offered after a page, tagged with the tendency it expresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassionWeaverChoice {
    pub text: String,
    pub alignment: Alignment,
}

/// Cumulative alignment scores. They only grow until the story restarts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AlignmentScores {
    pub safety: u32,
    pub good: u32,
    pub bad: u32,
    pub lust: u32,
    pub force: u32,
    pub pleasure: u32,
    pub happy: u32,
}

impl AlignmentScores {
    pub fn get(&self, alignment: Alignment) -> u32 {
        match alignment {
            Alignment::Safety => self.safety,
            Alignment::Good => self.good,
            Alignment::Bad => self.bad,
            Alignment::Lust => self.lust,
            Alignment::Force => self.force,
            Alignment::Pleasure => self.pleasure,
            Alignment::Happy => self.happy,
        }
    }

    pub fn slot_mut(&mut self, alignment: Alignment) -> &mut u32 {
        match alignment {
            Alignment::Safety => &mut self.safety,
            Alignment::Good => &mut self.good,
            Alignment::Bad => &mut self.bad,
            Alignment::Lust => &mut self.lust,
            Alignment::Force => &mut self.force,
            Alignment::Pleasure => &mut self.pleasure,
            Alignment::Happy => &mut self.happy,
        }
    }

    fn record(&mut self, alignment: Alignment) {
        let slot = self.slot_mut(alignment);
        *slot = slot.saturating_add(1);
    }
}

/// An image generated for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageVisual {
    pub url: String,
    pub prompt: String,
}

/// Persisted state of a Passion Weaver story, used to rebuild one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassionWeaverParts {
    pub id: String,
    pub title: String,
    pub last_updated_at: i64,
    pub setup: PassionWeaverSetup,
    pub history: PageHistory,
    pub choices: Vec<PassionWeaverChoice>,
    pub choice_history: Vec<PassionWeaverChoice>,
    pub alignment_scores: AlignmentScores,
    pub page_visuals: BTreeMap<usize, PageVisual>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassionWeaverStory {
    pub id: String,
    pub title: String,
    last_updated_at: i64,
    pub setup: PassionWeaverSetup,
    #[serde(flatten)]
    history: PageHistory,
    choices: Vec<PassionWeaverChoice>,
    choice_history: Vec<PassionWeaverChoice>,
    alignment_scores: AlignmentScores,
    page_visuals: BTreeMap<usize, PageVisual>,
}

impl PassionWeaverStory {
    pub fn new(title: impl Into<String>, setup: PassionWeaverSetup) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            last_updated_at: now_millis(),
            setup,
            history: PageHistory::new(),
            choices: Vec::new(),
            choice_history: Vec::new(),
            alignment_scores: AlignmentScores::default(),
            page_visuals: BTreeMap::new(),
        }
    }

    /// Rebuild a story. Fails when a visual is keyed to a page that does
    /// not exist.
    pub fn from_parts(parts: PassionWeaverParts) -> Result<Self, KeepsakeError> {
        let len = parts.history.len();
        if let Some((&index, _)) = parts.page_visuals.range(len..).next() {
            return Err(KeepsakeError::InvalidPageIndex { index, len });
        }
        Ok(Self {
            id: parts.id,
            title: parts.title,
            last_updated_at: parts.last_updated_at,
            setup: parts.setup,
            history: parts.history,
            choices: parts.choices,
            choice_history: parts.choice_history,
            alignment_scores: parts.alignment_scores,
            page_visuals: parts.page_visuals,
        })
    }

    pub fn last_updated_at(&self) -> i64 {
        self.last_updated_at
    }

    pub fn history(&self) -> &PageHistory {
        &self.history
    }

    /// Choices currently offered for the latest page.
    pub fn choices(&self) -> &[PassionWeaverChoice] {
        &self.choices
    }

    pub fn choice_history(&self) -> &[PassionWeaverChoice] {
        &self.choice_history
    }

    pub fn alignment_scores(&self) -> &AlignmentScores {
        &self.alignment_scores
    }

    pub fn page_visuals(&self) -> &BTreeMap<usize, PageVisual> {
        &self.page_visuals
    }

    /// Append a generated page and the choices offered after it.
    pub fn append_page(
        &mut self,
        page: impl Into<String>,
        offered: Vec<PassionWeaverChoice>,
    ) -> Result<(), KeepsakeError> {
        self.history.append(page)?;
        self.choices = offered;
        self.touch();
        Ok(())
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), KeepsakeError> {
        self.history.go_to(index)
    }

    /// Record a choice and add one to its alignment score.
    pub fn choose(&mut self, choice: PassionWeaverChoice) {
        self.alignment_scores.record(choice.alignment);
        self.choice_history.push(choice);
        self.touch();
    }

    pub fn attach_visual(&mut self, page: usize, visual: PageVisual) -> Result<(), KeepsakeError> {
        if page >= self.history.len() {
            return Err(KeepsakeError::InvalidPageIndex {
                index: page,
                len: self.history.len(),
            });
        }
        self.page_visuals.insert(page, visual);
        self.touch();
        Ok(())
    }

    /// Back to an empty story with zeroed scores.
    pub fn restart(&mut self) {
        self.history.clear();
        self.choices.clear();
        self.choice_history.clear();
        self.alignment_scores = AlignmentScores::default();
        self.page_visuals.clear();
        self.touch();
    }

    fn touch(&mut self) {
        self.last_updated_at = now_millis();
    }
}

impl Entity for PassionWeaverStory {
    const KIND: EntityKind = EntityKind::PassionWeaverStory;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> PassionWeaverSetup {
        PassionWeaverSetup {
            main_prompt: "a masquerade".into(),
            user_character: "Ash".into(),
            partner_character: "Rowan".into(),
            user_gender: CharacterGender::NonBinary,
            partner_gender: CharacterGender::Woman,
            tone: PassionTone::Romantic,
            pov: StoryPov::FirstPerson,
            kinks: vec![],
            intensity: Intensity::default(),
            is_extreme_mode: false,
        }
    }

    fn choice(alignment: Alignment) -> PassionWeaverChoice {
        PassionWeaverChoice {
            text: "go on".into(),
            alignment,
        }
    }

    #[test]
    fn choose_accumulates_scores() {
        let mut story = PassionWeaverStory::new("t", setup());
        story.append_page("one", vec![choice(Alignment::Lust)]).unwrap();
        story.choose(choice(Alignment::Lust));
        story.choose(choice(Alignment::Good));
        story.choose(choice(Alignment::Lust));
        assert_eq!(story.alignment_scores().get(Alignment::Lust), 2);
        assert_eq!(story.alignment_scores().good, 1);
        assert_eq!(story.choice_history().len(), 3);
    }

    #[test]
    fn visuals_require_existing_page() {
        let mut story = PassionWeaverStory::new("t", setup());
        let visual = PageVisual {
            url: "data:image/png;base64,AA".into(),
            prompt: "p".into(),
        };
        assert!(story.attach_visual(0, visual.clone()).is_err());
        story.append_page("one", vec![]).unwrap();
        story.attach_visual(0, visual).unwrap();
        assert_eq!(story.page_visuals().len(), 1);
    }

    #[test]
    fn restart_resets_everything() {
        let mut story = PassionWeaverStory::new("t", setup());
        story.append_page("one", vec![choice(Alignment::Force)]).unwrap();
        story.choose(choice(Alignment::Force));
        story
            .attach_visual(0, PageVisual { url: "u".into(), prompt: "p".into() })
            .unwrap();
        story.restart();
        assert!(story.history().is_empty());
        assert!(story.choices().is_empty());
        assert!(story.choice_history().is_empty());
        assert!(story.page_visuals().is_empty());
        assert_eq!(story.alignment_scores(), &AlignmentScores::default());
    }

    #[test]
    fn from_parts_rejects_visual_past_end() {
        let mut page_visuals = BTreeMap::new();
        page_visuals.insert(2, PageVisual { url: "u".into(), prompt: "p".into() });
        let parts = PassionWeaverParts {
            id: "pw1".into(),
            title: "t".into(),
            last_updated_at: 0,
            setup: setup(),
            history: PageHistory::from_parts(vec!["a".into(), "b".into()], 1).unwrap(),
            choices: vec![],
            choice_history: vec![],
            alignment_scores: AlignmentScores::default(),
            page_visuals,
        };
        assert!(matches!(
            PassionWeaverStory::from_parts(parts),
            Err(KeepsakeError::InvalidPageIndex { index: 2, len: 2 })
        ));
    }

    #[test]
    fn intensity_bounds() {
        assert!(Intensity::new(0).is_none());
        assert_eq!(Intensity::new(5).map(Intensity::get), Some(5));
        assert_eq!(Intensity::clamped(9).get(), 5);
        assert_eq!(Intensity::clamped(-1).get(), 1);
    }

    #[test]
    fn visuals_serialize_with_string_keys() {
        let mut story = PassionWeaverStory::new("t", setup());
        story.append_page("one", vec![]).unwrap();
        story
            .attach_visual(0, PageVisual { url: "u".into(), prompt: "p".into() })
            .unwrap();
        let value = serde_json::to_value(&story).unwrap();
        assert_eq!(value["pageVisuals"]["0"]["url"], "u");
        assert_eq!(value["setup"]["userGender"], "Non-binary");
        assert_eq!(value["alignmentScores"]["safety"], 0);
    }
}
