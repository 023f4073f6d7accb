// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Story Writer state.

use serde::Serialize;

use crate::catalog::{StoryMode, StoryPov, StorySceneType, StoryTone};
use crate::error::KeepsakeError;
use crate::model::fiction::PageHistory;
use crate::types::{Entity, EntityKind, new_id};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryCharacter {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySetup {
    pub mode: StoryMode,
    pub main_prompt: String,
    pub setting: String,
    pub tone: StoryTone,
    pub pov: StoryPov,
    pub plot_injection: String,
    pub scene_type: StorySceneType,
    pub characters: Vec<StoryCharacter>,
}

impl StorySetup {
    pub fn new(mode: StoryMode, main_prompt: impl Into<String>) -> Self {
        Self {
            mode,
            main_prompt: main_prompt.into(),
            setting: String::new(),
            tone: StoryTone::Neutral,
            pov: StoryPov::ThirdPersonLimited,
            plot_injection: String::new(),
            scene_type: StorySceneType::GeneralNarrative,
            characters: Vec::new(),
        }
    }
}

/// A Story Writer session. Pages and choices only grow until a restart,
/// and the setup's mode cannot change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryState {
    pub id: String,
    setup: StorySetup,
    #[serde(flatten)]
    history: PageHistory,
    choices: Vec<String>,
}

impl StoryState {
    pub fn new(setup: StorySetup) -> Self {
        Self::from_parts(new_id(), setup, PageHistory::new(), Vec::new())
    }

    pub fn from_parts(
        id: impl Into<String>,
        setup: StorySetup,
        history: PageHistory,
        choices: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            setup,
            history,
            choices,
        }
    }

    pub fn setup(&self) -> &StorySetup {
        &self.setup
    }

    /// Replace the setup. The mode is fixed once a story exists.
    pub fn update_setup(&mut self, setup: StorySetup) -> Result<(), KeepsakeError> {
        if setup.mode != self.setup.mode {
            return Err(KeepsakeError::InvalidTransition(format!(
                "story mode is fixed at `{}`",
                self.setup.mode
            )));
        }
        self.setup = setup;
        Ok(())
    }

    pub fn history(&self) -> &PageHistory {
        &self.history
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn append_page(&mut self, page: impl Into<String>) -> Result<(), KeepsakeError> {
        self.history.append(page)
    }

    pub fn add_choice(&mut self, choice: impl Into<String>) {
        self.choices.push(choice.into());
    }

    pub fn go_to(&mut self, index: usize) -> Result<(), KeepsakeError> {
        self.history.go_to(index)
    }

    pub fn restart(&mut self) {
        self.history.clear();
        self.choices.clear();
    }
}

impl Entity for StoryState {
    const KIND: EntityKind = EntityKind::StoryState;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_cannot_change() {
        let mut story = StoryState::new(StorySetup::new(StoryMode::Interactive, "a heist"));
        let mut setup = story.setup().clone();
        setup.tone = StoryTone::DarkGritty;
        story.update_setup(setup.clone()).unwrap();
        assert_eq!(story.setup().tone, StoryTone::DarkGritty);

        setup.mode = StoryMode::Linear;
        assert!(matches!(
            story.update_setup(setup),
            Err(KeepsakeError::InvalidTransition(_))
        ));
    }

    #[test]
    fn restart_clears_pages_and_choices() {
        let mut story = StoryState::new(StorySetup::new(StoryMode::Interactive, "x"));
        story.append_page("one").unwrap();
        story.add_choice("open the door");
        story.restart();
        assert!(story.history().is_empty());
        assert!(story.choices().is_empty());
    }

    #[test]
    fn serializes_flat_position() {
        let mut story = StoryState::from_parts(
            "s1",
            StorySetup::new(StoryMode::OnePage, "x"),
            PageHistory::new(),
            vec![],
        );
        story.append_page("one").unwrap();
        let value = serde_json::to_value(&story).unwrap();
        assert_eq!(value["currentPageIndex"], 0);
        assert_eq!(value["pages"][0], "one");
        assert_eq!(value["setup"]["mode"], "one-page");
        assert_eq!(value["setup"]["sceneType"], "General Narrative");
    }
}
