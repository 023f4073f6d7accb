// SPDX-FileCopyrightText: 2026 Keepsake Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-defined multi-step workflows and the state of a workflow run.

use std::collections::HashSet;

use serde::Serialize;

use crate::catalog::{WorkflowOutputKind, WorkflowStepKind};
use crate::error::KeepsakeError;
use crate::types::{Entity, EntityKind, new_id};
use crate::violation::Violation;

/// Placeholder replaced by the previous step's output (or the initial input).
pub const INPUT_MARKER: &str = "[INPUT]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WorkflowStepKind,
    pub title: String,
    /// e.g. `Summarize the following text: [INPUT]`
    pub prompt_template: String,
}

impl WorkflowStep {
    pub fn new(kind: WorkflowStepKind, title: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            kind,
            title: title.into(),
            prompt_template: template.into(),
        }
    }

    pub fn consumes_input(&self) -> bool {
        self.prompt_template.contains(INPUT_MARKER)
    }

    /// Substitute `input` for every marker in the template.
    pub fn render(&self, input: &str) -> String {
        self.prompt_template.replace(INPUT_MARKER, input)
    }
}

/// A named pipeline of steps, run in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub initial_input_label: String,
    pub steps: Vec<WorkflowStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_image_url: Option<String>,
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            description: String::new(),
            initial_input_label: String::new(),
            steps: Vec::new(),
            card_image_url: None,
        }
    }

    /// Structural problems: duplicate step ids, and steps after the first
    /// whose template never uses the previous output.
    pub fn invariant_violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        let mut seen = HashSet::new();
        for (i, step) in self.steps.iter().enumerate() {
            if !seen.insert(step.id.as_str()) {
                violations.push(Violation::Invariant {
                    field: format!("steps[{i}].id"),
                    message: format!("duplicates step id `{}`", step.id),
                });
            }
            if i > 0 && !step.consumes_input() {
                violations.push(Violation::Invariant {
                    field: format!("steps[{i}].promptTemplate"),
                    message: format!("must contain {INPUT_MARKER}"),
                });
            }
        }
        violations
    }

    pub fn step_index(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }
}

impl Entity for Workflow {
    const KIND: EntityKind = EntityKind::Workflow;

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionResult {
    pub step_id: String,
    /// Text, image URL, full HTML, or slide JSON depending on `output_type`.
    pub output: String,
    pub output_type: WorkflowOutputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
}

/// Transient state of one workflow run.
///
/// Holds `current_step_index <= steps.len()`, `results.len() <=
/// current_step_index`, and never running while an error is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionState {
    is_running: bool,
    current_step_index: usize,
    results: Vec<WorkflowExecutionResult>,
    error: Option<String>,
    workflow: Option<Workflow>,
    initial_input: Option<String>,
    active_output_step_id: Option<String>,
}

impl WorkflowExecutionState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn results(&self) -> &[WorkflowExecutionResult] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn workflow(&self) -> Option<&Workflow> {
        self.workflow.as_ref()
    }

    pub fn initial_input(&self) -> Option<&str> {
        self.initial_input.as_deref()
    }

    pub fn active_output_step_id(&self) -> Option<&str> {
        self.active_output_step_id.as_deref()
    }

    /// The step awaiting a result, if the run is in progress.
    pub fn current_step(&self) -> Option<&WorkflowStep> {
        if !self.is_running {
            return None;
        }
        self.workflow
            .as_ref()
            .and_then(|w| w.steps.get(self.current_step_index))
    }

    /// Prompt for the current step: the initial input feeds the first step,
    /// each later step gets the previous step's output.
    pub fn next_prompt(&self) -> Option<String> {
        let step = self.current_step()?;
        let input = match self.results.last() {
            Some(previous) => previous.output.as_str(),
            None => self.initial_input.as_deref().unwrap_or_default(),
        };
        Some(step.render(input))
    }

    pub fn start(
        &mut self,
        workflow: Workflow,
        initial_input: impl Into<String>,
    ) -> Result<(), KeepsakeError> {
        if self.is_running {
            return Err(KeepsakeError::InvalidTransition(
                "a workflow is already running".into(),
            ));
        }
        if workflow.steps.is_empty() {
            return Err(KeepsakeError::InvalidTransition(format!(
                "workflow `{}` has no steps",
                workflow.id
            )));
        }
        *self = Self {
            is_running: true,
            current_step_index: 0,
            results: Vec::new(),
            error: None,
            workflow: Some(workflow),
            initial_input: Some(initial_input.into()),
            active_output_step_id: None,
        };
        Ok(())
    }

    /// Store the current step's result and advance. The run stops after
    /// the last step, with its output selected.
    pub fn record_result(&mut self, result: WorkflowExecutionResult) -> Result<(), KeepsakeError> {
        let Some(step) = self.current_step() else {
            return Err(KeepsakeError::InvalidTransition(
                "no step is awaiting a result".into(),
            ));
        };
        if step.id != result.step_id {
            return Err(KeepsakeError::InvalidTransition(format!(
                "result for step `{}` but step `{}` is running",
                result.step_id, step.id
            )));
        }
        let step_count = self.workflow.as_ref().map_or(0, |w| w.steps.len());
        let step_id = result.step_id.clone();
        self.results.push(result);
        self.current_step_index += 1;
        self.active_output_step_id = Some(step_id);
        if self.current_step_index == step_count {
            self.is_running = false;
        }
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), KeepsakeError> {
        if !self.is_running {
            return Err(KeepsakeError::InvalidTransition(
                "cannot fail a run that is not in progress".into(),
            ));
        }
        self.error = Some(message.into());
        self.is_running = false;
        Ok(())
    }

    /// Show the output of a completed step.
    pub fn select_output(&mut self, step_id: &str) -> Result<(), KeepsakeError> {
        if !self.results.iter().any(|r| r.step_id == step_id) {
            return Err(KeepsakeError::InvalidTransition(format!(
                "step `{step_id}` has no result"
            )));
        }
        self.active_output_step_id = Some(step_id.to_string());
        Ok(())
    }
}
