//! Step-sequence dialog definitions.
//!
//! A dialog is an ordered list of step functions plus the named prompt
//! validators those steps may activate. Definitions are assembled once at
//! startup into a `DialogRegistry`; a duplicate id or a missing validator is
//! a setup failure, caught before any turn is processed.

use std::collections::HashMap;

use flightbot_core::{Card, Outbox};
use flightbot_state::StateAccessor;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DialogError;
use crate::prompt::{PromptHandler, PromptSpec};
use crate::result::StepResult;

/// What a step tells the engine to do next.
#[derive(Debug)]
pub enum StepAction {
    /// Activate a prompt and suspend the turn.
    Prompt(PromptSpec),
    /// Advance to the next step within the same turn.
    Continue(StepResult),
    /// Pause this dialog and run a child on top of it; the child's end
    /// result resumes this dialog at its next step.
    PushChild(String),
    /// Discard this instance and restart the given dialog at step 0.
    Replace(String),
    /// Pop this instance and deliver the result to the parent's next step.
    End(StepResult),
}

/// Everything a step can see and touch while it runs.
pub struct StepContext<'a> {
    result: StepResult,
    pub state: &'a mut StateAccessor,
    outbox: &'a mut Outbox,
    values: &'a mut HashMap<String, serde_json::Value>,
}

impl<'a> StepContext<'a> {
    pub(crate) fn new(
        result: StepResult,
        state: &'a mut StateAccessor,
        outbox: &'a mut Outbox,
        values: &'a mut HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            result,
            state,
            outbox,
            values,
        }
    }

    /// The previous step's result (or the child dialog's end result).
    #[must_use]
    pub const fn result(&self) -> &StepResult {
        &self.result
    }

    /// Queue a text message for the user.
    pub fn send_text(&mut self, text: impl Into<String>) {
        self.outbox.text(text);
    }

    /// Queue a card for the user.
    pub fn send_card(&mut self, card: Card) {
        self.outbox.card(card);
    }

    /// Store an instance-local value; it survives suspensions but not
    /// replace.
    pub fn set_value<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), DialogError> {
        let json = serde_json::to_value(value).map_err(flightbot_state::StateError::from)?;
        self.values.insert(key.to_string(), json);
        Ok(())
    }

    /// Read back an instance-local value.
    pub fn value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// One step of a step-sequence dialog.
pub type StepFn = fn(&mut StepContext<'_>) -> Result<StepAction, DialogError>;

/// An ordered list of steps plus the prompt validators they use.
#[derive(Debug)]
pub struct DialogDefinition {
    id: String,
    steps: Vec<StepFn>,
    prompts: HashMap<String, PromptHandler>,
}

impl DialogDefinition {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            steps: Vec::new(),
            prompts: HashMap::new(),
        }
    }

    /// Append a step.
    #[must_use]
    pub fn step(mut self, step: StepFn) -> Self {
        self.steps.push(step);
        self
    }

    /// Register a free-text prompt validator under the given name.
    #[must_use]
    pub fn text_prompt(mut self, name: &str, validator: crate::prompt::TextValidator) -> Self {
        self.prompts
            .insert(name.to_string(), PromptHandler::Text(validator));
        self
    }

    /// Register a date prompt validator under the given name.
    #[must_use]
    pub fn date_prompt(mut self, name: &str, validator: crate::prompt::DateValidator) -> Self {
        self.prompts
            .insert(name.to_string(), PromptHandler::Date(validator));
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub(crate) fn step_at(&self, index: usize) -> Option<StepFn> {
        self.steps.get(index).copied()
    }

    pub(crate) fn handler(&self, name: &str) -> Option<&PromptHandler> {
        self.prompts.get(name)
    }
}

/// All dialogs the engine can run, keyed by id.
#[derive(Default)]
pub struct DialogRegistry {
    dialogs: HashMap<String, DialogDefinition>,
}

impl DialogRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition; registering the same id twice is a setup failure.
    pub fn register(&mut self, definition: DialogDefinition) -> Result<(), DialogError> {
        let id = definition.id().to_string();
        if self.dialogs.contains_key(&id) {
            return Err(DialogError::DuplicateDialog(id));
        }
        self.dialogs.insert(id, definition);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&DialogDefinition, DialogError> {
        self.dialogs
            .get(id)
            .ok_or_else(|| DialogError::UnknownDialog(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn end(_ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
        Ok(StepAction::End(StepResult::None))
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let mut registry = DialogRegistry::new();
        registry
            .register(DialogDefinition::new("menu").step(end))
            .unwrap();

        let err = registry
            .register(DialogDefinition::new("menu").step(end))
            .unwrap_err();
        assert!(matches!(err, DialogError::DuplicateDialog(id) if id == "menu"));
    }

    #[test]
    fn test_registry_unknown_dialog() {
        let registry = DialogRegistry::new();
        let err = registry.get("missing").unwrap_err();
        assert!(matches!(err, DialogError::UnknownDialog(id) if id == "missing"));
    }
}
