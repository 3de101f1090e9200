//! The dialog stack engine.
//!
//! Drives step-sequence dialogs over the persisted stack: pushes and pops
//! instances, routes one utterance to the single suspended prompt, and
//! propagates end results upward through parent dialogs until a new prompt
//! suspends the turn or the stack empties.

use flightbot_core::Outbox;
use flightbot_state::StateAccessor;
use tracing::debug;

use crate::dialog::{DialogDefinition, DialogRegistry, StepAction, StepContext};
use crate::error::DialogError;
use crate::prompt::{match_choice, resolve_dates, PromptHandler, PromptSpec, PromptState, RecognizerKind, Validation};
use crate::result::StepResult;
use crate::stack::{DialogInstance, DialogStack, StepCursor};

/// How a turn left the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// A prompt is suspended, waiting for the next utterance.
    Waiting,
    /// The stack is empty; the conversation is idle.
    Complete,
}

/// Stack operations over a fixed dialog registry.
pub struct DialogEngine {
    registry: DialogRegistry,
}

impl DialogEngine {
    #[must_use]
    pub const fn new(registry: DialogRegistry) -> Self {
        Self { registry }
    }

    #[must_use]
    pub const fn registry(&self) -> &DialogRegistry {
        &self.registry
    }

    /// Push a dialog and run it until it suspends or the stack empties.
    pub fn begin(
        &self,
        stack: &mut DialogStack,
        dialog_id: &str,
        state: &mut StateAccessor,
        outbox: &mut Outbox,
    ) -> Result<TurnStatus, DialogError> {
        self.registry.get(dialog_id)?;
        debug!(dialog = dialog_id, "beginning dialog");
        stack.push(DialogInstance::new(dialog_id));
        self.drive(stack, state, outbox, StepResult::None)
    }

    /// Feed one utterance to the suspended prompt at the top of the stack.
    pub fn continue_top(
        &self,
        stack: &mut DialogStack,
        input: &str,
        state: &mut StateAccessor,
        outbox: &mut Outbox,
    ) -> Result<TurnStatus, DialogError> {
        let (dialog_id, prompt) = match stack.top() {
            Some(frame) => match &frame.prompt {
                Some(prompt) => (frame.dialog_id.clone(), prompt.clone()),
                None => return Err(DialogError::NoActivePrompt),
            },
            None => return Err(DialogError::NoActivePrompt),
        };
        let definition = self.registry.get(&dialog_id)?;

        match Self::recognize(&prompt, definition, &dialog_id, input, state)? {
            Validation::Valid(result) => {
                debug!(dialog = %dialog_id, prompt = %prompt.name, "prompt resolved");
                if let Some(frame) = stack.top_mut() {
                    frame.prompt = None;
                    frame.advance();
                }
                self.drive(stack, state, outbox, result)
            }
            Validation::Invalid(message) => {
                debug!(dialog = %dialog_id, prompt = %prompt.name, "input rejected");
                if let Some(text) = message {
                    outbox.text(text);
                }
                outbox.text(render_prompt(&prompt, true));
                Ok(TurnStatus::Waiting)
            }
        }
    }

    /// Re-send the active prompt without consuming input. No-op when nothing
    /// is suspended.
    pub fn reprompt(&self, stack: &DialogStack, outbox: &mut Outbox) {
        if let Some(prompt) = stack.top().and_then(|frame| frame.prompt.as_ref()) {
            outbox.text(render_prompt(prompt, false));
        }
    }

    /// Empty the stack unconditionally.
    pub fn cancel_all(stack: &mut DialogStack) {
        debug!(frames = stack.len(), "cancelling all dialogs");
        stack.clear();
    }

    /// Run steps until a prompt suspends the turn or the stack empties.
    fn drive(
        &self,
        stack: &mut DialogStack,
        state: &mut StateAccessor,
        outbox: &mut Outbox,
        first: StepResult,
    ) -> Result<TurnStatus, DialogError> {
        let mut result = first;
        loop {
            let (dialog_id, index) = match stack.top_mut() {
                None => return Ok(TurnStatus::Complete),
                Some(frame) => {
                    if frame.cursor == StepCursor::NotStarted {
                        frame.advance();
                    }
                    let index = match frame.cursor {
                        StepCursor::At(index) => index,
                        StepCursor::NotStarted => 0,
                    };
                    (frame.dialog_id.clone(), index)
                }
            };
            let definition = self.registry.get(&dialog_id)?;

            let Some(step) = definition.step_at(index) else {
                // Walked past the last step: implicit end with no result.
                debug!(dialog = %dialog_id, "dialog ran past its last step");
                stack.pop();
                if let Some(parent) = stack.top_mut() {
                    parent.advance();
                }
                result = StepResult::None;
                continue;
            };

            debug!(dialog = %dialog_id, step = index, input = result.kind(), "running step");
            let action = {
                let Some(frame) = stack.top_mut() else {
                    return Err(DialogError::NoActivePrompt);
                };
                let mut ctx = StepContext::new(
                    std::mem::replace(&mut result, StepResult::None),
                    state,
                    outbox,
                    &mut frame.values,
                );
                step(&mut ctx)?
            };

            match action {
                StepAction::Prompt(spec) => {
                    Self::check_prompt(definition, &dialog_id, &spec)?;
                    let prompt = PromptState::from(spec);
                    debug!(dialog = %dialog_id, prompt = %prompt.name, "suspending on prompt");
                    outbox.text(render_prompt(&prompt, false));
                    if let Some(frame) = stack.top_mut() {
                        frame.prompt = Some(prompt);
                    }
                    return Ok(TurnStatus::Waiting);
                }
                StepAction::Continue(next) => {
                    if let Some(frame) = stack.top_mut() {
                        frame.advance();
                    }
                    result = next;
                }
                StepAction::PushChild(child_id) => {
                    self.registry.get(&child_id)?;
                    debug!(parent = %dialog_id, child = %child_id, "pushing child dialog");
                    stack.push(DialogInstance::new(child_id));
                    result = StepResult::None;
                }
                StepAction::Replace(next_id) => {
                    self.registry.get(&next_id)?;
                    debug!(old = %dialog_id, new = %next_id, "replacing top dialog");
                    stack.pop();
                    stack.push(DialogInstance::new(next_id));
                    result = StepResult::None;
                }
                StepAction::End(value) => {
                    debug!(dialog = %dialog_id, result = value.kind(), "dialog ended");
                    stack.pop();
                    if let Some(parent) = stack.top_mut() {
                        parent.advance();
                    }
                    result = value;
                }
            }
        }
    }

    /// Verify at activation time that a named prompt resolves to a handler
    /// of the right kind.
    fn check_prompt(
        definition: &DialogDefinition,
        dialog_id: &str,
        spec: &PromptSpec,
    ) -> Result<(), DialogError> {
        let expected = spec.recognizer.describes();
        match spec.recognizer {
            RecognizerKind::Choice { .. } => Ok(()),
            RecognizerKind::Text => match definition.handler(&spec.name) {
                Some(PromptHandler::Text(_)) => Ok(()),
                Some(_) => Err(DialogError::PromptKindMismatch(spec.name.clone(), expected)),
                None => Err(DialogError::UnknownPrompt(
                    spec.name.clone(),
                    dialog_id.to_string(),
                )),
            },
            RecognizerKind::Date => match definition.handler(&spec.name) {
                Some(PromptHandler::Date(_)) => Ok(()),
                Some(_) => Err(DialogError::PromptKindMismatch(spec.name.clone(), expected)),
                None => Err(DialogError::UnknownPrompt(
                    spec.name.clone(),
                    dialog_id.to_string(),
                )),
            },
        }
    }

    /// Recognize and validate one utterance against a suspended prompt.
    fn recognize(
        prompt: &PromptState,
        definition: &DialogDefinition,
        dialog_id: &str,
        input: &str,
        state: &StateAccessor,
    ) -> Result<Validation, DialogError> {
        match &prompt.recognizer {
            RecognizerKind::Choice { options } => Ok(match_choice(options, input).map_or(
                Validation::Invalid(None),
                |label| Validation::Valid(StepResult::Choice(label)),
            )),
            RecognizerKind::Text => match definition.handler(&prompt.name) {
                Some(PromptHandler::Text(validator)) => Ok(validator(input, state)),
                Some(_) => Err(DialogError::PromptKindMismatch(prompt.name.clone(), "text")),
                None => Err(DialogError::UnknownPrompt(
                    prompt.name.clone(),
                    dialog_id.to_string(),
                )),
            },
            RecognizerKind::Date => {
                let candidates = resolve_dates(input);
                match definition.handler(&prompt.name) {
                    Some(PromptHandler::Date(validator)) => Ok(validator(&candidates, state)),
                    Some(_) => Err(DialogError::PromptKindMismatch(prompt.name.clone(), "date")),
                    None => Err(DialogError::UnknownPrompt(
                        prompt.name.clone(),
                        dialog_id.to_string(),
                    )),
                }
            }
        }
    }
}

/// Render a prompt (or its retry text) together with its options.
fn render_prompt(prompt: &PromptState, retry: bool) -> String {
    let base = if retry {
        prompt.retry.as_deref().unwrap_or(&prompt.text)
    } else {
        &prompt.text
    };
    match &prompt.recognizer {
        RecognizerKind::Choice { options } => {
            let mut text = base.to_string();
            for option in options {
                text.push_str("\n - ");
                text.push_str(option);
            }
            text
        }
        _ => base.to_string(),
    }
}
