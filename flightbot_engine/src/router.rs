//! Per-turn entry point.
//!
//! The router owns the order of a turn: interruption keywords first, then
//! conversation start / continue, then a single state flush. A fault inside
//! a step never reaches the caller; the turn degrades to one generic apology
//! and the persisted state stays what it was before the turn.

use std::sync::Arc;

use flightbot_core::{Outbound, Outbox, TurnEvent, TurnInput, TurnOutput};
use flightbot_state::{slots, StateAccessor, StateError, StateStore};
use thiserror::Error;
use tracing::{info, warn};

use crate::dialog::DialogRegistry;
use crate::engine::{DialogEngine, TurnStatus};
use crate::error::DialogError;
use crate::stack::DialogStack;

/// Errors that fail a whole turn.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("state persistence failed: {0}")]
    Store(#[from] StateError),
}

/// What a reserved keyword does instead of normal routing.
#[derive(Debug, Clone)]
pub enum Interruption {
    /// Send static content, then re-send the active prompt unconsumed.
    Inform(Vec<Outbound>),
    /// Cancel every dialog and restart at the root.
    CancelRestart,
    /// Say goodbye and cancel every dialog.
    Exit,
}

/// Reserved keywords checked before any step routing.
#[derive(Debug, Clone, Default)]
pub struct Interruptions {
    entries: Vec<(String, Interruption)>,
}

impl Interruptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a keyword. Matching is trimmed and case-insensitive.
    #[must_use]
    pub fn with(mut self, keyword: impl Into<String>, action: Interruption) -> Self {
        self.entries.push((keyword.into(), action));
        self
    }

    fn lookup(&self, text: &str) -> Option<&Interruption> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(keyword, _)| keyword.eq_ignore_ascii_case(trimmed))
            .map(|(_, action)| action)
    }
}

/// Fixed texts and wiring of a turn router.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Dialog pushed on first contact and after cancel.
    pub root_dialog: String,
    /// Sent when a new conversation starts.
    pub greeting: String,
    /// Sent when the conversation ends.
    pub farewell: String,
    /// Sent instead of everything else when a step faults.
    pub apology: String,
    pub interruptions: Interruptions,
}

/// Entry point for one incoming utterance.
pub struct TurnRouter {
    engine: DialogEngine,
    store: Arc<dyn StateStore>,
    options: RouterOptions,
}

impl TurnRouter {
    #[must_use]
    pub fn new(registry: DialogRegistry, store: Arc<dyn StateStore>, options: RouterOptions) -> Self {
        Self {
            engine: DialogEngine::new(registry),
            store,
            options,
        }
    }

    /// Process one turn and flush staged state exactly once.
    pub async fn process_turn(&self, turn: TurnInput) -> Result<TurnOutput, TurnError> {
        info!(
            conversation_id = %turn.conversation_id,
            event = ?turn.event,
            "processing turn"
        );

        let mut state = StateAccessor::load(Arc::clone(&self.store), &turn.conversation_id).await?;
        let mut stack: DialogStack = state.get_or_default(slots::DIALOG_STATE)?;
        let mut outbox = Outbox::new();

        match self.run_turn(&turn, &mut stack, &mut state, &mut outbox) {
            Ok(()) => {
                state.set(slots::DIALOG_STATE, &stack)?;
                state.flush().await?;
                Ok(TurnOutput {
                    messages: outbox.into_items(),
                })
            }
            Err(error) => {
                // The failed turn's staged state is discarded; the stack the
                // next turn sees is whatever was last committed.
                warn!(
                    conversation_id = %turn.conversation_id,
                    error = %error,
                    "step fault; discarding turn"
                );
                Ok(TurnOutput {
                    messages: vec![Outbound::Text(self.options.apology.clone())],
                })
            }
        }
    }

    fn run_turn(
        &self,
        turn: &TurnInput,
        stack: &mut DialogStack,
        state: &mut StateAccessor,
        outbox: &mut Outbox,
    ) -> Result<(), DialogError> {
        if turn.event == TurnEvent::Message {
            if let Some(action) = self.options.interruptions.lookup(&turn.text) {
                return self.run_interruption(action, stack, state, outbox);
            }
        }

        match turn.event {
            TurnEvent::ConversationStarted => {
                outbox.text(self.options.greeting.clone());
                self.engine
                    .begin(stack, &self.options.root_dialog, state, outbox)?;
            }
            TurnEvent::Message => {
                let status = if stack.is_empty() {
                    // First contact (or post-exit): start at the root menu.
                    self.engine
                        .begin(stack, &self.options.root_dialog, state, outbox)?
                } else {
                    self.engine.continue_top(stack, &turn.text, state, outbox)?
                };
                if status == TurnStatus::Complete {
                    outbox.text(self.options.farewell.clone());
                }
            }
        }
        Ok(())
    }

    fn run_interruption(
        &self,
        action: &Interruption,
        stack: &mut DialogStack,
        state: &mut StateAccessor,
        outbox: &mut Outbox,
    ) -> Result<(), DialogError> {
        match action {
            Interruption::Inform(items) => {
                for item in items {
                    match item {
                        Outbound::Text(text) => outbox.text(text.clone()),
                        Outbound::Card(card) => outbox.card(card.clone()),
                    }
                }
                self.engine.reprompt(stack, outbox);
            }
            Interruption::CancelRestart => {
                DialogEngine::cancel_all(stack);
                self.engine
                    .begin(stack, &self.options.root_dialog, state, outbox)?;
            }
            Interruption::Exit => {
                outbox.text(self.options.farewell.clone());
                DialogEngine::cancel_all(stack);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use flightbot_core::Card;
    use flightbot_state::MemoryStore;

    use crate::dialog::{DialogDefinition, StepAction, StepContext};
    use crate::prompt::PromptSpec;
    use crate::result::StepResult;

    fn faulty_step(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
        // Reads a number that was never produced.
        let _ = ctx.result().as_number()?;
        Ok(StepAction::End(StepResult::None))
    }

    fn ask(_ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
        Ok(StepAction::Prompt(PromptSpec::choice(
            "Start",
            "Ready?",
            ["yes"],
        )))
    }

    fn options(root: &str) -> RouterOptions {
        RouterOptions {
            root_dialog: root.to_string(),
            greeting: "hello".to_string(),
            farewell: "bye".to_string(),
            apology: "I am unable to do anything...".to_string(),
            interruptions: Interruptions::new(),
        }
    }

    #[tokio::test]
    async fn test_step_fault_becomes_apology_and_state_is_untouched() {
        let mut registry = DialogRegistry::new();
        registry
            .register(DialogDefinition::new("boom").step(faulty_step))
            .unwrap();
        let store = Arc::new(MemoryStore::new());
        let router = TurnRouter::new(registry, store.clone(), options("boom"));

        let output = router
            .process_turn(flightbot_core::TurnInput::started("conv"))
            .await
            .unwrap();
        assert_eq!(
            output.messages,
            vec![Outbound::Text("I am unable to do anything...".to_string())]
        );

        // Nothing was committed: the next turn starts from a clean slate and
        // faults the same way instead of resuming a corrupted stack.
        let accessor = StateAccessor::load(store.clone(), "conv").await.unwrap();
        let stack: DialogStack = accessor.get_or_default(slots::DIALOG_STATE).unwrap();
        assert!(stack.is_empty());
    }

    #[tokio::test]
    async fn test_flush_failure_fails_the_turn() {
        struct WriteFailingStore;

        #[async_trait::async_trait]
        impl StateStore for WriteFailingStore {
            async fn get(&self, _key: &str) -> anyhow::Result<Option<Vec<u8>>> {
                Ok(None)
            }

            async fn set(&self, _key: &str, _value: Vec<u8>) -> anyhow::Result<()> {
                anyhow::bail!("store unreachable")
            }
        }

        let mut registry = DialogRegistry::new();
        registry
            .register(DialogDefinition::new("menu").step(ask))
            .unwrap();
        let router = TurnRouter::new(registry, Arc::new(WriteFailingStore), options("menu"));

        let err = router
            .process_turn(flightbot_core::TurnInput::started("conv"))
            .await
            .unwrap_err();
        assert!(matches!(err, TurnError::Store(_)));
    }

    #[tokio::test]
    async fn test_inform_interruption_reprompts() {
        let mut registry = DialogRegistry::new();
        registry
            .register(DialogDefinition::new("menu").step(ask))
            .unwrap();
        let store = Arc::new(MemoryStore::new());
        let mut opts = options("menu");
        opts.interruptions = Interruptions::new().with(
            "help",
            Interruption::Inform(vec![Outbound::Card(Card::new("Help"))]),
        );
        let router = TurnRouter::new(registry, store, opts);

        router
            .process_turn(flightbot_core::TurnInput::started("conv"))
            .await
            .unwrap();
        let output = router
            .process_turn(flightbot_core::TurnInput::message("conv", "help"))
            .await
            .unwrap();

        // The card plus the re-sent prompt, nothing consumed.
        assert_eq!(output.messages.len(), 2);
        assert!(matches!(&output.messages[0], Outbound::Card(card) if card.title == "Help"));
        assert!(
            matches!(&output.messages[1], Outbound::Text(text) if text.starts_with("Ready?"))
        );
    }

    #[test]
    fn test_keyword_lookup_is_trimmed_and_case_insensitive() {
        let interruptions = Interruptions::new()
            .with("exit", Interruption::Exit)
            .with("more flight", Interruption::Inform(Vec::new()));

        assert!(matches!(
            interruptions.lookup("  EXIT "),
            Some(Interruption::Exit)
        ));
        assert!(matches!(
            interruptions.lookup("More Flight"),
            Some(Interruption::Inform(_))
        ));
        assert!(interruptions.lookup("exit now").is_none());
        assert!(interruptions.lookup("").is_none());
        assert!(interruptions.lookup("   ").is_none());
    }
}
