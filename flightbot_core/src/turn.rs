//! Transport boundary types.
//!
//! The engine consumes one `TurnInput` per invocation and produces outbound
//! messages through an `Outbox`. It never talks to a channel itself; the
//! transport adapter delivers whatever ended up in the outbox.

use serde::{Deserialize, Serialize};

use crate::card::Card;

/// Kind of incoming turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A user utterance.
    Message,
    /// A new user joined the conversation.
    ConversationStarted,
}

/// One incoming turn.
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub conversation_id: String,
    pub text: String,
    pub event: TurnEvent,
}

impl TurnInput {
    /// A message turn for the given conversation.
    #[must_use]
    pub fn message(conversation_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: text.into(),
            event: TurnEvent::Message,
        }
    }

    /// A conversation-started turn for the given conversation.
    #[must_use]
    pub fn started(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: String::new(),
            event: TurnEvent::ConversationStarted,
        }
    }
}

/// One outbound payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Text(String),
    Card(Card),
}

/// Outbound messages queued during a turn.
#[derive(Debug, Default)]
pub struct Outbox {
    items: Vec<Outbound>,
}

impl Outbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain text message.
    pub fn text(&mut self, text: impl Into<String>) {
        self.items.push(Outbound::Text(text.into()));
    }

    /// Queue a card.
    pub fn card(&mut self, card: Card) {
        self.items.push(Outbound::Card(card));
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn items(&self) -> &[Outbound] {
        &self.items
    }

    /// Drop everything queued so far.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Outbound> {
        self.items
    }
}

/// Result of processing one turn.
#[derive(Debug)]
pub struct TurnOutput {
    pub messages: Vec<Outbound>,
}
