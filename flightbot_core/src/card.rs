//! Displayable card values.
//!
//! A card is the structured counterpart of a rich chat attachment: a title,
//! an optional body, a list of labelled facts and optional link actions.
//! Renderers build cards from field values only; how a channel displays them
//! is up to the transport adapter (the console adapter uses `Display`).

use std::fmt;

use serde::{Deserialize, Serialize};

/// One labelled fact on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFact {
    pub title: String,
    pub value: String,
}

/// A link action offered on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAction {
    pub title: String,
    pub url: String,
}

/// A displayable attachment built from field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub title: String,
    pub body: Option<String>,
    pub facts: Vec<CardFact>,
    pub actions: Vec<CardAction>,
}

impl Card {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    #[must_use]
    pub fn fact(mut self, title: impl Into<String>, value: impl Into<String>) -> Self {
        self.facts.push(CardFact {
            title: title.into(),
            value: value.into(),
        });
        self
    }

    /// Append a fact in place.
    pub fn push_fact(&mut self, title: impl Into<String>, value: impl Into<String>) {
        self.facts.push(CardFact {
            title: title.into(),
            value: value.into(),
        });
    }

    #[must_use]
    pub fn action(mut self, title: impl Into<String>, url: impl Into<String>) -> Self {
        self.actions.push(CardAction {
            title: title.into(),
            url: url.into(),
        });
        self
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== {} ===", self.title)?;
        if let Some(body) = &self.body {
            writeln!(f, "{body}")?;
        }
        for fact in &self.facts {
            writeln!(f, "{}: {}", fact.title, fact.value)?;
        }
        for action in &self.actions {
            writeln!(f, "[{}] {}", action.title, action.url)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_display() {
        let card = Card::new("Reservation 1234567")
            .with_body("Thank you")
            .fact("Passenger", "John Smith")
            .action("Go to Skyscanner", "https://www.skyscanner.pl/");

        let rendered = card.to_string();
        assert!(rendered.contains("=== Reservation 1234567 ==="));
        assert!(rendered.contains("Passenger: John Smith"));
        assert!(rendered.contains("[Go to Skyscanner] https://www.skyscanner.pl/"));
    }
}
