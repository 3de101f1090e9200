//! The prompt/validate unit.
//!
//! A prompt is the only suspension point in a turn: a step raises a
//! `PromptSpec`, the engine persists it as a `PromptState` on the owning
//! dialog instance and ends the turn. The next utterance for the
//! conversation is recognized against the persisted state and validated;
//! success resolves a typed `StepResult`, failure re-prompts and suspends
//! again. The retry loop has no upper bound.
//!
//! Choice prompts carry their option list in the persisted state, so
//! options may be computed at step time. Text and date prompts resolve their
//! validator by prompt name from the dialog definition on resumption.

use chrono::NaiveDate;
use flightbot_state::StateAccessor;
use serde::{Deserialize, Serialize};

use crate::result::StepResult;

/// Date literal formats a date prompt recognizes.
const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%m/%d/%Y", "%d %B %Y"];

/// Recognizer of a persisted prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognizerKind {
    /// Free text, validated by the named validator.
    Text,
    /// Date literal, resolved to candidates and validated by the named
    /// validator.
    Date,
    /// Exact case-insensitive match against a fixed option set.
    Choice { options: Vec<String> },
}

impl RecognizerKind {
    pub(crate) const fn describes(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Date => "date",
            Self::Choice { .. } => "choice",
        }
    }
}

/// Prompt request raised by a step.
#[derive(Debug, Clone)]
pub struct PromptSpec {
    pub name: String,
    pub text: String,
    pub retry: Option<String>,
    pub recognizer: RecognizerKind,
}

impl PromptSpec {
    /// A free-text prompt validated by the validator registered under `name`.
    #[must_use]
    pub fn text_input(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            retry: None,
            recognizer: RecognizerKind::Text,
        }
    }

    /// A date prompt validated by the validator registered under `name`.
    #[must_use]
    pub fn date_input(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            retry: None,
            recognizer: RecognizerKind::Date,
        }
    }

    /// A closed choice prompt over the given options.
    #[must_use]
    pub fn choice<I, S>(name: impl Into<String>, text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            text: text.into(),
            retry: None,
            recognizer: RecognizerKind::Choice {
                options: options.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Text sent instead of the prompt when validation fails.
    #[must_use]
    pub fn with_retry(mut self, retry: impl Into<String>) -> Self {
        self.retry = Some(retry.into());
        self
    }
}

/// Waiting-for-input state persisted on a dialog instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptState {
    pub name: String,
    pub text: String,
    pub retry: Option<String>,
    pub recognizer: RecognizerKind,
}

impl From<PromptSpec> for PromptState {
    fn from(spec: PromptSpec) -> Self {
        Self {
            name: spec.name,
            text: spec.text,
            retry: spec.retry,
            recognizer: spec.recognizer,
        }
    }
}

/// Outcome of validating recognized input.
#[derive(Debug, Clone)]
pub enum Validation {
    /// Resolve the prompt with a typed value.
    Valid(StepResult),
    /// Re-prompt; the message (if any) is sent before suspending again.
    Invalid(Option<String>),
}

impl Validation {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(Some(message.into()))
    }
}

/// Validator of a free-text prompt. May read current conversation state.
pub type TextValidator = fn(&str, &StateAccessor) -> Validation;

/// Validator of a date prompt, given the candidate resolutions.
pub type DateValidator = fn(&[NaiveDate], &StateAccessor) -> Validation;

/// Validator side of a named prompt, registered on the dialog definition.
#[derive(Debug, Clone, Copy)]
pub enum PromptHandler {
    Text(TextValidator),
    Date(DateValidator),
    Choice,
}

/// Resolve a date literal into candidate dates, first candidate preferred.
#[must_use]
pub fn resolve_dates(text: &str) -> Vec<NaiveDate> {
    let trimmed = text.trim();
    let mut candidates = Vec::new();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            if !candidates.contains(&date) {
                candidates.push(date);
            }
        }
    }
    candidates
}

/// Match input against a choice option set: trimmed, case-insensitive, exact.
pub(crate) fn match_choice(options: &[String], input: &str) -> Option<String> {
    let trimmed = input.trim();
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(trimmed))
        .cloned()
}
