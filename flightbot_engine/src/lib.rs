#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Turn-based dialog orchestration.
//!
//! Conversations are driven one turn at a time: the router receives a single
//! utterance, the engine resumes whichever prompt is suspended at the top of
//! the persisted dialog stack, runs step-sequence dialogs until the next
//! prompt suspends the turn (or the stack empties), and the accumulated state
//! is flushed once at the end.
//!
//! # Layers
//! - `prompt` — the prompt/validate unit that suspends a turn
//! - `dialog` — step-sequence dialog definitions and the step contract
//! - `stack` — the persisted arena of active dialog instances
//! - `engine` — push/continue/replace/cancel over the stack
//! - `router` — per-turn entry point, interruption keywords, state flush

mod dialog;
mod engine;
mod error;
mod prompt;
mod result;
mod router;
mod stack;

pub use dialog::{DialogDefinition, DialogRegistry, StepAction, StepContext, StepFn};
pub use engine::{DialogEngine, TurnStatus};
pub use error::DialogError;
pub use prompt::{
    resolve_dates, DateValidator, PromptHandler, PromptSpec, PromptState, RecognizerKind,
    TextValidator, Validation,
};
pub use result::StepResult;
pub use router::{Interruption, Interruptions, RouterOptions, TurnError, TurnRouter};
pub use stack::{DialogInstance, DialogStack, StepCursor};
