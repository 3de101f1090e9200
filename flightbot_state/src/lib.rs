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

//! Per-conversation state persistence.
//!
//! The durable store is a plain key-value interface; the accessor layers
//! typed, conversation-scoped slots on top of it and stages writes so that
//! one turn commits exactly once.

mod accessor;
mod store;

pub use accessor::{slots, StateAccessor, StateError};
pub use store::{MemoryStore, StateStore};

pub type Result<T> = std::result::Result<T, StateError>;
