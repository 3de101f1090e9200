use flightbot_state::StateError;
use thiserror::Error;

/// Errors raised while driving dialogs.
///
/// Validation failures are not errors; they are handled inside the prompt
/// unit by re-prompting. Everything here either indicates a misassembled
/// dialog set (caught at registration or on first use) or a fault inside a
/// step, which the turn router converts into a generic apology.
#[derive(Debug, Error)]
pub enum DialogError {
    #[error("dialog `{0}` is not registered")]
    UnknownDialog(String),

    #[error("dialog `{0}` is already registered")]
    DuplicateDialog(String),

    #[error("prompt `{0}` is not registered for dialog `{1}`")]
    UnknownPrompt(String, String),

    #[error("prompt `{0}` does not accept {1} input")]
    PromptKindMismatch(String, &'static str),

    #[error("step result mismatch: expected {expected}, got {got}")]
    ResultShape {
        expected: &'static str,
        got: &'static str,
    },

    #[error("no dialog is waiting for input")]
    NoActivePrompt,

    #[error(transparent)]
    State(#[from] StateError),
}
