//! The persisted dialog stack.
//!
//! Active dialog instances live in an arena-style `Vec`, innermost last.
//! Cyclic transitions (a dialog replacing itself forever) therefore never
//! grow the native call stack. The whole structure serializes losslessly so
//! a conversation can resume from storage on any turn.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::prompt::PromptState;

/// Position of a dialog instance within its step list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepCursor {
    /// Pushed but no step has run yet.
    NotStarted,
    /// The step currently running or suspended.
    At(usize),
}

impl StepCursor {
    #[must_use]
    pub const fn index(self) -> Option<usize> {
        match self {
            Self::NotStarted => None,
            Self::At(index) => Some(index),
        }
    }
}

/// One active dialog on the stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogInstance {
    pub dialog_id: String,
    pub cursor: StepCursor,
    /// Present while a prompt of this instance is waiting for input.
    pub prompt: Option<PromptState>,
    /// Instance-local scratch values, discarded on replace.
    pub values: HashMap<String, serde_json::Value>,
}

impl DialogInstance {
    #[must_use]
    pub fn new(dialog_id: impl Into<String>) -> Self {
        Self {
            dialog_id: dialog_id.into(),
            cursor: StepCursor::NotStarted,
            prompt: None,
            values: HashMap::new(),
        }
    }

    /// Move the cursor forward by exactly one step.
    pub const fn advance(&mut self) {
        self.cursor = match self.cursor {
            StepCursor::NotStarted => StepCursor::At(0),
            StepCursor::At(index) => StepCursor::At(index + 1),
        };
    }
}

/// Ordered set of active dialog instances, innermost last.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogStack {
    frames: Vec<DialogInstance>,
}

impl DialogStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instance: DialogInstance) {
        self.frames.push(instance);
    }

    pub fn pop(&mut self) -> Option<DialogInstance> {
        self.frames.pop()
    }

    #[must_use]
    pub fn top(&self) -> Option<&DialogInstance> {
        self.frames.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut DialogInstance> {
        self.frames.last_mut()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Remove every instance unconditionally.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    #[must_use]
    pub fn frames(&self) -> &[DialogInstance] {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_moves_forward_by_one() {
        let mut instance = DialogInstance::new("menu");
        assert_eq!(instance.cursor, StepCursor::NotStarted);

        instance.advance();
        assert_eq!(instance.cursor, StepCursor::At(0));

        instance.advance();
        assert_eq!(instance.cursor, StepCursor::At(1));
    }

    #[test]
    fn test_stack_order() {
        let mut stack = DialogStack::new();
        stack.push(DialogInstance::new("root"));
        stack.push(DialogInstance::new("child"));

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.top().map(|f| f.dialog_id.as_str()), Some("child"));

        let popped = stack.pop();
        assert_eq!(popped.map(|f| f.dialog_id), Some("child".to_string()));
        assert_eq!(stack.top().map(|f| f.dialog_id.as_str()), Some("root"));
    }

    #[test]
    fn test_stack_serde_roundtrip() {
        let mut stack = DialogStack::new();
        let mut instance = DialogInstance::new("flight");
        instance.advance();
        instance
            .values
            .insert("request_id".to_string(), serde_json::json!(2_345_671));
        stack.push(instance);

        let json = serde_json::to_string(&stack).unwrap();
        let back: DialogStack = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), 1);
        let frame = back.top().unwrap();
        assert_eq!(frame.dialog_id, "flight");
        assert_eq!(frame.cursor, StepCursor::At(0));
        assert_eq!(
            frame.values.get("request_id"),
            Some(&serde_json::json!(2_345_671))
        );
    }
}
