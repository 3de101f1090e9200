//! Typed, conversation-scoped access to the durable store.
//!
//! The accessor snapshots the conversation's slots when the turn starts,
//! serves typed reads from that snapshot plus any writes staged during the
//! turn, and flushes all staged writes in one commit after the turn router
//! finishes. A default constructed by `get_or_default` is never persisted on
//! its own; only slots passed to `set` reach the store.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::store::StateStore;

/// Named slots that make up one conversation's state.
pub mod slots {
    /// The persisted dialog stack.
    pub const DIALOG_STATE: &str = "DialogState";
    /// Flight reservation in progress.
    pub const FLIGHT_INFO: &str = "FlightInfo";
    /// Car rental in progress.
    pub const RENTAL_INFO: &str = "RentalInfo";
    /// All confirmed reservations.
    pub const RESERVATION_CATALOG: &str = "ReservationCatalog";

    pub(crate) const ALL: [&str; 4] =
        [DIALOG_STATE, FLIGHT_INFO, RENTAL_INFO, RESERVATION_CATALOG];
}

/// Errors raised at the state boundary.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("state store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("state serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Per-conversation, per-turn state accessor.
pub struct StateAccessor {
    store: Arc<dyn StateStore>,
    conversation_id: String,
    loaded: HashMap<&'static str, serde_json::Value>,
    staged: HashMap<&'static str, serde_json::Value>,
}

impl StateAccessor {
    /// Snapshot the conversation's slots for one turn.
    pub async fn load(
        store: Arc<dyn StateStore>,
        conversation_id: &str,
    ) -> Result<Self, StateError> {
        let mut loaded = HashMap::new();
        for slot in slots::ALL {
            let key = slot_key(conversation_id, slot);
            if let Some(bytes) = store.get(&key).await.map_err(StateError::Store)? {
                loaded.insert(slot, serde_json::from_slice(&bytes)?);
            }
        }
        debug!(conversation_id, slots = loaded.len(), "loaded conversation state");

        Ok(Self {
            store,
            conversation_id: conversation_id.to_string(),
            loaded,
            staged: HashMap::new(),
        })
    }

    #[must_use]
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Read a slot, falling back to the supplied default. The default is not
    /// persisted; it only exists in memory until `set` stages it.
    pub fn get_or_else<T, F>(&self, slot: &'static str, default: F) -> Result<T, StateError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let value = self.staged.get(slot).or_else(|| self.loaded.get(slot));
        value.map_or_else(
            || Ok(default()),
            |v| serde_json::from_value(v.clone()).map_err(StateError::Serialize),
        )
    }

    /// Read a slot, falling back to `T::default()`.
    pub fn get_or_default<T>(&self, slot: &'static str) -> Result<T, StateError>
    where
        T: DeserializeOwned + Default,
    {
        self.get_or_else(slot, T::default)
    }

    /// Stage a write; later reads of the same turn observe it immediately.
    pub fn set<T: Serialize>(&mut self, slot: &'static str, value: &T) -> Result<(), StateError> {
        self.staged.insert(slot, serde_json::to_value(value)?);
        Ok(())
    }

    /// Commit every staged write. Called exactly once per turn, after the
    /// turn router finishes; a store failure here fails the whole turn.
    pub async fn flush(&mut self) -> Result<(), StateError> {
        let mut written = 0usize;
        for (slot, value) in std::mem::take(&mut self.staged) {
            let key = slot_key(&self.conversation_id, slot);
            let bytes = serde_json::to_vec(&value)?;
            self.store
                .set(&key, bytes)
                .await
                .map_err(StateError::Store)?;
            self.loaded.insert(slot, value);
            written += 1;
        }
        debug!(
            conversation_id = %self.conversation_id,
            written,
            "flushed conversation state"
        );
        Ok(())
    }
}

fn slot_key(conversation_id: &str, slot: &str) -> String {
    format!("{conversation_id}/{slot}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    /// Store whose writes always fail.
    struct FailingStore;

    #[async_trait]
    impl StateStore for FailingStore {
        async fn get(&self, _key: &str) -> anyhow::Result<Option<Vec<u8>>> {
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: Vec<u8>) -> anyhow::Result<()> {
            anyhow::bail!("store unreachable")
        }
    }

    #[tokio::test]
    async fn test_default_is_not_persisted() {
        let store = Arc::new(MemoryStore::new());

        let mut accessor = StateAccessor::load(store.clone(), "conv").await.unwrap();
        let value: Vec<String> = accessor.get_or_default(slots::FLIGHT_INFO).unwrap();
        assert!(value.is_empty());
        accessor.flush().await.unwrap();

        // A fresh accessor still sees nothing persisted.
        let fresh = StateAccessor::load(store, "conv").await.unwrap();
        assert!(fresh.loaded.is_empty());
    }

    #[tokio::test]
    async fn test_staged_writes_visible_and_flushed() {
        let store = Arc::new(MemoryStore::new());

        let mut accessor = StateAccessor::load(store.clone(), "conv").await.unwrap();
        accessor
            .set(slots::FLIGHT_INFO, &vec!["Warsaw".to_string()])
            .unwrap();

        // Reads within the turn observe the staged value.
        let staged: Vec<String> = accessor.get_or_default(slots::FLIGHT_INFO).unwrap();
        assert_eq!(staged, vec!["Warsaw".to_string()]);

        accessor.flush().await.unwrap();

        // The next turn loads what was committed.
        let next = StateAccessor::load(store, "conv").await.unwrap();
        let loaded: Vec<String> = next.get_or_default(slots::FLIGHT_INFO).unwrap();
        assert_eq!(loaded, vec!["Warsaw".to_string()]);
    }

    #[tokio::test]
    async fn test_conversations_are_scoped() {
        let store = Arc::new(MemoryStore::new());

        let mut first = StateAccessor::load(store.clone(), "a").await.unwrap();
        first.set(slots::RENTAL_INFO, &7u32).unwrap();
        first.flush().await.unwrap();

        let other = StateAccessor::load(store, "b").await.unwrap();
        let value: u32 = other.get_or_default(slots::RENTAL_INFO).unwrap();
        assert_eq!(value, 0);
    }

    #[tokio::test]
    async fn test_flush_failure_surfaces() {
        let mut accessor = StateAccessor::load(Arc::new(FailingStore), "conv")
            .await
            .unwrap();
        accessor.set(slots::RESERVATION_CATALOG, &1u32).unwrap();

        let err = accessor.flush().await.unwrap_err();
        assert!(matches!(err, StateError::Store(_)));
    }
}
