use async_trait::async_trait;
use quiz_core::model::SavedSession;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::codec::{decode_saved_session, encode_saved_session};

/// Well-known key of the single saved-session slot.
pub const SAVED_SESSION_KEY: &str = "junior-tech-quiz-save";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persistence contract for the one saved-session slot.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Overwrite the slot with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be encoded or written.
    async fn save(&self, snapshot: &SavedSession) -> Result<(), StorageError>;

    /// Read the slot.
    ///
    /// Absent and malformed records both come back as `Ok(None)`; a malformed
    /// record is removed from the slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only if the backend itself cannot be reached.
    async fn load(&self) -> Result<Option<SavedSession>, StorageError>;

    /// Empty the slot. Clearing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be reached.
    async fn clear(&self) -> Result<(), StorageError>;
}

/// In-memory slot for tests and memory-only runs.
///
/// Holds the encoded payload rather than the snapshot so that decoding goes
/// through the same path as the `SQLite` backend.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the slot with an arbitrary payload, valid or not.
    #[must_use]
    pub fn with_raw_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }

    /// Raw payload currently in the slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn raw_payload(&self) -> Result<Option<String>, StorageError> {
        let guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, snapshot: &SavedSession) -> Result<(), StorageError> {
        let payload = encode_saved_session(snapshot)?;
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(payload);
        Ok(())
    }

    async fn load(&self) -> Result<Option<SavedSession>, StorageError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let Some(payload) = guard.as_deref() else {
            return Ok(None);
        };
        let decoded = decode_saved_session(payload);
        if decoded.is_none() {
            *guard = None;
        }
        Ok(decoded)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Storage handles behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        Self { sessions }
    }
}
