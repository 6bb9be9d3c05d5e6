use quiz_core::model::SavedSession;

use crate::repository::StorageError;

/// Encode a snapshot into the JSON payload kept in the saved-session slot.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the snapshot cannot be encoded.
pub fn encode_saved_session(saved: &SavedSession) -> Result<String, StorageError> {
    serde_json::to_string(saved).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decode a stored payload. Anything that does not parse into a consistent
/// snapshot is reported as absent.
#[must_use]
pub fn decode_saved_session(payload: &str) -> Option<SavedSession> {
    match serde_json::from_str::<SavedSession>(payload) {
        Ok(saved) => Some(saved),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed saved session");
            None
        }
    }
}
