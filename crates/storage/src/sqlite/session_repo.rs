use async_trait::async_trait;
use quiz_core::model::SavedSession;
use sqlx::Row;

use super::SqliteRepository;
use crate::codec::{decode_saved_session, encode_saved_session};
use crate::repository::{SAVED_SESSION_KEY, SessionStore, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl SessionStore for SqliteRepository {
    async fn save(&self, snapshot: &SavedSession) -> Result<(), StorageError> {
        let payload = encode_saved_session(snapshot)?;

        sqlx::query(
            r"
            INSERT INTO saved_sessions (slot, payload, saved_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(slot) DO UPDATE SET
                payload = excluded.payload,
                saved_at = excluded.saved_at
            ",
        )
        .bind(SAVED_SESSION_KEY)
        .bind(payload)
        .bind(self.clock.now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        tracing::debug!(
            current_index = snapshot.current_index(),
            score = snapshot.score(),
            "saved session written"
        );
        Ok(())
    }

    async fn load(&self) -> Result<Option<SavedSession>, StorageError> {
        let row = sqlx::query("SELECT payload FROM saved_sessions WHERE slot = ?1")
            .bind(SAVED_SESSION_KEY)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let decoded = match row.try_get::<String, _>("payload") {
            Ok(payload) => decode_saved_session(&payload),
            Err(err) => {
                tracing::warn!(error = %err, "unreadable saved session payload");
                None
            }
        };

        if decoded.is_none() {
            self.clear().await?;
            tracing::debug!("malformed saved session removed");
        }
        Ok(decoded)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM saved_sessions WHERE slot = ?1")
            .bind(SAVED_SESSION_KEY)
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(())
    }
}
