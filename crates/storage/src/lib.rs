#![forbid(unsafe_code)]

mod codec;
pub mod repository;
pub mod sqlite;

pub use codec::{decode_saved_session, encode_saved_session};
pub use repository::{InMemorySessionStore, SAVED_SESSION_KEY, SessionStore, Storage, StorageError};
