//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SavedSessionError;

use crate::sessions::StageKind;

/// Errors emitted by the quiz session and its controller.
///
/// None of these are fatal: a rejected event leaves the session untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("`{event}` is not allowed in the {stage} stage")]
    InvalidTransition { stage: StageKind, event: &'static str },
    #[error("option {index} is out of range for {options} options")]
    InvalidOption { index: usize, options: usize },
    #[error("no answer has been submitted for the current question")]
    NoPendingAnswer,
    #[error("every question has already been answered")]
    Completed,
    #[error("no saved session to resume")]
    NoSavedSession,
    #[error("no incorrect answers to review")]
    NoMistakes,
    #[error("saved session does not match the question bank: {0}")]
    SavedMismatch(String),
    #[error(transparent)]
    Snapshot(#[from] SavedSessionError),
}
