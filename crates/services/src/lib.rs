#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use error::SessionError;

pub use sessions::{
    AdvanceOutcome, MistakeItem, PendingAnswer, QuizSession, ResultsView, SessionController,
    SessionProgress, SessionResult, SharePayload, Stage, StageKind, SubmitOutcome, tier_message,
};
