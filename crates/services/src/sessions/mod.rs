mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use service::{AdvanceOutcome, PendingAnswer, QuizSession, SessionResult, SubmitOutcome};
pub use view::{MistakeItem, ResultsView, SharePayload, tier_message};
pub use workflow::{SessionController, Stage, StageKind};
