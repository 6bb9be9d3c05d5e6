use std::fmt;
use std::mem;
use std::sync::Arc;

use quiz_core::model::{Difficulty, QuestionBank};
use storage::repository::SessionStore;

use super::progress::SessionProgress;
use super::service::{AdvanceOutcome, QuizSession, SessionResult, SubmitOutcome};
use super::view::{ResultsView, SharePayload};
use crate::error::SessionError;

//
// ─── STAGES ────────────────────────────────────────────────────────────────────
//

/// Where the player is, with the data that only exists in that stage.
#[derive(Debug, Clone)]
pub enum Stage {
    Start,
    DifficultySelect,
    Playing(QuizSession),
    Finished(SessionResult),
    Review(SessionResult),
}

impl Stage {
    #[must_use]
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Start => StageKind::Start,
            Stage::DifficultySelect => StageKind::DifficultySelect,
            Stage::Playing(_) => StageKind::Playing,
            Stage::Finished(_) => StageKind::Finished,
            Stage::Review(_) => StageKind::Review,
        }
    }
}

/// Data-free tag of a [`Stage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Start,
    DifficultySelect,
    Playing,
    Finished,
    Review,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StageKind::Start => "start",
            StageKind::DifficultySelect => "difficulty-select",
            StageKind::Playing => "playing",
            StageKind::Finished => "finished",
            StageKind::Review => "review",
        };
        f.write_str(name)
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives one player through the quiz and keeps the saved-session slot in step.
///
/// Events are methods taking `&mut self`, so each one runs to completion
/// before the next is accepted. A rejected event returns an error and leaves
/// the stage untouched. Store failures are logged and swallowed; the quiz
/// carries on in memory.
pub struct SessionController {
    bank: Arc<QuestionBank>,
    store: Arc<dyn SessionStore>,
    stage: Stage,
    has_saved: bool,
}

impl SessionController {
    /// Create a controller in the `Start` stage, probing the store for a
    /// resumable session.
    pub async fn new(bank: Arc<QuestionBank>, store: Arc<dyn SessionStore>) -> Self {
        let has_saved = match store.load().await {
            Ok(saved) => saved.is_some(),
            Err(err) => {
                tracing::warn!(error = %err, "saved session store unavailable");
                false
            }
        };
        Self {
            bank,
            store,
            stage: Stage::Start,
            has_saved,
        }
    }

    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    #[must_use]
    pub fn stage_kind(&self) -> StageKind {
        self.stage.kind()
    }

    #[must_use]
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// Whether a resumable session was last seen in the store.
    #[must_use]
    pub fn has_saved_session(&self) -> bool {
        self.has_saved
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        match &self.stage {
            Stage::Playing(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn result(&self) -> Option<&SessionResult> {
        match &self.stage {
            Stage::Finished(result) | Stage::Review(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session().map(QuizSession::progress)
    }

    #[must_use]
    pub fn results(&self) -> Option<ResultsView> {
        self.result().map(ResultsView::from_result)
    }

    #[must_use]
    pub fn share_payload(&self) -> Option<SharePayload> {
        self.result().map(SharePayload::from_result)
    }

    fn reject(&self, event: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            stage: self.stage.kind(),
            event,
        }
    }

    fn enter(&mut self, stage: Stage) {
        tracing::debug!(stage = %stage.kind(), "entered stage");
        self.stage = stage;
    }

    // ─── Start / difficulty selection ──────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside the `Start` stage.
    pub fn begin_selection(&mut self) -> Result<(), SessionError> {
        if !matches!(self.stage, Stage::Start) {
            return Err(self.reject("begin_selection"));
        }
        self.enter(Stage::DifficultySelect);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `DifficultySelect`.
    pub fn back(&mut self) -> Result<(), SessionError> {
        if !matches!(self.stage, Stage::DifficultySelect) {
            return Err(self.reject("back"));
        }
        self.enter(Stage::Start);
        Ok(())
    }

    /// Start a fresh session over `difficulty`.
    ///
    /// A difficulty without questions finishes straight away with 0 of 0 and
    /// leaves the saved slot alone, since nothing of this session was saved.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `DifficultySelect`.
    pub fn choose_difficulty(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        if !matches!(self.stage, Stage::DifficultySelect) {
            return Err(self.reject("choose_difficulty"));
        }

        let session = QuizSession::start(&self.bank, difficulty);
        tracing::debug!(%difficulty, questions = session.total_questions(), "session started");

        if session.is_exhausted() {
            self.enter(Stage::Finished(session.finish()));
        } else {
            self.enter(Stage::Playing(session));
        }
        Ok(())
    }

    /// Continue the saved session.
    ///
    /// A saved record that no longer fits the bank is cleared and reported as
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Start` and
    /// `SessionError::NoSavedSession` if nothing resumable is stored.
    pub async fn resume(&mut self) -> Result<(), SessionError> {
        if !matches!(self.stage, Stage::Start) {
            return Err(self.reject("resume"));
        }

        let saved = match self.store.load().await {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(error = %err, "could not read saved session");
                None
            }
        };
        let Some(saved) = saved else {
            self.discard_saved().await;
            self.has_saved = false;
            return Err(SessionError::NoSavedSession);
        };

        match QuizSession::from_saved(&self.bank, saved) {
            Ok(session) => {
                tracing::debug!(
                    difficulty = %session.difficulty(),
                    current_index = session.current_index(),
                    "session resumed"
                );
                self.enter(Stage::Playing(session));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding saved session");
                self.discard_saved().await;
                Err(SessionError::NoSavedSession)
            }
        }
    }

    /// Throw away the saved session without playing it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Start`.
    pub async fn abandon_saved(&mut self) -> Result<(), SessionError> {
        if !matches!(self.stage, Stage::Start) {
            return Err(self.reject("abandon_saved"));
        }
        self.discard_saved().await;
        Ok(())
    }

    // ─── Playing ───────────────────────────────────────────────────────────────

    /// Answer the current question. Repeats before `advance` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Playing` and
    /// `SessionError::InvalidOption` for an out-of-range option.
    pub fn submit_answer(&mut self, option: usize) -> Result<SubmitOutcome, SessionError> {
        let Stage::Playing(session) = &mut self.stage else {
            return Err(self.reject("submit_answer"));
        };
        let outcome = session.submit_answer(option)?;
        if let SubmitOutcome::Accepted(pending) = outcome {
            tracing::debug!(
                current_index = session.current_index(),
                option,
                correct = pending.is_correct,
                "answer recorded"
            );
        }
        Ok(outcome)
    }

    /// Move past the answered question, saving progress or, after the last
    /// question, clearing the saved slot and finishing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Playing` and
    /// `SessionError::NoPendingAnswer` if the question is unanswered.
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        let Stage::Playing(session) = &mut self.stage else {
            return Err(self.reject("advance"));
        };

        match session.advance()? {
            AdvanceOutcome::Next => {
                let snapshot = session.snapshot()?;
                self.persist(&snapshot).await;
                Ok(AdvanceOutcome::Next)
            }
            AdvanceOutcome::Finished => {
                self.discard_saved().await;
                if let Stage::Playing(session) = mem::replace(&mut self.stage, Stage::Start) {
                    self.enter(Stage::Finished(session.finish()));
                }
                Ok(AdvanceOutcome::Finished)
            }
        }
    }

    // ─── Finished / review ─────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Finished` and
    /// `SessionError::NoMistakes` when every answer was correct.
    pub fn review_mistakes(&mut self) -> Result<(), SessionError> {
        match mem::replace(&mut self.stage, Stage::Start) {
            Stage::Finished(result) if result.has_mistakes() => {
                self.enter(Stage::Review(result));
                Ok(())
            }
            Stage::Finished(result) => {
                self.stage = Stage::Finished(result);
                Err(SessionError::NoMistakes)
            }
            other => {
                self.stage = other;
                Err(self.reject("review_mistakes"))
            }
        }
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Review`.
    pub fn back_to_results(&mut self) -> Result<(), SessionError> {
        match mem::replace(&mut self.stage, Stage::Start) {
            Stage::Review(result) => {
                self.enter(Stage::Finished(result));
                Ok(())
            }
            other => {
                self.stage = other;
                Err(self.reject("back_to_results"))
            }
        }
    }

    /// Drop the finished session and return to `Start`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` outside `Finished`.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        if !matches!(self.stage, Stage::Finished(_)) {
            return Err(self.reject("restart"));
        }
        self.enter(Stage::Start);
        Ok(())
    }

    // ─── Persistence ───────────────────────────────────────────────────────────

    async fn persist(&mut self, snapshot: &quiz_core::model::SavedSession) {
        match self.store.save(snapshot).await {
            Ok(()) => self.has_saved = true,
            Err(err) => {
                tracing::warn!(error = %err, "could not save session; continuing in memory");
            }
        }
    }

    async fn discard_saved(&mut self) {
        match self.store.clear().await {
            Ok(()) => self.has_saved = false,
            Err(err) => tracing::warn!(error = %err, "could not clear saved session"),
        }
    }
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("stage", &self.stage.kind())
            .field("bank_len", &self.bank.len())
            .field("has_saved", &self.has_saved)
            .finish_non_exhaustive()
    }
}
