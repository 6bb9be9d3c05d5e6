use std::fmt;

use quiz_core::model::{AnswerRecord, Difficulty, Question, QuestionBank, SavedSession};
use quiz_core::score::{ScoreTier, percentage};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── ANSWER FEEDBACK ───────────────────────────────────────────────────────────
//

/// Answer submitted for the current question and not yet acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAnswer {
    pub selected_option: usize,
    pub is_correct: bool,
}

/// Outcome of submitting an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(PendingAnswer),
    /// The current question already has an answer; nothing changed.
    Ignored,
}

/// Outcome of moving past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Next,
    Finished,
}

//
// ─── LIVE SESSION ──────────────────────────────────────────────────────────────
//

/// A quiz in progress over one difficulty.
///
/// `score` always equals the number of correct entries in `answers`, and
/// `answers.len()` equals `current` except while an answer is pending, when
/// it is one more.
#[derive(Clone)]
pub struct QuizSession {
    difficulty: Difficulty,
    questions: Vec<Question>,
    current: usize,
    score: usize,
    answers: Vec<AnswerRecord>,
    pending: Option<PendingAnswer>,
}

impl QuizSession {
    /// Fresh session over the bank's questions for `difficulty`, in bank order.
    #[must_use]
    pub fn start(bank: &QuestionBank, difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            questions: bank.filter(difficulty),
            current: 0,
            score: 0,
            answers: Vec::new(),
            pending: None,
        }
    }

    /// Rebuild a session from a snapshot. The result never has a pending answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SavedMismatch` if the snapshot points past the
    /// end of the difficulty's questions or its answers do not line up with
    /// the bank's questions.
    pub fn from_saved(bank: &QuestionBank, saved: SavedSession) -> Result<Self, SessionError> {
        let difficulty = saved.difficulty();
        let questions = bank.filter(difficulty);
        let current = saved.current_index();

        if current >= questions.len() {
            return Err(SessionError::SavedMismatch(format!(
                "index {current} is out of range for {} {difficulty} questions",
                questions.len()
            )));
        }

        for (position, (answer, question)) in saved.answers().iter().zip(&questions).enumerate() {
            if answer.question().id() != question.id() {
                return Err(SessionError::SavedMismatch(format!(
                    "answer {position} is for question {} but the bank has {}",
                    answer.question().id(),
                    question.id()
                )));
            }
        }

        let score = saved.score();
        Ok(Self {
            difficulty,
            questions,
            current,
            score,
            answers: saved.into_answers(),
            pending: None,
        })
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn pending(&self) -> Option<PendingAnswer> {
        self.pending
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// True once every question has been advanced past.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current >= self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(
            self.current,
            self.questions.len(),
            self.answers.len(),
            self.pending.is_some(),
        )
    }

    /// Answer the current question.
    ///
    /// A second submission before [`advance`](Self::advance) is ignored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if there is no current question and
    /// `SessionError::InvalidOption` if `option` is not an option index.
    pub fn submit_answer(&mut self, option: usize) -> Result<SubmitOutcome, SessionError> {
        if self.pending.is_some() {
            return Ok(SubmitOutcome::Ignored);
        }
        let Some(question) = self.current_question() else {
            return Err(SessionError::Completed);
        };

        let record = AnswerRecord::new(question.clone(), option).map_err(|_| {
            SessionError::InvalidOption {
                index: option,
                options: question.options().len(),
            }
        })?;

        let pending = PendingAnswer {
            selected_option: option,
            is_correct: record.is_correct(),
        };
        if pending.is_correct {
            self.score += 1;
        }
        self.answers.push(record);
        self.pending = Some(pending);

        Ok(SubmitOutcome::Accepted(pending))
    }

    /// Acknowledge the pending answer and move to the next question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NoPendingAnswer` if the current question has not
    /// been answered.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        if self.pending.take().is_none() {
            return Err(SessionError::NoPendingAnswer);
        }
        self.current += 1;

        if self.is_exhausted() {
            Ok(AdvanceOutcome::Finished)
        } else {
            Ok(AdvanceOutcome::Next)
        }
    }

    /// Snapshot of the session between questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Snapshot` if the counters are inconsistent, which
    /// includes calling this while an answer is pending.
    pub fn snapshot(&self) -> Result<SavedSession, SessionError> {
        Ok(SavedSession::new(
            self.current,
            self.score,
            self.difficulty,
            self.answers.clone(),
        )?)
    }

    /// Close the session and keep only what the results screen needs.
    #[must_use]
    pub fn finish(self) -> SessionResult {
        SessionResult {
            difficulty: self.difficulty,
            total: self.questions.len(),
            score: self.score,
            answers: self.answers,
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("difficulty", &self.difficulty)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("answers_len", &self.answers.len())
            .field("pending", &self.pending)
            .finish()
    }
}

//
// ─── COMPLETED SESSION ─────────────────────────────────────────────────────────
//

/// Outcome of a finished session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResult {
    difficulty: Difficulty,
    total: usize,
    score: usize,
    answers: Vec<AnswerRecord>,
}

impl SessionResult {
    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Share of correct answers in percent; `0.0` for an empty session.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        percentage(self.score, self.total)
    }

    #[must_use]
    pub fn tier(&self) -> ScoreTier {
        ScoreTier::for_score(self.score, self.total)
    }

    pub fn mistakes(&self) -> impl Iterator<Item = &AnswerRecord> {
        self.answers.iter().filter(|a| !a.is_correct())
    }

    #[must_use]
    pub fn has_mistakes(&self) -> bool {
        self.mistakes().next().is_some()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionId;

    fn question(id: u64, correct: usize, difficulty: Difficulty) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["a".into(), "b".into(), "c".into()],
            correct,
            difficulty,
            None,
        )
        .unwrap()
    }

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            question(1, 1, Difficulty::Easy),
            question(2, 0, Difficulty::Hard),
            question(3, 0, Difficulty::Easy),
            question(4, 2, Difficulty::Easy),
        ])
        .unwrap()
    }

    fn assert_score_matches(session: &QuizSession) {
        let correct = session.answers().iter().filter(|a| a.is_correct()).count();
        assert_eq!(session.score(), correct);
    }

    #[test]
    fn start_filters_by_difficulty_in_bank_order() {
        let session = QuizSession::start(&bank(), Difficulty::Easy);
        let ids: Vec<u64> = session
            .questions()
            .iter()
            .map(|q| q.id().value())
            .collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(session.current_index(), 0);
        assert!(session.pending().is_none());
    }

    #[test]
    fn second_submission_is_ignored() {
        let mut session = QuizSession::start(&bank(), Difficulty::Easy);
        let first = session.submit_answer(1).unwrap();
        assert_eq!(
            first,
            SubmitOutcome::Accepted(PendingAnswer {
                selected_option: 1,
                is_correct: true
            })
        );

        assert_eq!(session.submit_answer(0).unwrap(), SubmitOutcome::Ignored);
        assert_eq!(session.score(), 1);
        assert_eq!(session.answers().len(), 1);
        assert_score_matches(&session);
    }

    #[test]
    fn invalid_option_leaves_state_untouched() {
        let mut session = QuizSession::start(&bank(), Difficulty::Easy);
        let err = session.submit_answer(3).unwrap_err();
        assert_eq!(err, SessionError::InvalidOption { index: 3, options: 3 });
        assert!(session.answers().is_empty());
        assert!(session.pending().is_none());
    }

    #[test]
    fn advance_requires_pending_answer() {
        let mut session = QuizSession::start(&bank(), Difficulty::Easy);
        assert_eq!(session.advance().unwrap_err(), SessionError::NoPendingAnswer);
    }

    #[test]
    fn session_advances_and_finishes() {
        let mut session = QuizSession::start(&bank(), Difficulty::Easy);

        for (expected_next, option) in [(AdvanceOutcome::Next, 1), (AdvanceOutcome::Next, 2)] {
            session.submit_answer(option).unwrap();
            assert_eq!(session.advance().unwrap(), expected_next);
            assert_eq!(session.answers().len(), session.current_index());
            assert_score_matches(&session);
        }

        session.submit_answer(2).unwrap();
        assert_eq!(session.advance().unwrap(), AdvanceOutcome::Finished);
        assert!(session.is_exhausted());
        assert!(session.current_question().is_none());
        assert_eq!(session.submit_answer(0).unwrap_err(), SessionError::Completed);

        let result = session.finish();
        assert_eq!(result.score(), 2);
        assert_eq!(result.total(), 3);
        assert_eq!(result.mistakes().count(), 1);
        assert_eq!(result.tier(), ScoreTier::Mid);
    }

    #[test]
    fn snapshot_and_restore() {
        let bank = bank();
        let mut session = QuizSession::start(&bank, Difficulty::Easy);
        session.submit_answer(1).unwrap();
        assert!(session.snapshot().is_err());
        session.advance().unwrap();

        let saved = session.snapshot().unwrap();
        let restored = QuizSession::from_saved(&bank, saved).unwrap();
        assert_eq!(restored.current_index(), 1);
        assert_eq!(restored.score(), 1);
        assert_eq!(restored.answers(), session.answers());
        assert!(restored.pending().is_none());
    }

    #[test]
    fn restore_rejects_snapshot_that_does_not_fit_bank() {
        let bank = bank();
        let mut session = QuizSession::start(&bank, Difficulty::Easy);
        session.submit_answer(0).unwrap();
        session.advance().unwrap();
        let saved = session.snapshot().unwrap();

        let smaller = QuestionBank::new(vec![question(1, 1, Difficulty::Easy)]).unwrap();
        assert!(matches!(
            QuizSession::from_saved(&smaller, saved.clone()),
            Err(SessionError::SavedMismatch(_))
        ));

        let reordered = QuestionBank::new(vec![
            question(3, 0, Difficulty::Easy),
            question(1, 1, Difficulty::Easy),
        ])
        .unwrap();
        assert!(matches!(
            QuizSession::from_saved(&reordered, saved),
            Err(SessionError::SavedMismatch(_))
        ));
    }

    #[test]
    fn empty_difficulty_yields_empty_result() {
        let session = QuizSession::start(&bank(), Difficulty::Medium);
        assert!(session.is_exhausted());
        let result = session.finish();
        assert_eq!(result.total(), 0);
        assert!(result.percentage().abs() < f64::EPSILON);
        assert!(!result.has_mistakes());
    }
}
