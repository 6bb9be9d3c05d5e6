use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer::AnswerRecord;
use crate::model::ids::QuestionId;
use crate::model::question::Difficulty;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SavedSessionError {
    #[error("saved index {current_index} does not match {answers} recorded answers")]
    AnswerCountMismatch { current_index: usize, answers: usize },

    #[error("saved score {score} does not match {correct} correct answers")]
    ScoreMismatch { score: usize, correct: usize },

    #[error("question {question_id} does not belong to difficulty {difficulty}")]
    DifficultyMismatch {
        question_id: QuestionId,
        difficulty: Difficulty,
    },
}

/// Snapshot of an in-progress session taken between questions.
///
/// There is never a pending answer in a snapshot: `answers.len()` always
/// equals `current_index`, and `score` always equals the number of correct
/// answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SavedSessionWire", into = "SavedSessionWire")]
pub struct SavedSession {
    current_index: usize,
    score: usize,
    difficulty: Difficulty,
    answers: Vec<AnswerRecord>,
}

impl SavedSession {
    /// Build a snapshot, checking that the counters agree with the answers.
    ///
    /// # Errors
    ///
    /// Returns `SavedSessionError` if the index, score, or answer difficulties
    /// are inconsistent.
    pub fn new(
        current_index: usize,
        score: usize,
        difficulty: Difficulty,
        answers: Vec<AnswerRecord>,
    ) -> Result<Self, SavedSessionError> {
        if answers.len() != current_index {
            return Err(SavedSessionError::AnswerCountMismatch {
                current_index,
                answers: answers.len(),
            });
        }

        let correct = answers.iter().filter(|a| a.is_correct()).count();
        if correct != score {
            return Err(SavedSessionError::ScoreMismatch { score, correct });
        }

        if let Some(stray) = answers
            .iter()
            .find(|a| a.question().difficulty() != difficulty)
        {
            return Err(SavedSessionError::DifficultyMismatch {
                question_id: stray.question().id(),
                difficulty,
            });
        }

        Ok(Self {
            current_index,
            score,
            difficulty,
            answers,
        })
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn into_answers(self) -> Vec<AnswerRecord> {
        self.answers
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedSessionWire {
    current_index: usize,
    score: usize,
    difficulty: Difficulty,
    #[serde(default)]
    answers: Vec<AnswerRecord>,
}

impl TryFrom<SavedSessionWire> for SavedSession {
    type Error = SavedSessionError;

    fn try_from(wire: SavedSessionWire) -> Result<Self, Self::Error> {
        SavedSession::new(wire.current_index, wire.score, wire.difficulty, wire.answers)
    }
}

impl From<SavedSession> for SavedSessionWire {
    fn from(saved: SavedSession) -> Self {
        Self {
            current_index: saved.current_index,
            score: saved.score,
            difficulty: saved.difficulty,
            answers: saved.answers,
        }
    }
}
