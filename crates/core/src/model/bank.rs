use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{Difficulty, Question};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("duplicate question id {0}")]
    DuplicateId(QuestionId),

    #[error("invalid question bank: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only, ordered collection of questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `BankError::DuplicateId` if two questions share an id.
    pub fn new(questions: Vec<Question>) -> Result<Self, BankError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            if !seen.insert(q.id()) {
                return Err(BankError::DuplicateId(q.id()));
            }
        }
        Ok(Self { questions })
    }

    /// Parse a JSON array of questions.
    ///
    /// # Errors
    ///
    /// Returns `BankError::Parse` for malformed JSON or invalid questions and
    /// `BankError::DuplicateId` for repeated ids.
    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let questions: Vec<Question> = serde_json::from_str(raw)?;
        Self::new(questions)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Questions of one difficulty, in bank order.
    #[must_use]
    pub fn filter(&self, difficulty: Difficulty) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.difficulty() == difficulty)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn count(&self, difficulty: Difficulty) -> usize {
        self.questions
            .iter()
            .filter(|q| q.difficulty() == difficulty)
            .count()
    }
}
