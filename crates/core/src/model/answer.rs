use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("option {selected} is out of range for {options} options")]
    OptionOutOfRange { selected: usize, options: usize },

    #[error("recorded correctness for question {question_id} does not match its answer key")]
    CorrectnessMismatch { question_id: QuestionId },
}

/// One answered question. `is_correct` is fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AnswerRecordWire", into = "AnswerRecordWire")]
pub struct AnswerRecord {
    question: Question,
    selected_option: usize,
    is_correct: bool,
}

impl AnswerRecord {
    /// Record `selected` as the answer to `question`.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError::OptionOutOfRange` if `selected` is not an option index.
    pub fn new(question: Question, selected: usize) -> Result<Self, AnswerError> {
        if !question.is_valid_option(selected) {
            return Err(AnswerError::OptionOutOfRange {
                selected,
                options: question.options().len(),
            });
        }
        let is_correct = question.is_correct(selected);
        Ok(Self {
            question,
            selected_option: selected,
            is_correct,
        })
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    /// Text of the option the user picked.
    #[must_use]
    pub fn selected_text(&self) -> &str {
        &self.question.options()[self.selected_option]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRecordWire {
    question: Question,
    selected_option: usize,
    is_correct: bool,
}

impl TryFrom<AnswerRecordWire> for AnswerRecord {
    type Error = AnswerError;

    fn try_from(wire: AnswerRecordWire) -> Result<Self, Self::Error> {
        let question_id = wire.question.id();
        let record = AnswerRecord::new(wire.question, wire.selected_option)?;
        if record.is_correct != wire.is_correct {
            return Err(AnswerError::CorrectnessMismatch { question_id });
        }
        Ok(record)
    }
}

impl From<AnswerRecord> for AnswerRecordWire {
    fn from(record: AnswerRecord) -> Self {
        Self {
            question: record.question,
            selected_option: record.selected_option,
            is_correct: record.is_correct,
        }
    }
}
