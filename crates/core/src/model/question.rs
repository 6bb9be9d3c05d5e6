use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id must be > 0")]
    ZeroId,

    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs at least 2 options, got {count}")]
    TooFewOptions { count: usize },

    #[error("option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct answer {index} is out of range for {options} options")]
    CorrectAnswerOutOfRange { index: usize, options: usize },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty band used to partition the question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown difficulty: {0}")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question.
///
/// Always holds at least two options and a `correct_answer` that indexes one
/// of them. Deserialization runs the same validation as [`Question::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
    difficulty: Difficulty,
    explanation: Option<String>,
    emoji: Option<String>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id is zero, the text or an option is
    /// blank, there are fewer than two options, or `correct_answer` does not
    /// index an option.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        difficulty: Difficulty,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        if id.value() == 0 {
            return Err(QuestionError::ZeroId);
        }

        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                options: options.len(),
            });
        }

        let explanation = explanation.filter(|e| !e.trim().is_empty());

        Ok(Self {
            id,
            text,
            options,
            correct_answer,
            difficulty,
            explanation,
            emoji: None,
        })
    }

    /// Attach a decorative emoji; blank values are ignored.
    #[must_use]
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        let emoji = emoji.into();
        self.emoji = (!emoji.trim().is_empty()).then_some(emoji);
        self
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    #[must_use]
    pub fn emoji(&self) -> Option<&str> {
        self.emoji.as_deref()
    }

    #[must_use]
    pub fn is_valid_option(&self, index: usize) -> bool {
        index < self.options.len()
    }

    #[must_use]
    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_answer
    }
}

/// Wire shape of a question (bank files and saved sessions).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    id: u64,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
    difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    emoji: Option<String>,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let question = Question::new(
            QuestionId::new(record.id),
            record.text,
            record.options,
            record.correct_answer,
            record.difficulty,
            record.explanation,
        )?;
        Ok(match record.emoji {
            Some(emoji) => question.with_emoji(emoji),
            None => question,
        })
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        Self {
            id: question.id.value(),
            text: question.text,
            options: question.options,
            correct_answer: question.correct_answer,
            difficulty: question.difficulty,
            explanation: question.explanation,
            emoji: question.emoji,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn rejects_out_of_range_correct_answer() {
        let err = Question::new(
            QuestionId::new(1),
            "Q",
            opts(&["a", "b"]),
            2,
            Difficulty::Easy,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectAnswerOutOfRange {
                index: 2,
                options: 2
            }
        );
    }

    #[test]
    fn rejects_single_option_and_zero_id() {
        let err =
            Question::new(QuestionId::new(1), "Q", opts(&["a"]), 0, Difficulty::Easy, None)
                .unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { count: 1 });

        let err = Question::new(
            QuestionId::new(0),
            "Q",
            opts(&["a", "b"]),
            0,
            Difficulty::Easy,
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::ZeroId);
    }

    #[test]
    fn blank_explanation_is_dropped() {
        let q = Question::new(
            QuestionId::new(1),
            "Q",
            opts(&["a", "b"]),
            1,
            Difficulty::Hard,
            Some("  ".into()),
        )
        .unwrap();
        assert_eq!(q.explanation(), None);
        assert_eq!(q.correct_option(), "b");
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn deserialization_validates() {
        let json = r#"{"id":4,"text":"Q","options":["a","b"],"correctAnswer":5,"difficulty":"easy"}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());

        let json = r#"{"id":4,"text":"Q","options":["a","b"],"correctAnswer":1,"difficulty":"medium","explanation":"why"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.id(), QuestionId::new(4));
        assert_eq!(q.difficulty(), Difficulty::Medium);
        assert_eq!(q.explanation(), Some("why"));
    }

    #[test]
    fn emoji_is_optional_on_the_wire() {
        let json = r#"{"id":2,"text":"Q","options":["a","b"],"correctAnswer":0,"difficulty":"easy","emoji":"🤖"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.emoji(), Some("🤖"));
        assert!(serde_json::to_string(&q).unwrap().contains("\"emoji\":\"🤖\""));

        let plain = q.clone().with_emoji(" ");
        assert_eq!(plain.emoji(), None);
        assert!(!serde_json::to_string(&plain).unwrap().contains("emoji"));
    }

    #[test]
    fn difficulty_parses_case_insensitively() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }
}
