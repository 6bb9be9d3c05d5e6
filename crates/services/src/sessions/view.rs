use serde::Serialize;

use quiz_core::model::{AnswerRecord, Difficulty, QuestionId};
use quiz_core::score::{RankTitle, ScoreTier, celebrates};

use super::service::SessionResult;

/// Presentation-agnostic results of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub difficulty: Difficulty,
    pub score: usize,
    pub total: usize,
    pub percentage: f64,
    pub tier: ScoreTier,
    pub rank: RankTitle,
    pub mistakes: Vec<MistakeItem>,
}

impl ResultsView {
    #[must_use]
    pub fn from_result(result: &SessionResult) -> Self {
        Self {
            difficulty: result.difficulty(),
            score: result.score(),
            total: result.total(),
            percentage: result.percentage(),
            tier: result.tier(),
            rank: RankTitle::for_score(result.score(), result.total()),
            mistakes: result.mistakes().map(MistakeItem::from_answer).collect(),
        }
    }

    /// Strictly more than half correct.
    #[must_use]
    pub fn celebrates(&self) -> bool {
        celebrates(self.score, self.total)
    }

    #[must_use]
    pub fn can_review(&self) -> bool {
        !self.mistakes.is_empty()
    }
}

/// One incorrectly answered question, for the review screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MistakeItem {
    pub question_id: QuestionId,
    pub question: String,
    pub selected: String,
    pub correct: String,
    pub explanation: Option<String>,
    pub emoji: Option<String>,
}

impl MistakeItem {
    #[must_use]
    pub fn from_answer(answer: &AnswerRecord) -> Self {
        let question = answer.question();
        Self {
            question_id: question.id(),
            question: question.text().to_owned(),
            selected: answer.selected_text().to_owned(),
            correct: question.correct_option().to_owned(),
            explanation: question.explanation().map(str::to_owned),
            emoji: question.emoji().map(str::to_owned),
        }
    }
}

/// Congratulatory line for a tier.
#[must_use]
pub fn tier_message(tier: ScoreTier) -> &'static str {
    match tier {
        ScoreTier::Top => "Amazing! You are a future tech genius!",
        ScoreTier::High => "Great work! You are on your way to becoming an expert!",
        ScoreTier::Mid => "Very good! You know a lot, keep learning!",
        ScoreTier::Low => "Nice try! Every expert started as a beginner.",
    }
}

/// What gets handed to the share/export integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharePayload {
    pub score: usize,
    pub total: usize,
    pub tier: &'static str,
    pub message: &'static str,
}

impl SharePayload {
    #[must_use]
    pub fn from_result(result: &SessionResult) -> Self {
        let tier = result.tier();
        Self {
            score: result.score(),
            total: result.total(),
            tier: tier.as_str(),
            message: tier_message(tier),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        format!(
            "I scored {} out of {} in the tech explorer quiz! Can you beat my score?",
            self.score, self.total
        )
    }

    /// # Errors
    ///
    /// Returns `serde_json::Error` if encoding fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
