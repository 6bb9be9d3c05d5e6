mod answer;
mod bank;
mod builtin;
mod ids;
mod question;
mod saved;

pub use ids::QuestionId;

pub use answer::{AnswerError, AnswerRecord};
pub use bank::{BankError, QuestionBank};
pub use question::{Difficulty, ParseDifficultyError, Question, QuestionError};
pub use saved::{SavedSession, SavedSessionError};
