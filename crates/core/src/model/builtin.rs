use crate::model::bank::QuestionBank;
use crate::model::ids::QuestionId;
use crate::model::question::{Difficulty, Question};

struct Entry {
    id: u64,
    text: &'static str,
    options: &'static [&'static str],
    correct: usize,
    difficulty: Difficulty,
    explanation: &'static str,
    emoji: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: 1,
        text: "Which part of a computer is often called its brain?",
        options: &["Monitor", "CPU", "Keyboard", "Speaker"],
        correct: 1,
        difficulty: Difficulty::Easy,
        explanation: "The CPU (central processing unit) carries out the instructions of programs.",
        emoji: "🧠",
    },
    Entry {
        id: 2,
        text: "Which device do you use to move the pointer on the screen?",
        options: &["Mouse", "Printer", "Microphone", "Router"],
        correct: 0,
        difficulty: Difficulty::Easy,
        explanation: "A mouse translates hand movements into pointer movements.",
        emoji: "🖱️",
    },
    Entry {
        id: 3,
        text: "What do we call a program that runs on a smartphone?",
        options: &["A cable", "A pixel", "An app", "A byte"],
        correct: 2,
        difficulty: Difficulty::Easy,
        explanation: "Apps are programs made for phones and tablets.",
        emoji: "📱",
    },
    Entry {
        id: 4,
        text: "Which of these connects computers all over the world?",
        options: &["The Internet", "A calculator", "A flashlight", "A USB stick"],
        correct: 0,
        difficulty: Difficulty::Easy,
        explanation: "The Internet is a global network of networks.",
        emoji: "🌍",
    },
    Entry {
        id: 5,
        text: "How many bits are in one byte?",
        options: &["2", "4", "8", "16"],
        correct: 2,
        difficulty: Difficulty::Medium,
        explanation: "A byte is a group of 8 bits.",
        emoji: "💾",
    },
    Entry {
        id: 6,
        text: "What does a robot use to sense the world around it?",
        options: &["Sensors", "Stickers", "Batteries only", "Paint"],
        correct: 0,
        difficulty: Difficulty::Medium,
        explanation: "Sensors measure things like light, distance and temperature.",
        emoji: "🦾",
    },
    Entry {
        id: 7,
        text: "Which language is used to structure web pages?",
        options: &["HTML", "MP3", "JPEG", "ZIP"],
        correct: 0,
        difficulty: Difficulty::Medium,
        explanation: "HTML describes the structure of a web page.",
        emoji: "🌐",
    },
    Entry {
        id: 8,
        text: "What is a strong password most likely to contain?",
        options: &[
            "Your name",
            "123456",
            "Letters, numbers and symbols",
            "Your birthday",
        ],
        correct: 2,
        difficulty: Difficulty::Medium,
        explanation: "Mixing character types makes a password much harder to guess.",
        emoji: "🔐",
    },
    Entry {
        id: 9,
        text: "Which number system do computers use internally?",
        options: &["Decimal", "Binary", "Roman numerals", "Hexagonal"],
        correct: 1,
        difficulty: Difficulty::Hard,
        explanation: "Computers store everything as 0s and 1s, which is binary.",
        emoji: "🔢",
    },
    Entry {
        id: 10,
        text: "What does AI stand for?",
        options: &[
            "Automatic Internet",
            "Artificial Intelligence",
            "Advanced Input",
            "Animated Image",
        ],
        correct: 1,
        difficulty: Difficulty::Hard,
        explanation: "Artificial Intelligence is about machines that learn and reason.",
        emoji: "🤖",
    },
    Entry {
        id: 11,
        text: "Which scientist wrote what is considered the first computer program?",
        options: &["Marie Curie", "Ada Lovelace", "Isaac Newton", "Rosalind Franklin"],
        correct: 1,
        difficulty: Difficulty::Hard,
        explanation: "Ada Lovelace wrote an algorithm for Babbage's Analytical Engine.",
        emoji: "👩‍💻",
    },
    Entry {
        id: 12,
        text: "What is an algorithm?",
        options: &[
            "A type of computer virus",
            "A step-by-step set of instructions",
            "A computer screen",
            "A video game console",
        ],
        correct: 1,
        difficulty: Difficulty::Hard,
        explanation: "An algorithm is a precise recipe for solving a problem.",
        emoji: "🧩",
    },
];

impl QuestionBank {
    /// The question bank shipped with the game.
    ///
    /// # Panics
    ///
    /// Panics if the built-in entries violate a question invariant.
    #[must_use]
    pub fn builtin() -> Self {
        let questions = ENTRIES
            .iter()
            .map(|e| {
                Question::new(
                    QuestionId::new(e.id),
                    e.text,
                    e.options.iter().map(|o| (*o).to_string()).collect(),
                    e.correct,
                    e.difficulty,
                    Some(e.explanation.to_string()),
                )
                .map(|q| q.with_emoji(e.emoji))
            })
            .collect::<Result<Vec<_>, _>>()
            .expect("built-in questions should be valid");
        QuestionBank::new(questions).expect("built-in question ids should be unique")
    }
}
