//! Line-based front end over `SessionController`.

use std::io;

use quiz_core::model::Difficulty;
use quiz_core::score::ProgressStage;
use services::{
    AdvanceOutcome, ResultsView, SessionController, SessionError, Stage, SubmitOutcome,
    tier_message,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Terminal {
    lines: Lines<BufReader<Stdin>>,
}

/// What the player asked for at a prompt.
enum Input {
    Line(String),
    Quit,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn prompt(&mut self, label: &str) -> io::Result<Input> {
        println!("{label}");
        match self.lines.next_line().await? {
            None => Ok(Input::Quit),
            Some(line) if line.trim().eq_ignore_ascii_case("q") => Ok(Input::Quit),
            Some(line) => Ok(Input::Line(line.trim().to_string())),
        }
    }

    /// Run until the player quits or stdin closes.
    pub async fn run(&mut self, ctrl: &mut SessionController) -> io::Result<()> {
        loop {
            let keep_going = match ctrl.stage() {
                Stage::Start => self.start_screen(ctrl).await?,
                Stage::DifficultySelect => self.difficulty_screen(ctrl).await?,
                Stage::Playing(_) => self.question_screen(ctrl).await?,
                Stage::Finished(_) => self.results_screen(ctrl).await?,
                Stage::Review(_) => self.review_screen(ctrl).await?,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    async fn start_screen(&mut self, ctrl: &mut SessionController) -> io::Result<bool> {
        println!();
        println!("== Tech Explorer Quiz ==");
        println!("  n) new game");
        if ctrl.has_saved_session() {
            println!("  r) resume saved game");
            println!("  d) discard saved game");
        }
        println!("  q) quit");

        let Input::Line(choice) = self.prompt(">").await? else {
            return Ok(false);
        };
        let outcome = match choice.as_str() {
            "n" => ctrl.begin_selection(),
            "r" => ctrl.resume().await,
            "d" => ctrl.abandon_saved().await,
            _ => {
                println!("Unknown choice: {choice}");
                Ok(())
            }
        };
        report(outcome);
        Ok(true)
    }

    async fn difficulty_screen(&mut self, ctrl: &mut SessionController) -> io::Result<bool> {
        println!();
        println!("Pick a difficulty:");
        for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
            let count = ctrl.bank().count(*difficulty);
            println!("  {}) {difficulty} ({count} questions)", i + 1);
        }
        println!("  b) back");

        let Input::Line(choice) = self.prompt(">").await? else {
            return Ok(false);
        };
        if choice == "b" {
            report(ctrl.back());
            return Ok(true);
        }

        let picked = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Difficulty::ALL.get(i).copied())
            .or_else(|| choice.parse::<Difficulty>().ok());
        match picked {
            Some(difficulty) => report(ctrl.choose_difficulty(difficulty)),
            None => println!("Unknown difficulty: {choice}"),
        }
        Ok(true)
    }

    async fn question_screen(&mut self, ctrl: &mut SessionController) -> io::Result<bool> {
        let (Some(session), Some(progress)) = (ctrl.session(), ctrl.progress()) else {
            return Ok(true);
        };
        let Some(question) = session.current_question().cloned() else {
            return Ok(true);
        };

        println!();
        println!(
            "Question {}/{} {}  score {}",
            progress.question_number(),
            progress.total,
            plant(progress.stage),
            session.score()
        );
        match question.emoji() {
            Some(emoji) => println!("{emoji} {}", question.text()),
            None => println!("{}", question.text()),
        }
        for (i, option) in question.options().iter().enumerate() {
            println!("  {}) {option}", i + 1);
        }

        let Input::Line(choice) = self.prompt("Your answer:").await? else {
            return Ok(false);
        };
        let Some(option) = choice.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) else {
            println!("Type the number of an option.");
            return Ok(true);
        };

        match ctrl.submit_answer(option) {
            Ok(SubmitOutcome::Accepted(pending)) => {
                if pending.is_correct {
                    println!("Correct!");
                } else {
                    println!("Not quite. The answer was: {}", question.correct_option());
                }
                if let Some(explanation) = question.explanation() {
                    println!("{explanation}");
                }
            }
            Ok(SubmitOutcome::Ignored) => {}
            Err(err) => {
                println!("{err}");
                return Ok(true);
            }
        }

        if let Input::Quit = self.prompt("Press Enter to continue").await? {
            return Ok(false);
        }
        match ctrl.advance().await {
            Ok(AdvanceOutcome::Finished) => println!("That was the last question!"),
            Ok(AdvanceOutcome::Next) => {}
            Err(err) => println!("{err}"),
        }
        Ok(true)
    }

    async fn results_screen(&mut self, ctrl: &mut SessionController) -> io::Result<bool> {
        let Some(results) = ctrl.results() else {
            return Ok(true);
        };
        print_results(&results);
        if results.can_review() {
            println!("  r) review mistakes");
        }
        println!("  s) share score");
        println!("  n) play again");
        println!("  q) quit");

        let Input::Line(choice) = self.prompt(">").await? else {
            return Ok(false);
        };
        match choice.as_str() {
            "r" => report(ctrl.review_mistakes()),
            "s" => {
                if let Some(payload) = ctrl.share_payload() {
                    println!("{}", payload.text());
                    match payload.to_json() {
                        Ok(json) => println!("{json}"),
                        Err(err) => tracing::warn!(error = %err, "could not encode share payload"),
                    }
                }
            }
            "n" => report(ctrl.restart()),
            _ => println!("Unknown choice: {choice}"),
        }
        Ok(true)
    }

    async fn review_screen(&mut self, ctrl: &mut SessionController) -> io::Result<bool> {
        let Some(results) = ctrl.results() else {
            return Ok(true);
        };
        println!();
        println!("Mistakes to learn from:");
        for item in &results.mistakes {
            println!();
            match &item.emoji {
                Some(emoji) => println!("{emoji} {}", item.question),
                None => println!("{}", item.question),
            }
            println!("  you answered: {}", item.selected);
            println!("  correct:      {}", item.correct);
            if let Some(explanation) = &item.explanation {
                println!("  {explanation}");
            }
        }

        if let Input::Quit = self.prompt("Press Enter to go back to your results").await? {
            return Ok(false);
        }
        report(ctrl.back_to_results());
        Ok(true)
    }
}

fn print_results(results: &ResultsView) {
    println!();
    println!(
        "You scored {}/{} ({:.0}%) on {}",
        results.score, results.total, results.percentage, results.difficulty
    );
    println!("Rank: {}", results.rank.as_str());
    if results.celebrates() {
        println!("*** Well done! ***");
    }
    println!("{}", tier_message(results.tier));
}

fn plant(stage: ProgressStage) -> &'static str {
    match stage {
        ProgressStage::Seedling => "[seedling]",
        ProgressStage::Sprout => "[sprout]",
        ProgressStage::Tree => "[tree]",
    }
}

fn report(outcome: Result<(), SessionError>) {
    if let Err(err) = outcome {
        println!("{err}");
    }
}
