use std::io::{self, BufRead, Write};

use log::debug;
use services::{GameError, GameLoopService, GameService, LeaderboardService, ResumeOutcome};
use thiserror::Error;
use trivia_core::model::{AnswerChoice, Difficulty, OPTION_COUNT, PlayerName, QuestionDraft};

use crate::console::Console;

/// Errors that end the menu loop.
#[derive(Debug, Error)]
pub enum ShellError {
    /// No game can run without questions.
    #[error("{0}")]
    Fatal(#[source] GameError),

    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Menu loop dispatching to the game services.
pub struct Shell<R, W> {
    console: Console<R, W>,
    games: GameLoopService,
    leaderboard: LeaderboardService,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(console: Console<R, W>, games: GameLoopService, leaderboard: LeaderboardService) -> Self {
        Self {
            console,
            games,
            leaderboard,
        }
    }

    #[cfg(test)]
    pub fn into_console(self) -> Console<R, W> {
        self.console
    }

    /// Run until the player exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns `ShellError::Fatal` if the question bank cannot be loaded.
    pub fn run(&mut self) -> Result<(), ShellError> {
        loop {
            self.console.menu()?;
            let Some(choice) = self.console.prompt("Choose an option: ")? else {
                return Ok(());
            };

            let flow = match choice.trim() {
                "1" => self.new_game()?,
                "2" => self.resume_game()?,
                "3" => self.show_leaderboard()?,
                "4" => self.add_question()?,
                "5" => {
                    self.console.line("Exiting the game...")?;
                    Flow::Exit
                }
                other => {
                    debug!("unknown menu choice {other:?}");
                    self.console.error("Invalid choice, try again.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    fn new_game(&mut self) -> Result<Flow, ShellError> {
        let Some(player) = self
            .console
            .prompt_parsed("Enter your name: ", PlayerName::from_input)?
        else {
            return Ok(Flow::Exit);
        };

        match self.games.start_game(player) {
            Ok(game) => self.play(game),
            Err(e) => self.game_error(e),
        }
    }

    fn resume_game(&mut self) -> Result<Flow, ShellError> {
        match self.games.resume_game() {
            Ok(ResumeOutcome::Resumed(game)) => {
                self.console.blank()?;
                self.console
                    .line(&format!("Resuming game for {}", game.player()))?;
                self.console.line(&format!("Current score: {}", game.score()))?;
                self.play(game)
            }
            Ok(ResumeOutcome::NoSavedGame) => {
                self.console
                    .line("No saved game found. Starting a new game instead.")?;
                self.new_game()
            }
            Err(e @ GameError::Load(_)) => Err(ShellError::Fatal(e)),
            Err(e) => {
                self.console.warning(&format!(
                    "Could not resume the saved game: {e}. Starting a new game instead."
                ))?;
                self.new_game()
            }
        }
    }

    fn play(&mut self, mut game: GameService) -> Result<Flow, ShellError> {
        while let Some(question) = game.current_question().cloned() {
            self.console.question(game.progress(), &question)?;

            let Some(choice) = self.prompt_choice()? else {
                return Ok(Flow::Exit);
            };

            let result = match self.games.answer_current(&mut game, choice) {
                Ok(result) => result,
                Err(e) => return self.game_error(e),
            };
            self.console.outcome(result.outcome, &question)?;
            for warning in &result.warnings {
                self.console.warning(&warning.to_string())?;
            }
        }

        self.console.blank()?;
        self.console
            .line(&format!("Game Over! Your final score: {}", game.score()))?;
        Ok(Flow::Continue)
    }

    /// Re-prompts until the reply is a valid option number.
    fn prompt_choice(&mut self) -> io::Result<Option<AnswerChoice>> {
        loop {
            let Some(line) = self.console.prompt("Choose an answer (1-4): ")? else {
                return Ok(None);
            };
            match line.parse::<AnswerChoice>() {
                Ok(choice) => return Ok(Some(choice)),
                Err(e) => {
                    debug!("rejected answer {line:?}: {e}");
                    self.console
                        .error("Invalid answer. Please choose a number between 1 and 4.")?;
                }
            }
        }
    }

    fn show_leaderboard(&mut self) -> Result<Flow, ShellError> {
        self.console.clear()?;
        match self.leaderboard.entries() {
            Ok(entries) if entries.is_empty() => {
                self.console.blank()?;
                self.console.line("No leaderboard found.")?;
                return Ok(Flow::Continue);
            }
            Ok(entries) => self.console.leaderboard(&entries)?,
            Err(e) => {
                self.console
                    .error(&format!("Could not read the leaderboard: {e}"))?;
                return Ok(Flow::Continue);
            }
        }

        if self.console.prompt("Press Enter to continue...")?.is_none() {
            return Ok(Flow::Exit);
        }
        self.console.clear()?;
        Ok(Flow::Continue)
    }

    fn add_question(&mut self) -> Result<Flow, ShellError> {
        let Some(draft) = self.read_draft()? else {
            return Ok(Flow::Exit);
        };

        match self.games.question_bank().add_question(draft) {
            Ok(_) => self.console.line("Question added successfully!")?,
            Err(GameError::Question(e)) => {
                self.console.error(&format!("Question not added: {e}."))?;
            }
            Err(e) => {
                self.console.error(&format!(
                    "Error opening questions file for appending: {e}"
                ))?;
            }
        }
        Ok(Flow::Continue)
    }

    fn read_draft(&mut self) -> io::Result<Option<QuestionDraft>> {
        let Some(text) = self.console.prompt("Enter the question: ")? else {
            return Ok(None);
        };

        let mut options: [String; OPTION_COUNT] = Default::default();
        for (i, option) in options.iter_mut().enumerate() {
            let Some(value) = self.console.prompt(&format!("Enter option {}: ", i + 1))? else {
                return Ok(None);
            };
            *option = value;
        }

        let Some(correct) = self
            .console
            .prompt_parsed("Enter correct answer (1-4): ", str::parse::<AnswerChoice>)?
        else {
            return Ok(None);
        };
        let Some(difficulty) = self.console.prompt_parsed(
            "Enter difficulty (1=easy, 2=medium, 3=hard): ",
            parse_difficulty,
        )?
        else {
            return Ok(None);
        };

        Ok(Some(QuestionDraft {
            text,
            options,
            correct: correct.value(),
            difficulty: difficulty.value(),
        }))
    }

    fn game_error(&mut self, error: GameError) -> Result<Flow, ShellError> {
        match error {
            e @ GameError::Load(_) => Err(ShellError::Fatal(e)),
            e => {
                self.console.error(&format!("{e}"))?;
                Ok(Flow::Continue)
            }
        }
    }
}

fn parse_difficulty(raw: &str) -> Result<Difficulty, String> {
    let value: u8 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{:?} is not a number", raw.trim()))?;
    Difficulty::from_u8(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    use services::Clock;
    use storage::file::StoragePaths;
    use storage::repository::Storage;
    use tempfile::{TempDir, tempdir};
    use trivia_core::model::GAME_QUESTIONS;

    fn write_bank(paths: &StoragePaths, n: usize) {
        let lines: String = (0..n)
            .map(|i| format!("Question {i}?|a|b|c|d|1|2\n"))
            .collect();
        fs::write(&paths.questions, lines).unwrap();
    }

    fn run_shell(dir: &TempDir, input: &[u8]) -> (Result<(), ShellError>, String) {
        let storage = Storage::files(StoragePaths::in_dir(dir.path()));
        let games = GameLoopService::from_storage(Clock::default_clock(), &storage).with_seed(Some(9));
        let leaderboard = LeaderboardService::new(storage.leaderboard.clone());
        let console = Console::new(Cursor::new(input), Vec::new());

        let mut shell = Shell::new(console, games, leaderboard);
        let result = shell.run();
        let output = String::from_utf8(shell.into_console().into_output()).unwrap();
        (result, output)
    }

    #[test]
    fn full_game_records_score_and_leaves_final_checkpoint() {
        let dir = tempdir().unwrap();
        let paths = StoragePaths::in_dir(dir.path());
        write_bank(&paths, 12);

        let answers = "1\n".repeat(GAME_QUESTIONS);
        let (result, output) = run_shell(&dir, format!("1\nada\n{answers}5\n").as_bytes());

        result.unwrap();
        assert!(output.contains("Game Over! Your final score: 20"));
        assert!(output.contains("Exiting the game..."));
        assert_eq!(fs::read_to_string(&paths.leaderboard).unwrap(), "ada 20\n");
        assert_eq!(fs::read_to_string(&paths.save).unwrap(), "ada 10 20\n");
    }

    #[test]
    fn invalid_answer_is_reprompted() {
        let dir = tempdir().unwrap();
        let paths = StoragePaths::in_dir(dir.path());
        write_bank(&paths, 12);

        let (result, output) = run_shell(&dir, b"1\nada\n5\nfoo\n2\n");

        result.unwrap();
        assert_eq!(
            output
                .matches("Invalid answer. Please choose a number between 1 and 4.")
                .count(),
            2
        );
        assert!(output.contains("Wrong!"));
        assert_eq!(fs::read_to_string(&paths.save).unwrap(), "ada 1 0\n");
    }

    #[test]
    fn undecodable_answer_is_reprompted() {
        let dir = tempdir().unwrap();
        let paths = StoragePaths::in_dir(dir.path());
        write_bank(&paths, 12);

        let (result, output) = run_shell(&dir, b"1\nada\n\xff\xfe\n1\n");

        result.unwrap();
        assert_eq!(output.matches("Input must be valid UTF-8 text.").count(), 1);
        assert_eq!(output.matches("Choose an answer (1-4): ").count(), 3);
        assert!(output.contains("Correct!"));
        assert_eq!(fs::read_to_string(&paths.save).unwrap(), "ada 1 2\n");
    }

    #[test]
    fn resume_without_save_starts_new_game() {
        let dir = tempdir().unwrap();
        write_bank(&StoragePaths::in_dir(dir.path()), 12);

        let (result, output) = run_shell(&dir, b"2\nbob\n");

        result.unwrap();
        assert!(output.contains("No saved game found. Starting a new game instead."));
        assert!(output.contains("Question 1/10"));
    }

    #[test]
    fn resume_continues_from_checkpoint() {
        let dir = tempdir().unwrap();
        let paths = StoragePaths::in_dir(dir.path());
        write_bank(&paths, 12);
        fs::write(&paths.save, "cy 3 5\n").unwrap();

        let (result, output) = run_shell(&dir, b"2\n1\n");

        result.unwrap();
        assert!(output.contains("Resuming game for cy"));
        assert!(output.contains("Current score: 5"));
        assert!(output.contains("Question 4/10 (medium) | Score: 5"));
        assert_eq!(fs::read_to_string(&paths.save).unwrap(), "cy 4 7\n");
    }

    #[test]
    fn missing_bank_is_fatal() {
        let dir = tempdir().unwrap();

        let (result, _) = run_shell(&dir, b"1\nada\n");

        assert!(matches!(result, Err(ShellError::Fatal(GameError::Load(_)))));
    }

    #[test]
    fn add_question_appends_to_bank() {
        let dir = tempdir().unwrap();
        let paths = StoragePaths::in_dir(dir.path());

        let input = b"4\nLargest planet?\nMars\nJupiter\nVenus\nEarth\n7\n2\n9\n1\n5\n";
        let (result, output) = run_shell(&dir, input);

        result.unwrap();
        assert!(output.contains("Question added successfully!"));
        assert_eq!(
            fs::read_to_string(&paths.questions).unwrap(),
            "Largest planet?|Mars|Jupiter|Venus|Earth|2|1\n"
        );
    }

    #[test]
    fn empty_leaderboard_is_reported() {
        let dir = tempdir().unwrap();

        let (result, output) = run_shell(&dir, b"3\n5\n");

        result.unwrap();
        assert!(output.contains("No leaderboard found."));
    }

    #[test]
    fn leaderboard_lists_entries_in_file_order() {
        let dir = tempdir().unwrap();
        let paths = StoragePaths::in_dir(dir.path());
        fs::write(&paths.leaderboard, "ada 5\nbob 9\n").unwrap();

        let (result, output) = run_shell(&dir, b"3\n\n5\n");

        result.unwrap();
        let ada = output.find("ada").unwrap();
        let bob = output.find("bob").unwrap();
        assert!(ada < bob);
    }

    #[test]
    fn unknown_menu_choice_is_rejected() {
        let dir = tempdir().unwrap();

        let (result, output) = run_shell(&dir, b"9\n5\n");

        result.unwrap();
        assert!(output.contains("Invalid choice, try again."));
    }
}
