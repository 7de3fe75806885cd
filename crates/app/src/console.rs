use std::io::{self, BufRead, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use log::debug;
use services::SessionProgress;
use trivia_core::model::{AnswerChoice, AnswerOutcome, LeaderboardEntry, Question};

/// Line-oriented terminal I/O. `None` from a read means input is exhausted.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Reads one line. A line that is not UTF-8 is consumed and reported as
    /// `ErrorKind::InvalidData`.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let mut line =
            String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Print `message` without a newline and read the reply. Undecodable
    /// replies are rejected and the prompt is shown again.
    pub fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        loop {
            write!(self.output, "{message}")?;
            self.output.flush()?;
            match self.read_line() {
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    debug!("rejected input: {e}");
                    self.error("Input must be valid UTF-8 text.")?;
                }
                other => return other,
            }
        }
    }

    /// Prompt until `parse` accepts the reply, printing its error each time.
    pub fn prompt_parsed<T, E: std::fmt::Display>(
        &mut self,
        message: &str,
        mut parse: impl FnMut(&str) -> Result<T, E>,
    ) -> io::Result<Option<T>> {
        loop {
            let Some(line) = self.prompt(message)? else {
                return Ok(None);
            };
            match parse(&line) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => self.error(&format!("Invalid input: {e}."))?,
            }
        }
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    pub fn error(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text.red())
    }

    pub fn warning(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text.yellow())
    }

    pub fn clear(&mut self) -> io::Result<()> {
        queue!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        self.output.flush()
    }

    pub fn menu(&mut self) -> io::Result<()> {
        self.blank()?;
        self.line("===== TRIVIA GAME =====")?;
        self.line("1. Start New Game")?;
        self.line("2. Resume Game")?;
        self.line("3. View Leaderboard")?;
        self.line("4. Add Question")?;
        self.line("5. Exit")?;
        self.line("=======================")
    }

    pub fn question(&mut self, progress: SessionProgress, question: &Question) -> io::Result<()> {
        self.blank()?;
        writeln!(
            self.output,
            "Question {}/{} ({}) | Score: {}",
            progress.answered + 1,
            progress.total,
            question.difficulty().label(),
            progress.score
        )?;
        writeln!(self.output, "{}", question.text().blue().bold())?;
        for choice in AnswerChoice::all() {
            writeln!(self.output, "{choice}. {}", question.option(choice))?;
        }
        Ok(())
    }

    pub fn outcome(&mut self, outcome: AnswerOutcome, question: &Question) -> io::Result<()> {
        if outcome.correct {
            let points = if outcome.score_delta == 1 { "point" } else { "points" };
            writeln!(
                self.output,
                "{} +{} {points}",
                "Correct!".green(),
                outcome.score_delta
            )
        } else {
            let answer = question.correct();
            writeln!(
                self.output,
                "{} The answer was {answer}. {}",
                "Wrong!".red(),
                question.option(answer)
            )
        }
    }

    pub fn leaderboard(&mut self, entries: &[LeaderboardEntry]) -> io::Result<()> {
        self.blank()?;
        writeln!(self.output, "{}", "Leaderboard:".yellow().bold())?;
        for entry in entries {
            writeln!(
                self.output,
                "{}: {}",
                entry.name.as_str().cyan().bold(),
                entry.score.to_string().green()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_line_strips_line_endings_and_reports_eof() {
        let mut console = Console::new(Cursor::new("one\r\ntwo\n"), Vec::new());
        assert_eq!(console.read_line().unwrap().as_deref(), Some("one"));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("two"));
        assert_eq!(console.read_line().unwrap(), None);
    }

    #[test]
    fn prompt_parsed_retries_until_valid() {
        let mut console = Console::new(Cursor::new("x\n7\n"), Vec::new());
        let value = console
            .prompt_parsed("n: ", |s| s.trim().parse::<u32>())
            .unwrap();
        assert_eq!(value, Some(7));

        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out.matches("n: ").count(), 2);
        assert!(out.contains("Invalid input"));
    }

    #[test]
    fn undecodable_line_is_skipped_and_prompt_repeats() {
        let input: &[u8] = b"\xff\xfe\n3\n";
        let mut console = Console::new(Cursor::new(input), Vec::new());

        assert!(matches!(
            console.read_line(),
            Err(e) if e.kind() == io::ErrorKind::InvalidData
        ));
        assert_eq!(console.read_line().unwrap().as_deref(), Some("3"));

        let mut console = Console::new(Cursor::new(input), Vec::new());
        assert_eq!(console.prompt("> ").unwrap().as_deref(), Some("3"));
        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out.matches("> ").count(), 2);
        assert!(out.contains("Input must be valid UTF-8 text."));
    }
}
