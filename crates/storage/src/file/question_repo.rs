use std::fs;

use log::{debug, info, warn};
use trivia_core::model::Question;

use super::mapping::{format_question_line, parse_question_line};
use super::{FileRepository, append_line};
use crate::repository::{QuestionRepository, StorageError};

impl QuestionRepository for FileRepository {
    /// Malformed lines are skipped with a warning; blank lines are ignored.
    fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let path = &self.paths().questions;
        let contents =
            fs::read_to_string(path).map_err(|e| StorageError::io("read", path, e))?;

        let mut questions = Vec::new();
        let mut skipped = 0_usize;
        for (i, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_question_line(line) {
                Ok(q) => questions.push(q),
                Err(e) => {
                    skipped += 1;
                    warn!("{}:{}: skipping malformed question: {e}", path.display(), i + 1);
                }
            }
        }

        info!(
            "loaded {} questions from {} ({skipped} skipped)",
            questions.len(),
            path.display()
        );
        Ok(questions)
    }

    fn append_question(&self, question: &Question) -> Result<(), StorageError> {
        let path = &self.paths().questions;
        append_line(path, &format_question_line(question))?;
        debug!("appended question to {}", path.display());
        Ok(())
    }
}
