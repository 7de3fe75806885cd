use thiserror::Error;

use crate::model::choice::{AnswerChoice, OPTION_COUNT};

/// Characters that would break the pipe-delimited, line-oriented bank format.
const FORBIDDEN_CHARS: [char; 3] = ['|', '\n', '\r'];

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("option {position} cannot be empty")]
    EmptyOption { position: usize },

    #[error("{field} cannot contain '|' or line breaks")]
    ForbiddenCharacter { field: &'static str },

    #[error("correct answer must be between 1 and 4, got {0}")]
    InvalidCorrectAnswer(u8),

    #[error("difficulty must be 1 (easy), 2 (medium) or 3 (hard), got {0}")]
    InvalidDifficulty(u8),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Author-assigned difficulty. Its weight is the score for a correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Converts a numeric weight (1-3) to a `Difficulty`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidDifficulty` outside `1..=3`.
    pub fn from_u8(value: u8) -> Result<Self, QuestionError> {
        match value {
            1 => Ok(Self::Easy),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Hard),
            _ => Err(QuestionError::InvalidDifficulty(value)),
        }
    }

    /// Numeric value as written in the question bank.
    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    /// Points awarded for answering a question of this difficulty correctly.
    #[must_use]
    pub fn weight(self) -> u32 {
        u32::from(self.value())
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question as typed by an author or read from a bank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub options: [String; OPTION_COUNT],
    pub correct: u8,
    pub difficulty: u8,
}

impl QuestionDraft {
    /// Validates the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` for empty fields, fields containing the record
    /// delimiter or line breaks, or out-of-range answer/difficulty values.
    pub fn validate(self) -> Result<Question, QuestionError> {
        check_field(&self.text, "question text")?;
        if self.text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }

        for (i, option) in self.options.iter().enumerate() {
            check_field(option, "option")?;
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption { position: i + 1 });
            }
        }

        let correct = AnswerChoice::new(self.correct)
            .map_err(|_| QuestionError::InvalidCorrectAnswer(self.correct))?;
        let difficulty = Difficulty::from_u8(self.difficulty)?;

        Ok(Question {
            text: self.text,
            options: self.options,
            correct,
            difficulty,
        })
    }
}

fn check_field(value: &str, field: &'static str) -> Result<(), QuestionError> {
    if value.contains(FORBIDDEN_CHARS) {
        return Err(QuestionError::ForbiddenCharacter { field });
    }
    Ok(())
}

/// A validated multiple-choice question. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Question {
    text: String,
    options: [String; OPTION_COUNT],
    correct: AnswerChoice,
    difficulty: Difficulty,
}

impl Question {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    /// Option text for a given choice.
    #[must_use]
    pub fn option(&self, choice: AnswerChoice) -> &str {
        &self.options[choice.index()]
    }

    #[must_use]
    pub fn correct(&self) -> AnswerChoice {
        self.correct
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn is_correct(&self, choice: AnswerChoice) -> bool {
        self.correct == choice
    }

    /// Convert back into a draft, e.g. for serialization.
    #[must_use]
    pub fn to_draft(&self) -> QuestionDraft {
        QuestionDraft {
            text: self.text.clone(),
            options: self.options.clone(),
            correct: self.correct.value(),
            difficulty: self.difficulty.value(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
