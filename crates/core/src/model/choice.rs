use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Rejected answer input. The caller re-prompts; no session state changes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChoiceError {
    #[error("answer cannot be empty")]
    Empty,

    #[error("answer must be a number between 1 and 4, got {raw:?}")]
    NotANumber { raw: String },

    #[error("answer must be between 1 and 4, got {0}")]
    OutOfRange(u8),
}

//
// ─── ANSWER CHOICE ─────────────────────────────────────────────────────────────
//

/// A 1-based option position, always in `1..=4`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnswerChoice(u8);

impl AnswerChoice {
    /// Creates a choice from its 1-based position.
    ///
    /// # Errors
    ///
    /// Returns `ChoiceError::OutOfRange` unless `value` is in `1..=4`.
    pub fn new(value: u8) -> Result<Self, ChoiceError> {
        if (1..=OPTION_COUNT as u8).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ChoiceError::OutOfRange(value))
        }
    }

    /// Returns the 1-based position.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Returns the 0-based index into a question's options.
    #[must_use]
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// All four choices in display order.
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=OPTION_COUNT as u8).map(Self)
    }
}

impl FromStr for AnswerChoice {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ChoiceError::Empty);
        }
        let value: u8 = trimmed.parse().map_err(|_| ChoiceError::NotANumber {
            raw: trimmed.to_owned(),
        })?;
        Self::new(value)
    }
}

impl fmt::Debug for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnswerChoice({})", self.0)
    }
}

impl fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
