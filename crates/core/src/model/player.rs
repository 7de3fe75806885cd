use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlayerNameError {
    #[error("player name cannot be empty")]
    Empty,

    #[error("player name cannot contain whitespace")]
    ContainsWhitespace,
}

/// Player name as stored in the save slot and the leaderboard.
///
/// Both files are whitespace-delimited, so a name is a single non-empty token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerName(String);

impl PlayerName {
    /// Creates a name, rejecting empty values and embedded whitespace.
    ///
    /// # Errors
    ///
    /// Returns `PlayerNameError` if the name is empty or contains whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, PlayerNameError> {
        let name = name.into();
        if name.is_empty() {
            return Err(PlayerNameError::Empty);
        }
        if name.chars().any(char::is_whitespace) {
            return Err(PlayerNameError::ContainsWhitespace);
        }
        Ok(Self(name))
    }

    /// Takes the first whitespace-delimited token of free-form input.
    ///
    /// # Errors
    ///
    /// Returns `PlayerNameError::Empty` if the input holds no token.
    pub fn from_input(input: &str) -> Result<Self, PlayerNameError> {
        let token = input.split_whitespace().next().ok_or(PlayerNameError::Empty)?;
        Self::new(token)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_input_keeps_first_token_only() {
        let name = PlayerName::from_input("  ada lovelace\n").unwrap();
        assert_eq!(name.as_str(), "ada");
    }

    #[test]
    fn rejects_blank_and_spaced_names() {
        assert_eq!(PlayerName::from_input("   "), Err(PlayerNameError::Empty));
        assert_eq!(PlayerName::new(""), Err(PlayerNameError::Empty));
        assert_eq!(
            PlayerName::new("two words"),
            Err(PlayerNameError::ContainsWhitespace)
        );
    }
}
