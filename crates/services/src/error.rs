//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use trivia_core::model::{QuestionError, SessionError};

/// Errors emitted by game and question bank services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    /// The question bank is missing or unreadable; no game can run.
    #[error("failed to load questions: {0}")]
    Load(#[source] StorageError),

    #[error("question bank has {available} questions, a game needs {required}")]
    InsufficientQuestions { available: usize, required: usize },

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A write that failed while the game itself carried on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceWarning {
    #[error("could not save game progress: {0}")]
    Checkpoint(#[source] StorageError),

    #[error("could not record score on the leaderboard: {0}")]
    Leaderboard(#[source] StorageError),
}
