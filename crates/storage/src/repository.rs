use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use trivia_core::model::{LeaderboardEntry, Question, SessionState};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to {operation} {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage lock poisoned: {0}")]
    Poisoned(String),
}

impl StorageError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io {
                operation,
                path,
                source,
            }
        }
    }
}

/// Repository contract for the question bank.
pub trait QuestionRepository: Send + Sync {
    /// Load every well-formed question, in source order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the bank does not exist, or other
    /// storage errors if it cannot be read.
    fn load_questions(&self) -> Result<Vec<Question>, StorageError>;

    /// Append one question to the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be opened for appending.
    fn append_question(&self, question: &Question) -> Result<(), StorageError>;
}

/// Repository contract for the single in-progress save slot.
pub trait CheckpointRepository: Send + Sync {
    /// Overwrite the save slot with `state`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be written.
    fn write_checkpoint(&self, state: &SessionState) -> Result<(), StorageError>;

    /// Read the save slot. `Ok(None)` means no game was saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be read or parsed.
    fn read_checkpoint(&self) -> Result<Option<SessionState>, StorageError>;

    /// Remove the save slot. Removing an absent slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot exists but cannot be removed.
    fn clear_checkpoint(&self) -> Result<(), StorageError>;
}

/// Repository contract for the append-only leaderboard.
pub trait LeaderboardRepository: Send + Sync {
    /// Append an entry. Existing entries are never touched.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the leaderboard cannot be opened for appending.
    fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StorageError>;

    /// All entries in append order. A missing leaderboard is empty.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the leaderboard exists but cannot be read.
    fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<Vec<Question>>>,
    checkpoint: Arc<Mutex<Option<SessionState>>>,
    leaderboard: Arc<Mutex<Vec<LeaderboardEntry>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with a question bank.
    #[must_use]
    pub fn with_questions(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(Mutex::new(questions)),
            ..Self::default()
        }
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Poisoned(e.to_string())
}

impl QuestionRepository for InMemoryRepository {
    fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    fn append_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self.questions.lock().map_err(poisoned)?;
        guard.push(question.clone());
        Ok(())
    }
}

impl CheckpointRepository for InMemoryRepository {
    fn write_checkpoint(&self, state: &SessionState) -> Result<(), StorageError> {
        let mut guard = self.checkpoint.lock().map_err(poisoned)?;
        *guard = Some(state.clone());
        Ok(())
    }

    fn read_checkpoint(&self) -> Result<Option<SessionState>, StorageError> {
        let guard = self.checkpoint.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }

    fn clear_checkpoint(&self) -> Result<(), StorageError> {
        let mut guard = self.checkpoint.lock().map_err(poisoned)?;
        *guard = None;
        Ok(())
    }
}

impl LeaderboardRepository for InMemoryRepository {
    fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StorageError> {
        let mut guard = self.leaderboard.lock().map_err(poisoned)?;
        guard.push(entry.clone());
        Ok(())
    }

    fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let guard = self.leaderboard.lock().map_err(poisoned)?;
        Ok(guard.clone())
    }
}

/// Bundle of repository handles shared by the services layer.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub checkpoints: Arc<dyn CheckpointRepository>,
    pub leaderboard: Arc<dyn LeaderboardRepository>,
}

impl Storage {
    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let checkpoints: Arc<dyn CheckpointRepository> = Arc::new(repo.clone());
        let leaderboard: Arc<dyn LeaderboardRepository> = Arc::new(repo);
        Self {
            questions,
            checkpoints,
            leaderboard,
        }
    }
}
