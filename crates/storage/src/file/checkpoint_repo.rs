use std::fs;

use log::debug;
use trivia_core::model::SessionState;

use super::mapping::{format_checkpoint, parse_checkpoint};
use super::{FileRepository, read_optional, write_atomic};
use crate::repository::{CheckpointRepository, StorageError};

impl CheckpointRepository for FileRepository {
    fn write_checkpoint(&self, state: &SessionState) -> Result<(), StorageError> {
        let path = &self.paths().save;
        write_atomic(path, &format!("{}\n", format_checkpoint(state)))?;
        debug!(
            "checkpoint {} at question {} (score {})",
            state.player(),
            state.next_question_index(),
            state.score()
        );
        Ok(())
    }

    fn read_checkpoint(&self) -> Result<Option<SessionState>, StorageError> {
        let path = &self.paths().save;
        read_optional(path)?
            .map(|contents| parse_checkpoint(&contents))
            .transpose()
    }

    fn clear_checkpoint(&self) -> Result<(), StorageError> {
        let path = &self.paths().save;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io("remove", path, e)),
        }
    }
}
