use log::{debug, warn};
use trivia_core::model::LeaderboardEntry;

use super::mapping::{format_leaderboard_line, parse_leaderboard_line};
use super::{FileRepository, append_line, read_optional};
use crate::repository::{LeaderboardRepository, StorageError};

impl LeaderboardRepository for FileRepository {
    fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StorageError> {
        let path = &self.paths().leaderboard;
        append_line(path, &format_leaderboard_line(entry))?;
        debug!("recorded {} {} in {}", entry.name, entry.score, path.display());
        Ok(())
    }

    fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let path = &self.paths().leaderboard;
        let Some(contents) = read_optional(path)? else {
            return Ok(Vec::new());
        };

        let entries = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .filter_map(|(i, line)| match parse_leaderboard_line(line) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("{}:{}: skipping malformed entry: {e}", path.display(), i + 1);
                    None
                }
            })
            .collect();
        Ok(entries)
    }
}
