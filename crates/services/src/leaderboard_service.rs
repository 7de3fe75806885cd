use std::sync::Arc;

use storage::repository::LeaderboardRepository;
use trivia_core::model::LeaderboardEntry;

use crate::error::GameError;

/// Read access to the leaderboard, in chronological order.
#[derive(Clone)]
pub struct LeaderboardService {
    leaderboard: Arc<dyn LeaderboardRepository>,
}

impl LeaderboardService {
    #[must_use]
    pub fn new(leaderboard: Arc<dyn LeaderboardRepository>) -> Self {
        Self { leaderboard }
    }

    /// Every recorded game, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if the leaderboard cannot be read.
    pub fn entries(&self) -> Result<Vec<LeaderboardEntry>, GameError> {
        Ok(self.leaderboard.list_entries()?)
    }
}
