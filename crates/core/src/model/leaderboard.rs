use crate::model::player::PlayerName;

/// One completed game on the leaderboard.
///
/// Entries are append-only. The same name may appear any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: PlayerName,
    pub score: u32,
}

impl LeaderboardEntry {
    #[must_use]
    pub fn new(name: PlayerName, score: u32) -> Self {
        Self { name, score }
    }
}
