mod choice;
mod leaderboard;
mod player;
mod question;
mod session;

pub use choice::{AnswerChoice, ChoiceError, OPTION_COUNT};
pub use leaderboard::LeaderboardEntry;
pub use player::{PlayerName, PlayerNameError};
pub use question::{Difficulty, Question, QuestionDraft, QuestionError};
pub use session::{AnswerOutcome, GAME_QUESTIONS, GameSession, SessionError, SessionPhase, SessionState};
