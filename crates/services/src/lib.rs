#![forbid(unsafe_code)]

pub mod error;
pub mod leaderboard_service;
pub mod question_bank;
pub mod sessions;

pub use trivia_core::Clock;
pub use sessions as session;

pub use error::{GameError, PersistenceWarning};
pub use leaderboard_service::LeaderboardService;
pub use question_bank::{QuestionBankService, shuffle_questions};
pub use sessions::{AnswerResult, GameLoopService, GameService, ResumeOutcome, SessionProgress};
