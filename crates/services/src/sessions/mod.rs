mod progress;
mod service;
mod workflow;

// Public API of the game session subsystem.
pub use progress::SessionProgress;
pub use service::GameService;
pub use workflow::{AnswerResult, GameLoopService, ResumeOutcome};
