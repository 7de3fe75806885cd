use std::sync::Arc;

use log::{info, warn};
use storage::repository::{CheckpointRepository, LeaderboardRepository, Storage};
use trivia_core::model::{
    AnswerChoice, AnswerOutcome, GameSession, LeaderboardEntry, PlayerName, SessionState,
};

use super::service::GameService;
use crate::Clock;
use crate::error::{GameError, PersistenceWarning};
use crate::question_bank::QuestionBankService;

/// Result of answering a single question in a game.
#[derive(Debug)]
pub struct AnswerResult {
    pub outcome: AnswerOutcome,
    pub state: SessionState,
    pub is_complete: bool,
    /// Set when the game finished and its score went to the leaderboard.
    pub recorded: Option<LeaderboardEntry>,
    /// Writes that failed; the game carries on without them.
    pub warnings: Vec<PersistenceWarning>,
}

/// What `resume_game` found in the save slot.
#[derive(Debug)]
pub enum ResumeOutcome {
    Resumed(GameService),
    /// Nothing to resume: no save exists or the saved game already finished.
    NoSavedGame,
}

/// Orchestrates game start/resume and persisted answering.
#[derive(Clone)]
pub struct GameLoopService {
    bank: QuestionBankService,
    checkpoints: Arc<dyn CheckpointRepository>,
    leaderboard: Arc<dyn LeaderboardRepository>,
}

impl GameLoopService {
    #[must_use]
    pub fn new(
        bank: QuestionBankService,
        checkpoints: Arc<dyn CheckpointRepository>,
        leaderboard: Arc<dyn LeaderboardRepository>,
    ) -> Self {
        Self {
            bank,
            checkpoints,
            leaderboard,
        }
    }

    /// Wire every service to the repositories in `storage`.
    #[must_use]
    pub fn from_storage(clock: Clock, storage: &Storage) -> Self {
        Self::new(
            QuestionBankService::new(clock, Arc::clone(&storage.questions)),
            Arc::clone(&storage.checkpoints),
            Arc::clone(&storage.leaderboard),
        )
    }

    /// Use a fixed shuffle seed for every game this service starts.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.bank = self.bank.with_seed(seed);
        self
    }

    #[must_use]
    pub fn question_bank(&self) -> &QuestionBankService {
        &self.bank
    }

    /// Start a fresh game at question 0 with a newly shuffled bank.
    ///
    /// The previous checkpoint is left alone until the first answer overwrites it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Load` if the bank cannot be read, or
    /// `GameError::InsufficientQuestions` if it is too small for a game.
    pub fn start_game(&self, player: PlayerName) -> Result<GameService, GameError> {
        let questions = self.bank.load_shuffled()?;
        let game = GameService::new(questions, GameSession::start(player))?;
        info!("started game for {}", game.player());
        Ok(game)
    }

    /// Continue the saved game, if there is one still in progress.
    ///
    /// The bank is reshuffled, so the remaining questions are drawn afresh.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Storage` if the save slot is unreadable,
    /// `GameError::Session` if it holds an out-of-range index, or the errors of
    /// `start_game` for loading the bank.
    pub fn resume_game(&self) -> Result<ResumeOutcome, GameError> {
        let Some(state) = self.checkpoints.read_checkpoint()? else {
            info!("no saved game found");
            return Ok(ResumeOutcome::NoSavedGame);
        };

        let session = GameSession::resume(state)?;
        if session.is_complete() {
            info!(
                "saved game for {} already finished",
                session.state().player()
            );
            return Ok(ResumeOutcome::NoSavedGame);
        }

        let questions = self.bank.load_shuffled()?;
        let game = GameService::new(questions, session)?;
        info!(
            "resumed game for {} at question {} (score {})",
            game.player(),
            game.question_number(),
            game.score()
        );
        Ok(ResumeOutcome::Resumed(game))
    }

    /// Answer the current question, checkpoint the new state and, on the last
    /// question, append the final score to the leaderboard.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Session` if the game is already complete. Storage
    /// failures are not errors here; they come back as `warnings`.
    pub fn answer_current(
        &self,
        game: &mut GameService,
        choice: AnswerChoice,
    ) -> Result<AnswerResult, GameError> {
        let outcome = game.answer_current(choice)?;
        let state = game.state().clone();
        let mut warnings = Vec::new();

        if let Err(e) = self.checkpoints.write_checkpoint(&state) {
            warn!("checkpoint write failed: {e}");
            warnings.push(PersistenceWarning::Checkpoint(e));
        }

        let mut recorded = None;
        if let Some(entry) = game.session().final_entry() {
            match self.leaderboard.append_entry(&entry) {
                Ok(()) => {
                    info!("game over for {} with {} points", entry.name, entry.score);
                    recorded = Some(entry);
                }
                Err(e) => {
                    warn!("leaderboard append failed: {e}");
                    warnings.push(PersistenceWarning::Leaderboard(e));
                }
            }
        }

        Ok(AnswerResult {
            outcome,
            is_complete: game.is_complete(),
            state,
            recorded,
            warnings,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::{InMemoryRepository, StorageError};
    use trivia_core::model::{GAME_QUESTIONS, Question, QuestionDraft};
    use trivia_core::time::fixed_clock;

    fn build_question(i: usize) -> Question {
        QuestionDraft {
            text: format!("Q{i}"),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct: 1,
            difficulty: 2,
        }
        .validate()
        .unwrap()
    }

    fn player() -> PlayerName {
        PlayerName::new("ada").unwrap()
    }

    fn service(repo: &InMemoryRepository) -> GameLoopService {
        GameLoopService::from_storage(fixed_clock(), &Storage::from_in_memory(repo.clone()))
            .with_seed(Some(1))
    }

    /// Checkpoint store whose writes always fail.
    struct ReadOnlySlot;

    impl CheckpointRepository for ReadOnlySlot {
        fn write_checkpoint(&self, _state: &SessionState) -> Result<(), StorageError> {
            Err(StorageError::Serialization("read-only".into()))
        }

        fn read_checkpoint(&self) -> Result<Option<SessionState>, StorageError> {
            Ok(None)
        }

        fn clear_checkpoint(&self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn every_answer_writes_a_checkpoint() {
        let repo = InMemoryRepository::with_questions((0..15).map(build_question).collect());
        let loop_service = service(&repo);
        let mut game = loop_service.start_game(player()).unwrap();

        let result = loop_service
            .answer_current(&mut game, AnswerChoice::new(1).unwrap())
            .unwrap();

        assert!(result.outcome.correct);
        assert!(result.warnings.is_empty());
        assert!(result.recorded.is_none());
        let saved = repo.read_checkpoint().unwrap().unwrap();
        assert_eq!(saved, SessionState::from_persisted(player(), 1, 2));
    }

    #[test]
    fn too_small_bank_cannot_start() {
        let repo = InMemoryRepository::with_questions((0..3).map(build_question).collect());
        let err = service(&repo).start_game(player()).unwrap_err();
        assert!(matches!(err, GameError::InsufficientQuestions { .. }));
    }

    #[test]
    fn finished_checkpoint_is_not_resumable() {
        let repo = InMemoryRepository::with_questions((0..15).map(build_question).collect());
        repo.write_checkpoint(&SessionState::from_persisted(player(), GAME_QUESTIONS, 20))
            .unwrap();

        let outcome = service(&repo).resume_game().unwrap();

        assert!(matches!(outcome, ResumeOutcome::NoSavedGame));
        assert!(repo.list_entries().unwrap().is_empty());
    }

    #[test]
    fn corrupt_checkpoint_index_is_reported() {
        let repo = InMemoryRepository::with_questions((0..15).map(build_question).collect());
        repo.write_checkpoint(&SessionState::from_persisted(player(), GAME_QUESTIONS + 4, 0))
            .unwrap();

        let err = service(&repo).resume_game().unwrap_err();
        assert!(matches!(err, GameError::Session(_)));
    }

    #[test]
    fn failed_checkpoint_write_is_a_warning_not_an_error() {
        let repo = InMemoryRepository::with_questions((0..15).map(build_question).collect());
        let bank = QuestionBankService::new(fixed_clock(), Arc::new(repo.clone()));
        let loop_service = GameLoopService::new(bank, Arc::new(ReadOnlySlot), Arc::new(repo));
        let mut game = loop_service.start_game(player()).unwrap();

        let result = loop_service
            .answer_current(&mut game, AnswerChoice::new(2).unwrap())
            .unwrap();

        assert!(!result.outcome.correct);
        assert_eq!(result.state.next_question_index(), 1);
        assert!(matches!(
            result.warnings.as_slice(),
            [PersistenceWarning::Checkpoint(_)]
        ));
    }
}
