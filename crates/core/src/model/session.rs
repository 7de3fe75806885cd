use thiserror::Error;

use crate::model::{AnswerChoice, LeaderboardEntry, PlayerName, Question};

/// Number of questions asked in one game.
pub const GAME_QUESTIONS: usize = 10;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("game already completed")]
    Completed,

    #[error("checkpoint question index {index} is past the end of a {max}-question game")]
    InvalidCheckpoint { index: usize, max: usize },
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Snapshot of an in-progress game; this is exactly what a checkpoint stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    player: PlayerName,
    next_question_index: usize,
    score: u32,
}

impl SessionState {
    /// Rehydrate a state from a persisted checkpoint.
    ///
    /// No bounds are checked here; `GameSession::resume` validates the index.
    #[must_use]
    pub fn from_persisted(player: PlayerName, next_question_index: usize, score: u32) -> Self {
        Self {
            player,
            next_question_index,
            score,
        }
    }

    #[must_use]
    pub fn player(&self) -> &PlayerName {
        &self.player
    }

    /// Index of the next question to ask; also the count already answered.
    #[must_use]
    pub fn next_question_index(&self) -> usize {
        self.next_question_index
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// True once every question of the game has been answered.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.next_question_index >= GAME_QUESTIONS
    }
}

/// Where a live session stands. A game that was never started has no
/// `GameSession` at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    Completed,
}

/// Result annotation for a single answer, rendered by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub score_delta: u32,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Score-keeping state machine for one game.
///
/// Owns only the `SessionState`; the question list lives with the caller,
/// which passes each question in as it is answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    state: SessionState,
}

impl GameSession {
    /// Begin a fresh game at question 0 with no points.
    #[must_use]
    pub fn start(player: PlayerName) -> Self {
        Self {
            state: SessionState::from_persisted(player, 0, 0),
        }
    }

    /// Continue from a checkpoint.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidCheckpoint` if the index exceeds `GAME_QUESTIONS`.
    pub fn resume(state: SessionState) -> Result<Self, SessionError> {
        if state.next_question_index > GAME_QUESTIONS {
            return Err(SessionError::InvalidCheckpoint {
                index: state.next_question_index,
                max: GAME_QUESTIONS,
            });
        }
        Ok(Self { state })
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.state.is_complete() {
            SessionPhase::Completed
        } else {
            SessionPhase::InProgress
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase() == SessionPhase::Completed
    }

    /// Questions left to answer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        GAME_QUESTIONS.saturating_sub(self.state.next_question_index)
    }

    /// Score the answer to `question` and advance to the next index.
    ///
    /// A correct choice earns the question's difficulty weight.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if every question was already answered;
    /// the state is left unchanged.
    pub fn answer_question(
        &mut self,
        question: &Question,
        choice: AnswerChoice,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }

        let correct = question.is_correct(choice);
        let score_delta = if correct {
            question.difficulty().weight()
        } else {
            0
        };

        self.state.score = self.state.score.saturating_add(score_delta);
        self.state.next_question_index += 1;

        Ok(AnswerOutcome {
            correct,
            score_delta,
        })
    }

    /// Leaderboard entry for a finished game.
    #[must_use]
    pub fn final_entry(&self) -> Option<LeaderboardEntry> {
        self.is_complete()
            .then(|| LeaderboardEntry::new(self.state.player.clone(), self.state.score))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionDraft;

    fn question(correct: u8, difficulty: u8) -> Question {
        QuestionDraft {
            text: "Q".into(),
            options: ["A".into(), "B".into(), "C".into(), "D".into()],
            correct,
            difficulty,
        }
        .validate()
        .unwrap()
    }

    fn player() -> PlayerName {
        PlayerName::new("ada").unwrap()
    }

    fn choice(v: u8) -> AnswerChoice {
        AnswerChoice::new(v).unwrap()
    }

    #[test]
    fn start_begins_at_zero() {
        let session = GameSession::start(player());
        assert_eq!(session.state().next_question_index(), 0);
        assert_eq!(session.state().score(), 0);
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.remaining(), GAME_QUESTIONS);
    }

    #[test]
    fn correct_answer_awards_difficulty_weight() {
        let mut session = GameSession::start(player());
        let outcome = session.answer_question(&question(2, 3), choice(2)).unwrap();
        assert_eq!(
            outcome,
            AnswerOutcome {
                correct: true,
                score_delta: 3
            }
        );
        assert_eq!(session.state().score(), 3);
        assert_eq!(session.state().next_question_index(), 1);
    }

    #[test]
    fn wrong_answer_still_advances() {
        let mut session = GameSession::start(player());
        let outcome = session.answer_question(&question(2, 3), choice(1)).unwrap();
        assert!(!outcome.correct);
        assert_eq!(outcome.score_delta, 0);
        assert_eq!(session.state().score(), 0);
        assert_eq!(session.state().next_question_index(), 1);
    }

    #[test]
    fn completes_after_last_question_and_rejects_more() {
        let mut session = GameSession::start(player());
        let q = question(1, 1);
        let mut last_index = 0;
        for _ in 0..GAME_QUESTIONS {
            assert!(session.final_entry().is_none());
            session.answer_question(&q, choice(1)).unwrap();
            let index = session.state().next_question_index();
            assert!(index > last_index && index <= GAME_QUESTIONS);
            last_index = index;
        }
        assert_eq!(session.phase(), SessionPhase::Completed);

        let before = session.state().clone();
        assert_eq!(
            session.answer_question(&q, choice(1)),
            Err(SessionError::Completed)
        );
        assert_eq!(session.state(), &before);

        let entry = session.final_entry().unwrap();
        assert_eq!(entry.name, player());
        assert_eq!(entry.score, GAME_QUESTIONS as u32);
    }

    #[test]
    fn resume_keeps_checkpoint_values() {
        let session =
            GameSession::resume(SessionState::from_persisted(player(), 3, 5)).unwrap();
        assert_eq!(session.state().next_question_index(), 3);
        assert_eq!(session.state().score(), 5);
        assert_eq!(session.remaining(), GAME_QUESTIONS - 3);
    }

    #[test]
    fn resume_at_end_is_already_complete() {
        let session = GameSession::resume(SessionState::from_persisted(
            player(),
            GAME_QUESTIONS,
            12,
        ))
        .unwrap();
        assert!(session.is_complete());
    }

    #[test]
    fn resume_rejects_index_past_end() {
        let err = GameSession::resume(SessionState::from_persisted(
            player(),
            GAME_QUESTIONS + 1,
            0,
        ))
        .unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidCheckpoint {
                index: GAME_QUESTIONS + 1,
                max: GAME_QUESTIONS
            }
        );
    }
}
