use std::fmt;

use trivia_core::model::{
    AnswerChoice, AnswerOutcome, GAME_QUESTIONS, GameSession, PlayerName, Question, SessionError,
    SessionState,
};

use super::progress::SessionProgress;
use crate::error::GameError;

//
// ─── GAME ──────────────────────────────────────────────────────────────────────
//

/// In-memory game over a shuffled question list.
///
/// The question at position `i` is asked when the session's next index is `i`,
/// so a resumed game continues with the question after the checkpoint.
pub struct GameService {
    questions: Vec<Question>,
    session: GameSession,
}

impl GameService {
    /// Pair a question order with a session.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InsufficientQuestions` if fewer than
    /// `GAME_QUESTIONS` questions are supplied.
    pub fn new(questions: Vec<Question>, session: GameSession) -> Result<Self, GameError> {
        if questions.len() < GAME_QUESTIONS {
            return Err(GameError::InsufficientQuestions {
                available: questions.len(),
                required: GAME_QUESTIONS,
            });
        }
        Ok(Self { questions, session })
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        self.session.state()
    }

    #[must_use]
    pub fn player(&self) -> &PlayerName {
        self.session.state().player()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.session.state().score()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// Question waiting for an answer, or `None` once the game is over.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.session.is_complete() {
            return None;
        }
        self.questions.get(self.session.state().next_question_index())
    }

    /// 1-based number of the current question, for display.
    #[must_use]
    pub fn question_number(&self) -> usize {
        self.session.state().next_question_index() + 1
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let answered = self.session.state().next_question_index();
        SessionProgress {
            total: GAME_QUESTIONS,
            answered,
            remaining: self.session.remaining(),
            score: self.score(),
            is_complete: self.is_complete(),
        }
    }

    /// Score `choice` against the current question and advance.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` (wrapped) if the game is already over.
    pub fn answer_current(&mut self, choice: AnswerChoice) -> Result<AnswerOutcome, GameError> {
        let index = self.session.state().next_question_index();
        let question = self.questions.get(index).ok_or(SessionError::Completed)?;
        Ok(self.session.answer_question(question, choice)?)
    }

    /// The finished session, for recording its score.
    pub(crate) fn session(&self) -> &GameSession {
        &self.session
    }
}

impl fmt::Debug for GameService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameService")
            .field("questions_len", &self.questions.len())
            .field("state", self.session.state())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
