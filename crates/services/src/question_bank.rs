use std::sync::Arc;

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use storage::repository::QuestionRepository;
use trivia_core::model::{Question, QuestionDraft};

use crate::Clock;
use crate::error::GameError;

/// Returns a uniformly random permutation of `questions` driven by `seed`.
///
/// The same seed and input length always produce the same permutation.
#[must_use]
pub fn shuffle_questions(mut questions: Vec<Question>, seed: u64) -> Vec<Question> {
    let mut rng = StdRng::seed_from_u64(seed);
    questions.as_mut_slice().shuffle(&mut rng);
    questions
}

/// Loads, shuffles and extends the question bank.
#[derive(Clone)]
pub struct QuestionBankService {
    clock: Clock,
    seed: Option<u64>,
    questions: Arc<dyn QuestionRepository>,
}

impl QuestionBankService {
    #[must_use]
    pub fn new(clock: Clock, questions: Arc<dyn QuestionRepository>) -> Self {
        Self {
            clock,
            seed: None,
            questions,
        }
    }

    /// Use a fixed shuffle seed instead of one derived from the clock.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Seed for the next shuffle. Reseeded on every call.
    #[must_use]
    pub fn next_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| self.clock.seed())
    }

    /// Load the full bank in file order.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Load` if the bank is missing or unreadable.
    pub fn load(&self) -> Result<Vec<Question>, GameError> {
        self.questions.load_questions().map_err(GameError::Load)
    }

    /// Load the bank and return it in a fresh random order.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Load` if the bank is missing or unreadable.
    pub fn load_shuffled(&self) -> Result<Vec<Question>, GameError> {
        let questions = self.load()?;
        let seed = self.next_seed();
        debug!("shuffling {} questions with seed {seed}", questions.len());
        Ok(shuffle_questions(questions, seed))
    }

    /// Validate a draft and append it to the bank.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Question` if the draft is invalid (nothing is written),
    /// or `GameError::Storage` if the bank cannot be appended to.
    pub fn add_question(&self, draft: QuestionDraft) -> Result<Question, GameError> {
        let question = draft.validate()?;
        self.questions.append_question(&question)?;
        info!("added question {:?}", question.text());
        Ok(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use storage::repository::InMemoryRepository;
    use trivia_core::time::fixed_clock;

    fn build_question(i: usize) -> Question {
        QuestionDraft {
            text: format!("Question {i}"),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct: u8::try_from(i % 4).unwrap() + 1,
            difficulty: u8::try_from(i % 3).unwrap() + 1,
        }
        .validate()
        .unwrap()
    }

    fn bank(n: usize) -> Vec<Question> {
        (0..n).map(build_question).collect()
    }

    fn sorted_texts(questions: &[Question]) -> Vec<String> {
        let mut texts: Vec<String> = questions.iter().map(|q| q.text().to_owned()).collect();
        texts.sort();
        texts
    }

    proptest! {
        #[test]
        fn shuffle_is_a_permutation(n in 0_usize..64, seed in any::<u64>()) {
            let input = bank(n);
            let output = shuffle_questions(input.clone(), seed);
            prop_assert_eq!(output.len(), input.len());
            prop_assert_eq!(sorted_texts(&output), sorted_texts(&input));
        }
    }

    #[test]
    fn same_seed_gives_same_order() {
        let a = shuffle_questions(bank(20), 42);
        let b = shuffle_questions(bank(20), 42);
        assert_eq!(a, b);
    }

    #[test]
    fn fixed_clock_makes_default_seed_stable() {
        let repo = Arc::new(InMemoryRepository::with_questions(bank(20)));
        let service = QuestionBankService::new(fixed_clock(), repo);
        assert_eq!(service.next_seed(), fixed_clock().seed());
        assert_eq!(
            service.load_shuffled().unwrap(),
            service.load_shuffled().unwrap()
        );
    }

    #[test]
    fn explicit_seed_overrides_clock() {
        let repo = Arc::new(InMemoryRepository::with_questions(bank(20)));
        let service = QuestionBankService::new(fixed_clock(), repo).with_seed(Some(7));
        assert_eq!(service.next_seed(), 7);
        assert_eq!(
            service.load_shuffled().unwrap(),
            shuffle_questions(bank(20), 7)
        );
    }

    #[test]
    fn invalid_draft_is_not_written() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = QuestionBankService::new(fixed_clock(), repo.clone());

        let mut draft = build_question(0).to_draft();
        draft.correct = 9;
        let err = service.add_question(draft).unwrap_err();

        assert!(matches!(err, GameError::Question(_)));
        assert!(repo.load_questions().unwrap().is_empty());
    }

    #[test]
    fn valid_draft_is_appended() {
        let repo = Arc::new(InMemoryRepository::new());
        let service = QuestionBankService::new(fixed_clock(), repo.clone());

        let added = service.add_question(build_question(3).to_draft()).unwrap();

        assert_eq!(service.load().unwrap(), vec![added]);
    }
}
