use trivia_core::model::{LeaderboardEntry, PlayerName, Question, QuestionDraft, SessionState};

use crate::repository::StorageError;

pub(crate) const FIELD_DELIMITER: char = '|';
const QUESTION_FIELDS: usize = 7;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn parse_number<T: std::str::FromStr>(field: &'static str, raw: &str) -> Result<T, StorageError> {
    raw.trim()
        .parse()
        .map_err(|_| StorageError::Serialization(format!("invalid {field}: {raw:?}")))
}

/// `question|opt1|opt2|opt3|opt4|correctIndex|difficulty`, without line ending.
pub(crate) fn format_question_line(question: &Question) -> String {
    let [a, b, c, d] = question.options();
    format!(
        "{text}{sep}{a}{sep}{b}{sep}{c}{sep}{d}{sep}{correct}{sep}{difficulty}",
        text = question.text(),
        sep = FIELD_DELIMITER,
        correct = question.correct().value(),
        difficulty = question.difficulty().value(),
    )
}

pub(crate) fn parse_question_line(line: &str) -> Result<Question, StorageError> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    let [text, a, b, c, d, correct, difficulty] = fields.as_slice() else {
        return Err(StorageError::Serialization(format!(
            "expected {QUESTION_FIELDS} fields, found {}",
            fields.len()
        )));
    };

    QuestionDraft {
        text: (*text).to_owned(),
        options: [
            (*a).to_owned(),
            (*b).to_owned(),
            (*c).to_owned(),
            (*d).to_owned(),
        ],
        correct: parse_number("correct answer", correct)?,
        difficulty: parse_number("difficulty", difficulty)?,
    }
    .validate()
    .map_err(ser)
}

/// `playerName nextQuestionIndex score`, without line ending.
pub(crate) fn format_checkpoint(state: &SessionState) -> String {
    format!(
        "{} {} {}",
        state.player(),
        state.next_question_index(),
        state.score()
    )
}

/// Reads the first three whitespace-delimited tokens; anything after is ignored.
pub(crate) fn parse_checkpoint(contents: &str) -> Result<SessionState, StorageError> {
    let mut tokens = contents.split_whitespace();
    let (Some(name), Some(index), Some(score)) = (tokens.next(), tokens.next(), tokens.next())
    else {
        return Err(StorageError::Serialization(
            "checkpoint needs a name, a question index and a score".into(),
        ));
    };

    let player = PlayerName::new(name).map_err(ser)?;
    Ok(SessionState::from_persisted(
        player,
        parse_number("question index", index)?,
        parse_number("score", score)?,
    ))
}

/// `name score`, without line ending.
pub(crate) fn format_leaderboard_line(entry: &LeaderboardEntry) -> String {
    format!("{} {}", entry.name, entry.score)
}

pub(crate) fn parse_leaderboard_line(line: &str) -> Result<LeaderboardEntry, StorageError> {
    let mut tokens = line.split_whitespace();
    let (Some(name), Some(score), None) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Err(StorageError::Serialization(format!(
            "expected `name score`, found {line:?}"
        )));
    };

    Ok(LeaderboardEntry::new(
        PlayerName::new(name).map_err(ser)?,
        parse_number("score", score)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trivia_core::model::Difficulty;

    const LINE: &str = "Largest planet?|Mars|Jupiter|Venus|Earth|2|1";

    #[test]
    fn question_line_round_trips_all_fields() {
        let q = parse_question_line(LINE).unwrap();
        assert_eq!(q.text(), "Largest planet?");
        assert_eq!(q.options()[1], "Jupiter");
        assert_eq!(q.correct().value(), 2);
        assert_eq!(q.difficulty(), Difficulty::Easy);
        assert_eq!(format_question_line(&q), LINE);
    }

    #[test]
    fn question_fields_keep_inner_spaces() {
        let q = parse_question_line("Who wrote Hamlet? | Shakespeare |Marlowe|Jonson|Kyd| 1 |3")
            .unwrap();
        assert_eq!(q.text(), "Who wrote Hamlet? ");
        assert_eq!(q.options()[0], " Shakespeare ");
        assert_eq!(q.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn question_line_with_wrong_field_count_is_rejected() {
        let err = parse_question_line("Q|a|b|c|1|1").unwrap_err();
        assert!(matches!(err, StorageError::Serialization(_)));
        assert!(parse_question_line("Q|a|b|c|d|1|1|extra").is_err());
    }

    #[test]
    fn question_line_with_bad_numbers_is_rejected() {
        assert!(parse_question_line("Q|a|b|c|d|x|1").is_err());
        assert!(parse_question_line("Q|a|b|c|d|5|1").is_err());
        assert!(parse_question_line("Q|a|b|c|d|1|4").is_err());
    }

    #[test]
    fn checkpoint_parses_three_tokens() {
        let state = parse_checkpoint("ada 3 5\n").unwrap();
        assert_eq!(state.player().as_str(), "ada");
        assert_eq!(state.next_question_index(), 3);
        assert_eq!(state.score(), 5);
        assert_eq!(format_checkpoint(&state), "ada 3 5");
    }

    #[test]
    fn checkpoint_missing_tokens_is_rejected() {
        assert!(parse_checkpoint("").is_err());
        assert!(parse_checkpoint("ada 3").is_err());
        assert!(parse_checkpoint("ada three 5").is_err());
        assert!(parse_checkpoint("ada 3 -1").is_err());
    }

    #[test]
    fn leaderboard_line_parses_name_and_score() {
        let entry = parse_leaderboard_line("ada 15").unwrap();
        assert_eq!(entry.name.as_str(), "ada");
        assert_eq!(entry.score, 15);
        assert_eq!(format_leaderboard_line(&entry), "ada 15");
        assert!(parse_leaderboard_line("ada").is_err());
        assert!(parse_leaderboard_line("ada 1 2").is_err());
    }
}
