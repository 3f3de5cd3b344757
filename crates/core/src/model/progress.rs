use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PROGRESS_KEY_PREFIX: &str = "quiz_progress:";

/// Storage key for the saved progress of one test.
#[must_use]
pub fn progress_key(test: &str) -> String {
    format!("{PROGRESS_KEY_PREFIX}{test}")
}

/// Serializable snapshot of a quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProgress {
    pub current_index: usize,
    pub score: usize,
    pub remaining_seconds: Option<u32>,
    pub answers: Vec<Option<usize>>,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_prefixed_with_test_name() {
        assert_eq!(progress_key("set_1.json"), "quiz_progress:set_1.json");
    }
}
