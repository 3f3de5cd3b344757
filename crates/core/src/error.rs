use thiserror::Error;

/// Errors raised by the quiz session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for quiz")]
    Empty,

    #[error("progress snapshot covers {saved} questions but the quiz has {total}")]
    SnapshotLength { saved: usize, total: usize },

    #[error("progress snapshot index {index} is out of range for {total} questions")]
    SnapshotIndex { index: usize, total: usize },
}
