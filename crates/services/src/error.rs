//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::AttemptError;
use storage::repository::StorageError;

/// Errors emitted by quiz session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for this session")]
    Empty,

    #[error("session already completed")]
    Completed,

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },

    #[error("selected option {selected} is out of range for {options} options")]
    InvalidSelection { selected: usize, options: usize },

    #[error("mock exams require a Pro entitlement")]
    ProRequired,

    #[error(transparent)]
    Attempt(#[from] AttemptError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
