//! Loader for the read-only question bank file.
//!
//! The bank is a JSON array of questions shipped with the app. Unlike the
//! attempt log it is a build artifact, so an invalid entry fails the load
//! instead of being skipped.

use std::fs;
use std::path::Path;

use quiz_core::model::Question;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a question bank from its raw JSON text.
///
/// # Errors
///
/// Returns `QuestionBankError::Parse` if the JSON is malformed or any
/// question fails validation.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>, QuestionBankError> {
    Ok(serde_json::from_str::<Vec<Question>>(raw)?)
}

/// Load the question bank from a JSON file.
///
/// # Errors
///
/// Returns `QuestionBankError::Io` if the file cannot be read, or
/// `QuestionBankError::Parse` if its contents are invalid.
pub fn load_questions(path: impl AsRef<Path>) -> Result<Vec<Question>, QuestionBankError> {
    let raw = fs::read_to_string(path)?;
    let questions = parse_questions(&raw)?;
    tracing::debug!(count = questions.len(), "loaded question bank");
    Ok(questions)
}
