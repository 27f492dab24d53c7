use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question category cannot be empty")]
    EmptyCategory,

    #[error("question must offer at least two options")]
    TooFewOptions,

    #[error("correct answer index {index} is out of range for {options} options")]
    AnswerOutOfRange { index: usize, options: usize },
}

fn default_explanation() -> String {
    "No explanation provided.".to_string()
}

/// Raw question-bank entry before validation.
#[derive(Debug, Deserialize)]
struct QuestionRecord {
    question: String,
    options: Vec<String>,
    correct_answer: usize,
    category: String,
    #[serde(default)]
    is_pro: bool,
    #[serde(default = "default_explanation")]
    explanation: String,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// One multiple-choice question from the bank.
///
/// Questions are read-only to the rest of the system: sessions, analytics,
/// and selection only ever inspect them. Deserialization goes through the
/// same validation as [`Question::new`], so the answer index is always in
/// range for an instance that exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    #[serde(rename = "question")]
    prompt: String,
    options: Vec<String>,
    correct_answer: usize,
    category: String,
    is_pro: bool,
    explanation: String,
}

impl Question {
    /// Validate and build a question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt or category is empty, fewer
    /// than two options are offered, or the answer index is out of range.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
        category: impl Into<String>,
        is_pro: bool,
        explanation: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let category = category.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if category.trim().is_empty() {
            return Err(QuestionError::EmptyCategory);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions);
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                index: correct_answer,
                options: options.len(),
            });
        }

        Ok(Self {
            prompt,
            options,
            correct_answer,
            category,
            is_pro,
            explanation: explanation.into(),
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Zero-based index of the correct option.
    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// Text of the correct option. In range by construction.
    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer]
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Whether the question belongs to the paid tier.
    #[must_use]
    pub fn is_pro(&self) -> bool {
        self.is_pro
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(
            record.question,
            record.options,
            record.correct_answer,
            record.category,
            record.is_pro,
            record.explanation,
        )
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
