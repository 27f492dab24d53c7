#![forbid(unsafe_code)]

pub mod adaptive;
pub mod analytics;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use adaptive::{MockExamBuilder, build_practice_set};
pub use analytics::{PerformanceReport, Recommendation, Trend, WeaknessSeverity};
pub use error::SessionError;
pub use sessions::{
    AnswerFeedback, QuizLoopService, QuizSession, SessionAnswerResult, SessionProgress,
};
