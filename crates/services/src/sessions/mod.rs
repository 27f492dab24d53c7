//! Quiz session state machine and the persistence workflow around it.

mod progress;
mod service;
mod workflow;

pub use progress::SessionProgress;
pub use service::{AnswerFeedback, QuizSession};
pub use workflow::{QuizLoopService, SessionAnswerResult};
