mod attempt;
mod ids;
mod question;
mod user;

pub use attempt::{Attempt, AttemptError, DomainTally, QuizMode};
pub use ids::AttemptId;
pub use question::{Question, QuestionError};
pub use user::UserContext;
