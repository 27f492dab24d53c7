//! In-memory state of a running quiz session.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

use quiz_core::model::{Attempt, AttemptId, DomainTally, Question, QuizMode};

use crate::error::SessionError;
use crate::sessions::SessionProgress;

/// What the user learns right after answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct_index: usize,
    pub correct_option: String,
    pub explanation: String,
}

/// One quiz run from the first question to the saved attempt.
///
/// The session owns its question list and walks it strictly forward; every
/// answer updates the running score and the per-category tallies that later
/// become the attempt's domain stats. Once the last question is answered the
/// session is sealed and further answers are rejected.
pub struct QuizSession {
    mode: QuizMode,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    domain_correct: BTreeMap<String, u32>,
    domain_total: BTreeMap<String, u32>,
    total: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    attempt_id: Option<AttemptId>,
}

impl QuizSession {
    /// Start a session over the given questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` for an empty question list and
    /// `SessionError::TooManyQuestions` when the list does not fit the
    /// score counters.
    pub fn new(
        mode: QuizMode,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let total = u32::try_from(questions.len())
            .map_err(|_| SessionError::TooManyQuestions { len: questions.len() })?;

        Ok(Self {
            mode,
            questions,
            current: 0,
            score: 0,
            domain_correct: BTreeMap::new(),
            domain_total: BTreeMap::new(),
            total,
            started_at,
            completed_at: None,
            attempt_id: None,
        })
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Identifier assigned when the finished session was persisted.
    #[must_use]
    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.attempt_id
    }

    pub(crate) fn mark_persisted(&mut self, id: AttemptId) {
        self.attempt_id = Some(id);
    }

    /// The question awaiting an answer, or `None` once complete.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress::new(self.questions.len(), self.current)
    }

    /// Grade the current question and advance.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once all questions are answered and
    /// `SessionError::InvalidSelection` when `selected` is not a valid
    /// option index for the current question.
    pub fn answer_current(
        &mut self,
        selected: usize,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerFeedback, SessionError> {
        let Some(question) = self.questions.get(self.current) else {
            return Err(SessionError::Completed);
        };
        if selected >= question.options().len() {
            return Err(SessionError::InvalidSelection {
                selected,
                options: question.options().len(),
            });
        }

        let is_correct = selected == question.correct_answer();
        let category = question.category().to_string();

        let feedback = AnswerFeedback {
            is_correct,
            correct_index: question.correct_answer(),
            correct_option: question.correct_option().to_string(),
            explanation: question.explanation().to_string(),
        };

        if is_correct {
            self.score += 1;
            *self.domain_correct.entry(category.clone()).or_insert(0) += 1;
        }
        *self.domain_total.entry(category).or_insert(0) += 1;

        self.current += 1;
        if self.current >= self.questions.len() {
            self.completed_at = Some(answered_at);
        }

        Ok(feedback)
    }

    /// Freeze the finished session into a persistable attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Attempt` when the accumulated counters are
    /// inconsistent. Sessions keep `correct <= total` per category by
    /// construction, so this only fires on misuse.
    pub fn build_attempt(&self, completed_at: DateTime<Utc>) -> Result<Attempt, SessionError> {
        let mut domain_stats = BTreeMap::new();
        for (category, total) in &self.domain_total {
            let correct = self.domain_correct.get(category).copied().unwrap_or(0);
            domain_stats.insert(category.clone(), DomainTally::new(correct, *total)?);
        }

        let recorded_at = self.completed_at.unwrap_or(completed_at);
        Ok(Attempt::new(
            self.mode,
            self.score,
            self.total,
            domain_stats,
            recorded_at,
        )?)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.mode)
            .field("questions", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("completed_at", &self.completed_at)
            .field("attempt_id", &self.attempt_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn question(category: &str, correct: usize) -> Question {
        Question::new(
            format!("{category}?"),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
            category,
            false,
            "explained",
        )
        .unwrap()
    }

    fn session(questions: Vec<Question>) -> QuizSession {
        QuizSession::new(QuizMode::Practice, questions, fixed_now()).unwrap()
    }

    #[test]
    fn empty_question_list_is_rejected() {
        let err = QuizSession::new(QuizMode::Practice, Vec::new(), fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn feedback_reports_correct_option() {
        let mut s = session(vec![question("Risk", 2)]);
        let feedback = s.answer_current(0, fixed_now()).unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.correct_index, 2);
        assert_eq!(feedback.correct_option, "c");
        assert_eq!(feedback.explanation, "explained");
    }

    #[test]
    fn score_counts_correct_answers_only() {
        let mut s = session(vec![question("Risk", 0), question("Scope", 1)]);
        s.answer_current(0, fixed_now()).unwrap();
        s.answer_current(3, fixed_now()).unwrap();
        assert_eq!(s.score(), 1);
        assert!(s.is_complete());
    }

    #[test]
    fn out_of_range_selection_is_rejected_without_advancing() {
        let mut s = session(vec![question("Risk", 0)]);
        let err = s.answer_current(9, fixed_now()).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidSelection {
                selected: 9,
                options: 4
            }
        ));
        assert_eq!(s.progress().answered, 0);
        assert!(s.current_question().is_some());
    }

    #[test]
    fn answering_past_the_end_fails() {
        let mut s = session(vec![question("Risk", 0)]);
        s.answer_current(0, fixed_now()).unwrap();
        let err = s.answer_current(0, fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::Completed));
    }

    #[test]
    fn last_answer_stamps_completion() {
        let mut s = session(vec![question("Risk", 0)]);
        assert_eq!(s.completed_at(), None);
        s.answer_current(0, fixed_now()).unwrap();
        assert_eq!(s.completed_at(), Some(fixed_now()));
    }

    #[test]
    fn attempt_carries_domain_tallies() {
        let mut s = session(vec![
            question("Risk", 0),
            question("Risk", 1),
            question("Scope", 2),
        ]);
        s.answer_current(0, fixed_now()).unwrap(); // Risk correct
        s.answer_current(0, fixed_now()).unwrap(); // Risk wrong
        s.answer_current(2, fixed_now()).unwrap(); // Scope correct

        let attempt = s.build_attempt(fixed_now()).unwrap();
        assert_eq!(attempt.score(), 2);
        assert_eq!(attempt.total(), 3);

        let risk = &attempt.domain_stats()["Risk"];
        assert_eq!((risk.correct(), risk.total()), (1, 2));
        let scope = &attempt.domain_stats()["Scope"];
        assert_eq!((scope.correct(), scope.total()), (1, 1));
    }

    #[test]
    fn progress_walks_forward() {
        let mut s = session(vec![question("Risk", 0), question("Scope", 0)]);
        assert_eq!(s.progress(), SessionProgress::new(2, 0));
        s.answer_current(0, fixed_now()).unwrap();
        assert_eq!(s.progress(), SessionProgress::new(2, 1));
        s.answer_current(0, fixed_now()).unwrap();
        assert!(s.progress().is_complete);
    }
}
