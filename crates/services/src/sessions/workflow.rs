//! Drives sessions end to end: selection, answering, persistence.

use std::sync::Arc;

use rand::Rng;

use quiz_core::Clock;
use quiz_core::model::{AttemptId, Question, QuizMode, UserContext};
use storage::repository::AttemptRepository;

use crate::adaptive::{self, MockExamBuilder};
use crate::analytics::latest_weakest_domain;
use crate::error::SessionError;
use crate::sessions::{AnswerFeedback, QuizSession};

/// Outcome of answering one question through the loop service.
///
/// When the answer completed the session, `attempt_id` carries the id the
/// persisted attempt received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionAnswerResult {
    pub feedback: AnswerFeedback,
    pub is_complete: bool,
    pub attempt_id: Option<AttemptId>,
}

/// Orchestrates the quiz loop over a question pool and the attempt store.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    attempts: Arc<dyn AttemptRepository>,
    practice_size: usize,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(attempts: Arc<dyn AttemptRepository>) -> Self {
        Self {
            clock: Clock::Default,
            attempts,
            practice_size: adaptive::PRACTICE_SET_SIZE,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_practice_size(mut self, practice_size: usize) -> Self {
        self.practice_size = practice_size;
        self
    }

    /// Start a free practice session from the free-tier pool.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` when no free-tier questions exist.
    pub fn start_practice<R: Rng + ?Sized>(
        &self,
        pool: &[Question],
        rng: &mut R,
    ) -> Result<QuizSession, SessionError> {
        let questions = adaptive::build_practice_set(pool, self.practice_size, rng);
        QuizSession::new(QuizMode::Practice, questions, self.clock.now())
    }

    /// Start an adaptive mock exam for a Pro user.
    ///
    /// Looks up the history to find the weakest domain of the most recent
    /// attempt and biases the exam toward it. A user without history gets an
    /// unweighted exam.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::ProRequired` for free users,
    /// `SessionError::Empty` when no pro questions exist, and storage errors
    /// from the history lookup.
    pub async fn start_mock<R: Rng + ?Sized>(
        &self,
        pool: &[Question],
        user: &UserContext,
        rng: &mut R,
    ) -> Result<QuizSession, SessionError> {
        if !user.is_pro {
            return Err(SessionError::ProRequired);
        }

        let history = self.attempts.list_attempts().await?;
        let weakest = latest_weakest_domain(&history);
        if let Some(domain) = &weakest {
            tracing::info!(%domain, "weighting mock exam toward weakest domain");
        }

        let questions = MockExamBuilder::new().build(pool, weakest.as_deref(), rng);
        QuizSession::new(QuizMode::Mock, questions, self.clock.now())
    }

    /// Answer the current question; persists the attempt when this answer
    /// completes the session.
    ///
    /// # Errors
    ///
    /// Propagates grading errors from the session and storage errors from
    /// the save. On a storage error the session stays completed and can be
    /// retried through [`Self::finalize_attempt`].
    pub async fn answer_current(
        &self,
        session: &mut QuizSession,
        selected: usize,
    ) -> Result<SessionAnswerResult, SessionError> {
        let feedback = session.answer_current(selected, self.clock.now())?;

        let attempt_id = if session.is_complete() {
            Some(self.finalize_attempt(session).await?)
        } else {
            None
        };

        Ok(SessionAnswerResult {
            feedback,
            is_complete: session.is_complete(),
            attempt_id,
        })
    }

    /// Persist a completed session, once.
    ///
    /// Idempotent after success: a session that already has an attempt id
    /// returns it without writing again.
    ///
    /// # Errors
    ///
    /// Returns attempt-construction and storage errors.
    pub async fn finalize_attempt(
        &self,
        session: &mut QuizSession,
    ) -> Result<AttemptId, SessionError> {
        if let Some(id) = session.attempt_id() {
            return Ok(id);
        }

        let attempt = session.build_attempt(self.clock.now())?;
        let id = self.attempts.append_attempt(&attempt).await?;
        session.mark_persisted(id);
        tracing::info!(
            id = id.value(),
            mode = %attempt.mode(),
            score = attempt.score(),
            total = attempt.total(),
            "persisted quiz attempt"
        );
        Ok(id)
    }
}

impl std::fmt::Debug for QuizLoopService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizLoopService")
            .field("clock", &self.clock)
            .field("practice_size", &self.practice_size)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
