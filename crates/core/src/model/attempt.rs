use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("attempt must contain at least one question")]
    EmptyAttempt,

    #[error("score ({score}) cannot exceed total ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("domain tally has more correct answers ({correct}) than questions ({total})")]
    TallyExceedsTotal { correct: u32, total: u32 },
}

//
// ─── QUIZ MODE ─────────────────────────────────────────────────────────────────
//

/// The two kinds of quiz session a user can run.
///
/// Practice sessions draw from the free question pool; mock sessions simulate
/// the full exam over the pro pool and feed the advanced analytics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizMode {
    Practice,
    Mock,
}

impl QuizMode {
    /// Wall-clock budget for a session in this mode, if any.
    ///
    /// Mock exams run on the real PMP budget of 180 minutes. The countdown
    /// presentation is owned by the UI layer.
    #[must_use]
    pub fn time_limit(self) -> Option<Duration> {
        match self {
            QuizMode::Practice => None,
            QuizMode::Mock => Some(Duration::minutes(180)),
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::Practice => write!(f, "Practice"),
            QuizMode::Mock => write!(f, "Mock"),
        }
    }
}

//
// ─── DOMAIN TALLY ──────────────────────────────────────────────────────────────
//

/// Correct/total counts for one knowledge domain within a single attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DomainTally {
    correct: u32,
    total: u32,
}

impl DomainTally {
    /// Create a tally, enforcing `correct <= total`.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::TallyExceedsTotal` when more answers are marked
    /// correct than questions were asked.
    pub fn new(correct: u32, total: u32) -> Result<Self, AttemptError> {
        if correct > total {
            return Err(AttemptError::TallyExceedsTotal { correct, total });
        }
        Ok(Self { correct, total })
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Percentage of correct answers, or `None` when the domain received no
    /// questions (division guard).
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(f64::from(self.correct) / f64::from(self.total) * 100.0)
    }
}

//
// ─── ATTEMPT ───────────────────────────────────────────────────────────────────
//

/// Summary record of one completed quiz session.
///
/// The percentage is computed exactly once when the attempt is created and is
/// carried as stored from then on; readers trust the persisted value and
/// never recompute it.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    recorded_at: DateTime<Utc>,
    mode: QuizMode,
    score: u32,
    total: u32,
    percentage: f64,
    domain_stats: BTreeMap<String, DomainTally>,
}

impl Attempt {
    /// Build a new attempt at save time, freezing the percentage.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError::EmptyAttempt` when `total` is zero and
    /// `AttemptError::ScoreExceedsTotal` when `score > total`.
    pub fn new(
        mode: QuizMode,
        score: u32,
        total: u32,
        domain_stats: BTreeMap<String, DomainTally>,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        if total == 0 {
            return Err(AttemptError::EmptyAttempt);
        }
        if score > total {
            return Err(AttemptError::ScoreExceedsTotal { score, total });
        }

        let percentage = f64::from(score) / f64::from(total) * 100.0;
        Ok(Self {
            recorded_at,
            mode,
            score,
            total,
            percentage,
            domain_stats,
        })
    }

    /// Rehydrate an attempt from storage.
    ///
    /// The stored percentage is trusted as-is rather than recomputed, so
    /// attempts round-trip bit-for-bit even if the write-side formula ever
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` when the stored counts are inconsistent.
    pub fn from_persisted(
        mode: QuizMode,
        score: u32,
        total: u32,
        percentage: f64,
        domain_stats: BTreeMap<String, DomainTally>,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        if total == 0 {
            return Err(AttemptError::EmptyAttempt);
        }
        if score > total {
            return Err(AttemptError::ScoreExceedsTotal { score, total });
        }

        Ok(Self {
            recorded_at,
            mode,
            score,
            total,
            percentage,
            domain_stats,
        })
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
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

    /// The percentage frozen at save time.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// Per-domain tallies for the categories that appeared in this attempt.
    #[must_use]
    pub fn domain_stats(&self) -> &BTreeMap<String, DomainTally> {
        &self.domain_stats
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
