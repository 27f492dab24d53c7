//! Scorecard computation over a mode-filtered attempt history.

use std::collections::BTreeMap;

use quiz_core::model::{Attempt, QuizMode};

use super::domains::averaged_domains;

/// Number of most recent attempts considered for trend and stability.
pub const RECENT_WINDOW: usize = 5;

/// Knowledge domains on the real exam, used for coverage reporting.
pub const TOTAL_EXAM_DOMAINS: usize = 10;

//
// ─── TREND ─────────────────────────────────────────────────────────────────────
//

/// Direction of recent performance relative to the lifetime average.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl Trend {
    fn from_averages(recent: f64, lifetime: f64) -> Self {
        if recent > lifetime {
            Trend::Improving
        } else if recent < lifetime {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }
}

//
// ─── WEAKNESS SEVERITY ─────────────────────────────────────────────────────────
//

/// How badly the weakest domain is lagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaknessSeverity {
    /// Averaged percentage below 50.
    Critical,
    /// Averaged percentage in [50, 70).
    Moderate,
    /// Averaged percentage at or above 70.
    Minor,
}

impl WeaknessSeverity {
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent < 50.0 {
            WeaknessSeverity::Critical
        } else if percent < 70.0 {
            WeaknessSeverity::Moderate
        } else {
            WeaknessSeverity::Minor
        }
    }
}

//
// ─── RECOMMENDATION ────────────────────────────────────────────────────────────
//

/// Study recommendation derived from the readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    /// Readiness at or above 80.
    ExamReady,
    /// Readiness in [60, 80).
    GoodProgress,
    /// Readiness below 60.
    Fundamentals,
}

impl Recommendation {
    #[must_use]
    pub fn from_readiness(score: f64) -> Self {
        if score >= 80.0 {
            Recommendation::ExamReady
        } else if score >= 60.0 {
            Recommendation::GoodProgress
        } else {
            Recommendation::Fundamentals
        }
    }

    /// Human-readable guidance for this recommendation.
    #[must_use]
    pub fn guidance(self) -> &'static str {
        match self {
            Recommendation::ExamReady => {
                "You are exam-ready. Focus on mock simulation endurance."
            }
            Recommendation::GoodProgress => {
                "Good progress. Strengthen weak domains and improve stability."
            }
            Recommendation::Fundamentals => {
                "Focus on fundamentals. Increase structured practice."
            }
        }
    }
}

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// Performance scorecard over the attempts of a single quiz mode.
///
/// Built from stored percentages only; the frozen-at-write values are never
/// recomputed from score/total. All fields are plain data so the
/// presentation layer can format them freely.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub lifetime_average: f64,
    pub best_score: f64,
    /// Mean over the last [`RECENT_WINDOW`] attempts, fewer if the history
    /// is shorter. Never zero-padded.
    pub recent_average: f64,
    pub trend: Trend,
    /// `max(0, 100 - variance)` over the recent window; exactly 100 when the
    /// window holds at most one attempt.
    pub stability_score: f64,
    /// Mean of per-domain lifetime averages, one equal-weight vote per
    /// category regardless of question counts. Zero without domain data.
    pub domain_balance: f64,
    /// `0.5 * recent + 0.3 * lifetime + 0.2 * balance`, capped at 100.
    pub readiness_score: f64,
    pub recommendation: Recommendation,
    /// All-time strongest domain with its averaged percentage.
    pub strongest_domain: Option<(String, f64)>,
    /// All-time weakest domain with its averaged percentage. Computed over
    /// the full history, unlike the per-latest-attempt selection-bias signal
    /// from [`super::latest_weakest_domain`].
    pub weakest_domain: Option<(String, f64)>,
    pub weakness_severity: Option<WeaknessSeverity>,
    pub total_attempts: usize,
    pub total_questions_attempted: u64,
    /// Distinct domains with at least one observation, out of
    /// [`TOTAL_EXAM_DOMAINS`].
    pub domains_attempted: usize,
}

impl PerformanceReport {
    /// Build the scorecard for one quiz mode.
    ///
    /// Returns `None` when the history holds no attempts in that mode; this
    /// is the expected state for a new user, so callers branch on it rather
    /// than handling an error.
    #[must_use]
    pub fn for_mode(attempts: &[Attempt], mode: QuizMode) -> Option<Self> {
        let filtered: Vec<&Attempt> = attempts.iter().filter(|a| a.mode() == mode).collect();
        Self::from_filtered(&filtered)
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_filtered(attempts: &[&Attempt]) -> Option<Self> {
        if attempts.is_empty() {
            return None;
        }

        let percentages: Vec<f64> = attempts.iter().map(|a| a.percentage()).collect();
        let total_attempts = percentages.len();
        let lifetime_average = mean(&percentages);
        let best_score = percentages.iter().copied().fold(f64::MIN, f64::max);

        let window_start = percentages.len().saturating_sub(RECENT_WINDOW);
        let recent = &percentages[window_start..];
        let recent_average = mean(recent);
        let trend = Trend::from_averages(recent_average, lifetime_average);
        let stability_score = stability(recent);

        let averaged = averaged_domains(attempts.iter().copied());
        let domains_attempted = averaged.len();
        let domain_balance = if averaged.is_empty() {
            0.0
        } else {
            averaged.values().sum::<f64>() / averaged.len() as f64
        };

        let readiness_score =
            (recent_average * 0.5 + lifetime_average * 0.3 + domain_balance * 0.2).min(100.0);
        let recommendation = Recommendation::from_readiness(readiness_score);

        let (strongest_domain, weakest_domain) = extremes(&averaged);
        let weakness_severity = weakest_domain
            .as_ref()
            .map(|(_, percent)| WeaknessSeverity::from_percent(*percent));

        let total_questions_attempted = attempts.iter().map(|a| u64::from(a.total())).sum();

        Some(Self {
            lifetime_average,
            best_score,
            recent_average,
            trend,
            stability_score,
            domain_balance,
            readiness_score,
            recommendation,
            strongest_domain,
            weakest_domain,
            weakness_severity,
            total_attempts,
            total_questions_attempted,
            domains_attempted,
        })
    }
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Inverse-variance consistency score over the recent window.
///
/// A window of zero or one attempts carries no volatility evidence, so it
/// scores the ceiling of 100 by convention rather than by computation.
#[allow(clippy::cast_precision_loss)]
fn stability(window: &[f64]) -> f64 {
    if window.len() <= 1 {
        return 100.0;
    }
    let window_mean = mean(window);
    let variance = window
        .iter()
        .map(|x| (x - window_mean).powi(2))
        .sum::<f64>()
        / window.len() as f64;
    (100.0 - variance).max(0.0)
}

/// Argmax/argmin over the averaged domains.
///
/// Strict comparisons keep the first category in iteration order on ties,
/// which makes repeated calls over the same input return the same pick.
fn extremes(
    averaged: &BTreeMap<String, f64>,
) -> (Option<(String, f64)>, Option<(String, f64)>) {
    let mut strongest: Option<(&str, f64)> = None;
    let mut weakest: Option<(&str, f64)> = None;

    for (domain, &percent) in averaged {
        match strongest {
            Some((_, best)) if percent <= best => {}
            _ => strongest = Some((domain, percent)),
        }
        match weakest {
            Some((_, worst)) if percent >= worst => {}
            _ => weakest = Some((domain, percent)),
        }
    }

    (
        strongest.map(|(d, p)| (d.to_owned(), p)),
        weakest.map(|(d, p)| (d.to_owned(), p)),
    )
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::DomainTally;
    use quiz_core::time::fixed_now;
    use std::collections::BTreeMap;

    fn mock_attempt(score: u32, total: u32) -> Attempt {
        Attempt::new(QuizMode::Mock, score, total, BTreeMap::new(), fixed_now()).unwrap()
    }

    fn mock_attempt_with_domains(score: u32, total: u32, stats: &[(&str, u32, u32)]) -> Attempt {
        let mut map = BTreeMap::new();
        for (domain, correct, domain_total) in stats {
            map.insert(
                (*domain).to_string(),
                DomainTally::new(*correct, *domain_total).unwrap(),
            );
        }
        Attempt::new(QuizMode::Mock, score, total, map, fixed_now()).unwrap()
    }

    #[test]
    fn empty_mode_history_reports_no_data() {
        let attempts = vec![mock_attempt(10, 20)];
        assert!(PerformanceReport::for_mode(&attempts, QuizMode::Practice).is_none());
        assert!(PerformanceReport::for_mode(&attempts, QuizMode::Mock).is_some());
    }

    #[test]
    fn lifetime_average_is_arithmetic_mean() {
        let attempts = vec![
            mock_attempt(50, 100),
            mock_attempt(70, 100),
            mock_attempt(90, 100),
        ];
        let report = PerformanceReport::for_mode(&attempts, QuizMode::Mock).unwrap();
        assert!((report.lifetime_average - 70.0).abs() < f64::EPSILON);
        assert!((report.best_score - 90.0).abs() < f64::EPSILON);
        assert_eq!(report.total_attempts, 3);
        assert_eq!(report.total_questions_attempted, 300);
    }

    #[test]
    fn recent_window_uses_available_attempts_without_padding() {
        // Three attempts with a window of five: all three count, none padded.
        let attempts = vec![
            mock_attempt(40, 100),
            mock_attempt(60, 100),
            mock_attempt(80, 100),
        ];
        let report = PerformanceReport::for_mode(&attempts, QuizMode::Mock).unwrap();
        assert!((report.recent_average - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn recent_window_is_capped_at_five() {
        let mut attempts: Vec<Attempt> = (0..7).map(|_| mock_attempt(50, 100)).collect();
        attempts.extend((0..5).map(|_| mock_attempt(100, 100)));
        let report = PerformanceReport::for_mode(&attempts, QuizMode::Mock).unwrap();
        assert!((report.recent_average - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn trend_compares_recent_to_lifetime() {
        let improving = vec![mock_attempt(10, 100); 10]
            .into_iter()
            .chain(std::iter::once(mock_attempt(90, 100)))
            .collect::<Vec<_>>();
        let report = PerformanceReport::for_mode(&improving, QuizMode::Mock).unwrap();
        assert_eq!(report.trend, Trend::Improving);

        let stable = vec![mock_attempt(50, 100), mock_attempt(50, 100)];
        let report = PerformanceReport::for_mode(&stable, QuizMode::Mock).unwrap();
        assert_eq!(report.trend, Trend::Stable);
    }

    #[test]
    fn stability_is_ceiling_for_single_attempt() {
        let attempts = vec![mock_attempt(80, 100)];
        let report = PerformanceReport::for_mode(&attempts, QuizMode::Mock).unwrap();
        assert!((report.stability_score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stability_floors_at_zero_for_volatile_window() {
        // Window [100, 0]: mean 50, population variance 2500, stability 0.
        let attempts = vec![mock_attempt(100, 100), mock_attempt(0, 100)];
        let report = PerformanceReport::for_mode(&attempts, QuizMode::Mock).unwrap();
        assert!((report.stability_score - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn readiness_blends_recent_lifetime_and_balance() {
        // recent=80, lifetime=70, balance=60 => 0.5*80 + 0.3*70 + 0.2*60 = 73
        assert!((stability(&[80.0]) - 100.0).abs() < f64::EPSILON);
        let readiness: f64 = (80.0 * 0.5 + 70.0 * 0.3 + 60.0 * 0.2_f64).min(100.0);
        assert!((readiness - 73.0).abs() < 1e-9);
        assert_eq!(
            Recommendation::from_readiness(readiness),
            Recommendation::GoodProgress
        );
    }

    #[test]
    fn readiness_is_capped_at_100() {
        let attempts = vec![mock_attempt_with_domains(
            100,
            100,
            &[("Risk", 10, 10), ("Scope", 10, 10)],
        )];
        let report = PerformanceReport::for_mode(&attempts, QuizMode::Mock).unwrap();
        assert!(report.readiness_score <= 100.0);
        assert!((report.readiness_score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn domain_balance_weighs_categories_equally() {
        // Risk saw 100 questions, Scope only 2; both count once.
        let attempts = vec![mock_attempt_with_domains(
            52,
            102,
            &[("Risk", 50, 100), ("Scope", 2, 2)],
        )];
        let report = PerformanceReport::for_mode(&attempts, QuizMode::Mock).unwrap();
        assert!((report.domain_balance - 75.0).abs() < f64::EPSILON);
        assert_eq!(report.domains_attempted, 2);
    }

    #[test]
    fn extremes_pick_strongest_and_weakest() {
        let attempts = vec![mock_attempt_with_domains(
            15,
            30,
            &[("Cost", 9, 10), ("Risk", 2, 10), ("Scope", 4, 10)],
        )];
        let report = PerformanceReport::for_mode(&attempts, QuizMode::Mock).unwrap();
        assert_eq!(report.strongest_domain, Some(("Cost".to_string(), 90.0)));
        assert_eq!(report.weakest_domain, Some(("Risk".to_string(), 20.0)));
        assert_eq!(report.weakness_severity, Some(WeaknessSeverity::Critical));
    }

    #[test]
    fn extremes_tie_break_is_deterministic() {
        let attempts = vec![mock_attempt_with_domains(
            10,
            20,
            &[("Alpha", 5, 10), ("Beta", 5, 10)],
        )];
        for _ in 0..3 {
            let report = PerformanceReport::for_mode(&attempts, QuizMode::Mock).unwrap();
            assert_eq!(report.weakest_domain, Some(("Alpha".to_string(), 50.0)));
            assert_eq!(report.strongest_domain, Some(("Alpha".to_string(), 50.0)));
        }
    }

    #[test]
    fn severity_bands() {
        assert_eq!(
            WeaknessSeverity::from_percent(49.9),
            WeaknessSeverity::Critical
        );
        assert_eq!(
            WeaknessSeverity::from_percent(50.0),
            WeaknessSeverity::Moderate
        );
        assert_eq!(
            WeaknessSeverity::from_percent(69.9),
            WeaknessSeverity::Moderate
        );
        assert_eq!(WeaknessSeverity::from_percent(70.0), WeaknessSeverity::Minor);
    }

    #[test]
    fn recommendation_bands() {
        assert_eq!(
            Recommendation::from_readiness(80.0),
            Recommendation::ExamReady
        );
        assert_eq!(
            Recommendation::from_readiness(79.9),
            Recommendation::GoodProgress
        );
        assert_eq!(
            Recommendation::from_readiness(60.0),
            Recommendation::GoodProgress
        );
        assert_eq!(
            Recommendation::from_readiness(59.9),
            Recommendation::Fundamentals
        );
    }

    #[test]
    fn report_trusts_stored_percentages() {
        // A legacy row whose stored percentage disagrees with score/total:
        // the report must use the stored value.
        let attempt =
            Attempt::from_persisted(QuizMode::Mock, 5, 10, 47.5, BTreeMap::new(), fixed_now())
                .unwrap();
        let report = PerformanceReport::for_mode(&[attempt], QuizMode::Mock).unwrap();
        assert!((report.lifetime_average - 47.5).abs() < f64::EPSILON);
    }
}
