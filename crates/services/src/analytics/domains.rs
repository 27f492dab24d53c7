//! Domain statistics aggregation over the attempt history.

use std::collections::BTreeMap;

use quiz_core::model::Attempt;

/// Per-category list of per-attempt percentages.
///
/// Each attempt that touched a category with at least one question
/// contributes one `correct/total * 100` observation. Domains with a zero
/// total are skipped (division guard), and a `BTreeMap` keeps iteration
/// order deterministic across runs.
pub fn domain_percentages<'a>(
    attempts: impl IntoIterator<Item = &'a Attempt>,
) -> BTreeMap<String, Vec<f64>> {
    let mut scores: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for attempt in attempts {
        for (domain, tally) in attempt.domain_stats() {
            if let Some(percent) = tally.percentage() {
                scores.entry(domain.clone()).or_default().push(percent);
            }
        }
    }
    scores
}

/// Arithmetic mean per category over the whole history.
///
/// Contains only categories with at least one valid observation; an empty
/// input yields an empty map. Pure over its input, so repeated calls on an
/// unchanged history return identical results.
#[allow(clippy::cast_precision_loss)]
pub fn averaged_domains<'a>(
    attempts: impl IntoIterator<Item = &'a Attempt>,
) -> BTreeMap<String, f64> {
    domain_percentages(attempts)
        .into_iter()
        .map(|(domain, scores)| {
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            (domain, mean)
        })
        .collect()
}

/// Weakest domain of the single most recent attempt.
///
/// This is the signal used to bias the next adaptive mock exam. It looks at
/// the latest attempt only, deliberately distinct from the all-time weakest
/// domain reported on the scorecard by [`super::PerformanceReport`]. Ties go
/// to the first category in iteration order.
pub fn latest_weakest_domain(attempts: &[Attempt]) -> Option<String> {
    let latest = attempts.last()?;

    let mut weakest: Option<(&str, f64)> = None;
    for (domain, tally) in latest.domain_stats() {
        let Some(percent) = tally.percentage() else {
            continue;
        };
        match weakest {
            Some((_, best)) if percent >= best => {}
            _ => weakest = Some((domain, percent)),
        }
    }

    weakest.map(|(domain, _)| domain.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{DomainTally, QuizMode};
    use quiz_core::time::fixed_now;

    fn attempt_with(stats: &[(&str, u32, u32)]) -> Attempt {
        let mut map = BTreeMap::new();
        let mut score = 0;
        let mut total = 0;
        for (domain, correct, domain_total) in stats {
            map.insert(
                (*domain).to_string(),
                DomainTally::new(*correct, *domain_total).unwrap(),
            );
            score += correct;
            total += domain_total;
        }
        Attempt::new(QuizMode::Mock, score, total.max(1), map, fixed_now()).unwrap()
    }

    #[test]
    fn empty_history_yields_empty_averages() {
        let attempts: Vec<Attempt> = Vec::new();
        assert!(averaged_domains(&attempts).is_empty());
    }

    #[test]
    fn percentages_collect_one_observation_per_attempt() {
        let attempts = vec![
            attempt_with(&[("Risk", 5, 10), ("Scope", 8, 10)]),
            attempt_with(&[("Risk", 10, 10)]),
        ];
        let scores = domain_percentages(&attempts);
        assert_eq!(scores["Risk"], vec![50.0, 100.0]);
        assert_eq!(scores["Scope"], vec![80.0]);
    }

    #[test]
    fn zero_total_domains_are_skipped() {
        let attempts = vec![attempt_with(&[("Risk", 0, 0), ("Scope", 4, 5)])];
        let averaged = averaged_domains(&attempts);
        assert!(!averaged.contains_key("Risk"));
        assert_eq!(averaged["Scope"], 80.0);
    }

    #[test]
    fn averages_are_arithmetic_means() {
        let attempts = vec![
            attempt_with(&[("Risk", 5, 10)]),
            attempt_with(&[("Risk", 10, 10)]),
        ];
        let averaged = averaged_domains(&attempts);
        assert_eq!(averaged["Risk"], 75.0);
    }

    #[test]
    fn aggregation_is_idempotent() {
        let attempts = vec![
            attempt_with(&[("Risk", 5, 10), ("Scope", 8, 10)]),
            attempt_with(&[("Risk", 7, 10)]),
        ];
        assert_eq!(averaged_domains(&attempts), averaged_domains(&attempts));
    }

    #[test]
    fn latest_weakest_uses_most_recent_attempt_only() {
        let attempts = vec![
            // Historically Scope is terrible...
            attempt_with(&[("Scope", 0, 10), ("Risk", 9, 10)]),
            // ...but the latest attempt says Risk is the weak spot.
            attempt_with(&[("Scope", 9, 10), ("Risk", 2, 10)]),
        ];
        assert_eq!(latest_weakest_domain(&attempts), Some("Risk".to_string()));
    }

    #[test]
    fn latest_weakest_is_none_for_empty_history() {
        assert_eq!(latest_weakest_domain(&[]), None);
    }

    #[test]
    fn latest_weakest_tie_breaks_deterministically() {
        let attempts = vec![attempt_with(&[("Alpha", 1, 2), ("Beta", 1, 2)])];
        for _ in 0..3 {
            assert_eq!(
                latest_weakest_domain(&attempts),
                Some("Alpha".to_string()),
                "first category in iteration order wins ties"
            );
        }
    }
}
