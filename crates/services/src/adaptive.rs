//! Adaptive question selection for mock exams and practice sets.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::BTreeMap;

use quiz_core::model::Question;

/// Nominal question count of a full mock exam.
pub const MOCK_EXAM_SIZE: usize = 180;

/// Question count of a free practice session.
pub const PRACTICE_SET_SIZE: usize = 25;

/// Builds a category-weighted mock exam from the pro question pool.
///
/// Quotas are distributed evenly across categories, then biased toward a
/// caller-supplied weakest domain: that category gains `boost` slots while
/// every other category sheds one, but never below `floor`. The rebalance is
/// deliberately approximate; combined with per-category pool caps the final
/// selection can land above or below `target`, and callers read the actual
/// length rather than assuming the nominal size.
#[derive(Debug, Clone)]
pub struct MockExamBuilder {
    target: usize,
    boost: usize,
    floor: usize,
}

impl MockExamBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            target: MOCK_EXAM_SIZE,
            boost: 10,
            floor: 5,
        }
    }

    /// Override the nominal exam size.
    #[must_use]
    pub fn with_target(mut self, target: usize) -> Self {
        self.target = target;
        self
    }

    /// Override the slots added to the weakest category.
    #[must_use]
    pub fn with_boost(mut self, boost: usize) -> Self {
        self.boost = boost;
        self
    }

    /// Override the per-category quota floor.
    #[must_use]
    pub fn with_floor(mut self, floor: usize) -> Self {
        self.floor = floor;
        self
    }

    /// Assemble the exam.
    ///
    /// Only `is_pro` questions are eligible. A `weakest` category absent
    /// from the pool is ignored and the distribution stays unweighted. Zero
    /// eligible categories yield an empty selection, not an error.
    pub fn build<R: Rng + ?Sized>(
        &self,
        pool: &[Question],
        weakest: Option<&str>,
        rng: &mut R,
    ) -> Vec<Question> {
        let mut groups: BTreeMap<&str, Vec<&Question>> = BTreeMap::new();
        for question in pool.iter().filter(|q| q.is_pro()) {
            groups.entry(question.category()).or_default().push(question);
        }
        if groups.is_empty() {
            return Vec::new();
        }

        // Even split, remainder to the first categories in iteration order.
        let base = self.target / groups.len();
        let remainder = self.target - base * groups.len();
        let mut quotas: BTreeMap<&str, usize> = groups.keys().map(|cat| (*cat, base)).collect();
        for (i, quota) in quotas.values_mut().enumerate() {
            if i < remainder {
                *quota += 1;
            }
        }

        if let Some(weak) = weakest.filter(|w| quotas.contains_key(*w)) {
            if let Some(quota) = quotas.get_mut(weak) {
                *quota += self.boost;
            }
            for (&cat, quota) in &mut quotas {
                if cat != weak && *quota > self.floor {
                    *quota -= 1;
                }
            }
        }

        let mut selected: Vec<Question> = Vec::new();
        for (cat, questions) in &groups {
            let take = quotas.get(cat).copied().unwrap_or(0).min(questions.len());
            selected.extend(
                questions
                    .choose_multiple(rng, take)
                    .map(|question| (*question).clone()),
            );
        }
        selected.shuffle(rng);

        tracing::debug!(
            requested = self.target,
            selected = selected.len(),
            weakest = weakest.unwrap_or("none"),
            "built adaptive mock exam"
        );
        selected
    }
}

impl Default for MockExamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform sample of free-tier questions for a practice session.
///
/// Draws `min(count, pool)` questions without replacement and shuffles the
/// result. No category weighting applies to practice.
pub fn build_practice_set<R: Rng + ?Sized>(
    pool: &[Question],
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    let free: Vec<&Question> = pool.iter().filter(|q| !q.is_pro()).collect();
    let take = count.min(free.len());
    let mut selected: Vec<Question> = free
        .choose_multiple(rng, take)
        .map(|question| (*question).clone())
        .collect();
    selected.shuffle(rng);
    selected
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
