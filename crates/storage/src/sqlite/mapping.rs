use quiz_core::model::{Attempt, DomainTally, QuizMode};
use serde_json::Value;
use sqlx::Row;
use std::collections::BTreeMap;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Storage encoding for the quiz mode column.
pub(crate) fn mode_to_str(mode: QuizMode) -> &'static str {
    match mode {
        QuizMode::Practice => "practice",
        QuizMode::Mock => "mock",
    }
}

/// This must stay consistent with `mode_to_str`.
pub(crate) fn parse_quiz_mode(s: &str) -> Result<QuizMode, StorageError> {
    match s {
        "practice" => Ok(QuizMode::Practice),
        "mock" => Ok(QuizMode::Mock),
        _ => Err(StorageError::Serialization(format!("invalid mode: {s}"))),
    }
}

pub(crate) fn encode_domain_stats(
    stats: &BTreeMap<String, DomainTally>,
) -> Result<String, StorageError> {
    serde_json::to_string(stats).map_err(ser)
}

/// Lenient decoder for the persisted `domain_stats` JSON column.
///
/// Persisted data may predate schema changes, so malformed values never fail
/// a listing: an absent, null, or non-object value decodes to an empty map,
/// and entries that are not well-formed `{correct, total}` tallies are
/// dropped. An attempt decoded this way simply contributes nothing to domain
/// aggregation.
pub(crate) fn decode_domain_stats(raw: Option<&str>) -> BTreeMap<String, DomainTally> {
    let mut stats = BTreeMap::new();

    let Some(raw) = raw else {
        return stats;
    };
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return stats;
    };
    let Some(object) = value.as_object() else {
        return stats;
    };

    for (domain, entry) in object {
        let Some(entry) = entry.as_object() else {
            continue;
        };
        let correct = entry
            .get("correct")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok());
        let total = entry
            .get("total")
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok());
        let (Some(correct), Some(total)) = (correct, total) else {
            continue;
        };
        let Ok(tally) = DomainTally::new(correct, total) else {
            continue;
        };
        stats.insert(domain.clone(), tally);
    }

    stats
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<Attempt, StorageError> {
    let recorded_at: chrono::DateTime<chrono::Utc> = row.try_get("recorded_at").map_err(ser)?;
    let mode_str: String = row.try_get("mode").map_err(ser)?;
    let mode = parse_quiz_mode(mode_str.as_str())?;
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let total = u32_from_i64("total", row.try_get::<i64, _>("total").map_err(ser)?)?;
    let percentage: f64 = row.try_get("percentage").map_err(ser)?;

    let raw_stats: Option<String> = row.try_get("domain_stats").map_err(ser)?;
    let domain_stats = decode_domain_stats(raw_stats.as_deref());

    Attempt::from_persisted(mode, score, total, percentage, domain_stats, recorded_at).map_err(ser)
}
