use quiz_core::model::{Attempt, AttemptId};

use super::SqliteRepository;
use super::mapping::{encode_domain_stats, map_attempt_row, mode_to_str};
use crate::repository::{AttemptRepository, StorageError};

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: &Attempt) -> Result<AttemptId, StorageError> {
        let domain_stats = encode_domain_stats(attempt.domain_stats())?;

        let res = sqlx::query(
            r"
                INSERT INTO attempts (
                    recorded_at, mode, score, total, percentage, domain_stats
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(attempt.recorded_at())
        .bind(mode_to_str(attempt.mode()))
        .bind(i64::from(attempt.score()))
        .bind(i64::from(attempt.total()))
        .bind(attempt.percentage())
        .bind(domain_stats)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(AttemptId::new(res.last_insert_rowid()))
    }

    async fn list_attempts(&self) -> Result<Vec<Attempt>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT recorded_at, mode, score, total, percentage, domain_stats
                FROM attempts
                ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_attempt_row(&row)?);
        }

        Ok(out)
    }
}
