//! Metrics repository (`system_metrics`): append-only samples with retention pruning.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::StorageError;
use crate::models::MetricRecord;
use crate::sqlite_pool::SqlitePoolManager;

/// Metrics under this prefix are business records and survive retention pruning.
pub const RETAINED_METRIC_PREFIX: &str = "payments.";

#[derive(Clone)]
pub struct MetricsRepository {
    pool_manager: SqlitePoolManager,
}

impl MetricsRepository {
    pub(crate) fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn record(&self, name: &str, value: f64) -> Result<(), StorageError> {
        self.record_at(name, value, Utc::now()).await
    }

    pub async fn record_at(
        &self,
        name: &str,
        value: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO system_metrics (metric_name, metric_value, timestamp) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(value)
        .bind(timestamp)
        .execute(self.pool_manager.pool())
        .await?;
        Ok(())
    }

    /// Writes one snapshot (several metrics, same timestamp) in a single transaction.
    pub async fn record_many(&self, samples: &[(String, f64)]) -> Result<(), StorageError> {
        let now = Utc::now();
        let mut tx = self.pool_manager.pool().begin().await?;
        for (name, value) in samples {
            sqlx::query(
                "INSERT INTO system_metrics (metric_name, metric_value, timestamp) VALUES (?, ?, ?)",
            )
            .bind(name)
            .bind(value)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Newest samples first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<MetricRecord>, StorageError> {
        let records = sqlx::query_as::<_, MetricRecord>(
            "SELECT * FROM system_metrics ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(records)
    }

    pub async fn latest(&self, name: &str) -> Result<Option<MetricRecord>, StorageError> {
        let record = sqlx::query_as::<_, MetricRecord>(
            "SELECT * FROM system_metrics WHERE metric_name = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(record)
    }

    pub async fn sum_since(&self, name: &str, since: DateTime<Utc>) -> Result<f64, StorageError> {
        let (sum,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(metric_value), 0.0) FROM system_metrics WHERE metric_name = ? AND timestamp >= ?",
        )
        .bind(name)
        .bind(since)
        .fetch_one(self.pool_manager.pool())
        .await?;
        Ok(sum)
    }

    pub async fn count_since(&self, name: &str, since: DateTime<Utc>) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM system_metrics WHERE metric_name = ? AND timestamp >= ?",
        )
        .bind(name)
        .bind(since)
        .fetch_one(self.pool_manager.pool())
        .await?;
        Ok(count)
    }

    /// Deletes samples older than `cutoff`; returns the number of rows removed.
    /// Rows named under [`RETAINED_METRIC_PREFIX`] are kept.
    pub async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "DELETE FROM system_metrics WHERE timestamp < ? AND substr(metric_name, 1, ?) != ?",
        )
        .bind(cutoff)
        .bind(RETAINED_METRIC_PREFIX.len() as i64)
        .bind(RETAINED_METRIC_PREFIX)
        .execute(self.pool_manager.pool())
        .await?;

        if result.rows_affected() > 0 {
            info!(
                deleted = result.rows_affected(),
                cutoff = %cutoff,
                "Pruned old metric samples"
            );
        }
        Ok(result.rows_affected())
    }
}
