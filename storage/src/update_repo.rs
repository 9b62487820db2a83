//! Update history repository (`update_history`).
//!
//! One row per update attempt: created `pending`, then moved to a terminal status by `finish`.

use chrono::Utc;
use tracing::info;

use crate::error::StorageError;
use crate::models::{UpdateRecord, UpdateRow, UpdateStatus};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct UpdateHistoryRepository {
    pool_manager: SqlitePoolManager,
}

impl UpdateHistoryRepository {
    pub(crate) fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    /// Opens a new attempt with status `pending`; returns its id.
    pub async fn start(&self, version_from: Option<&str>) -> Result<i64, StorageError> {
        let result = sqlx::query(
            "INSERT INTO update_history (version_from, status, started_at) VALUES (?, ?, ?)",
        )
        .bind(version_from)
        .bind(UpdateStatus::Pending.as_str())
        .bind(Utc::now())
        .execute(self.pool_manager.pool())
        .await?;

        let id = result.last_insert_rowid();
        info!(update_id = id, version_from = ?version_from, "Update attempt recorded");
        Ok(id)
    }

    pub async fn set_backup_path(&self, id: i64, backup_path: &str) -> Result<(), StorageError> {
        sqlx::query("UPDATE update_history SET backup_path = ? WHERE id = ?")
            .bind(backup_path)
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    pub async fn set_version_to(&self, id: i64, version_to: &str) -> Result<(), StorageError> {
        sqlx::query("UPDATE update_history SET version_to = ? WHERE id = ?")
            .bind(version_to)
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    /// Changes the status without touching `completed_at` (e.g. failed → rolled_back).
    pub async fn set_status(&self, id: i64, status: UpdateStatus) -> Result<(), StorageError> {
        sqlx::query("UPDATE update_history SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    /// Sets a terminal status, optional error and `completed_at`.
    pub async fn finish(
        &self,
        id: i64,
        status: UpdateStatus,
        error_message: Option<&str>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            "UPDATE update_history SET status = ?, error_message = ?, completed_at = ? WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(error_message)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool_manager.pool())
        .await?;

        info!(update_id = id, status = %status, "Update attempt finished");
        Ok(())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UpdateRecord>, StorageError> {
        let row = sqlx::query_as::<_, UpdateRow>("SELECT * FROM update_history WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        row.map(UpdateRecord::try_from).transpose()
    }

    /// Most recent attempts first.
    pub async fn recent(&self, limit: i64) -> Result<Vec<UpdateRecord>, StorageError> {
        let rows = sqlx::query_as::<_, UpdateRow>(
            "SELECT * FROM update_history ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool_manager.pool())
        .await?;
        rows.into_iter().map(UpdateRecord::try_from).collect()
    }
}
