//! Bot configuration repository (`bot_config`).

use chrono::Utc;
use tracing::info;

use crate::error::StorageError;
use crate::models::BotConfigEntry;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct BotConfigRepository {
    pool_manager: SqlitePoolManager,
}

impl BotConfigRepository {
    pub(crate) fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn get(&self, key: &str) -> Result<Option<BotConfigEntry>, StorageError> {
        let entry = sqlx::query_as::<_, BotConfigEntry>("SELECT * FROM bot_config WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(entry)
    }

    /// Inserts or updates the entry for `key` and returns the stored row.
    pub async fn set(
        &self,
        key: &str,
        value: &str,
        encrypted: bool,
    ) -> Result<BotConfigEntry, StorageError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO bot_config (key, value, encrypted, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                encrypted = excluded.encrypted,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(encrypted)
        .bind(now)
        .bind(now)
        .execute(self.pool_manager.pool())
        .await?;

        info!(key = %key, encrypted = encrypted, "Config entry saved");

        self.get(key)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("config key {}", key)))
    }

    /// All entries ordered by key.
    pub async fn list(&self) -> Result<Vec<BotConfigEntry>, StorageError> {
        let entries =
            sqlx::query_as::<_, BotConfigEntry>("SELECT * FROM bot_config ORDER BY key ASC")
                .fetch_all(self.pool_manager.pool())
                .await?;
        Ok(entries)
    }

    /// Returns true if a row was deleted.
    pub async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM bot_config WHERE key = ?")
            .bind(key)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
