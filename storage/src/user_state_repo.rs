//! User state repository (`user_states`), keyed by (user_id, platform).

use chrono::Utc;
use serde_json::Value as JsonValue;

use crate::error::StorageError;
use crate::models::UserStateRecord;
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct UserStateRepository {
    pool_manager: SqlitePoolManager,
}

impl UserStateRepository {
    pub(crate) fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn get(
        &self,
        user_id: &str,
        platform: &str,
    ) -> Result<Option<UserStateRecord>, StorageError> {
        let record = sqlx::query_as::<_, UserStateRecord>(
            "SELECT * FROM user_states WHERE user_id = ? AND platform = ?",
        )
        .bind(user_id)
        .bind(platform)
        .fetch_optional(self.pool_manager.pool())
        .await?;
        Ok(record)
    }

    /// Creates the state on first interaction, replaces `state_data` afterwards.
    pub async fn upsert(
        &self,
        user_id: &str,
        platform: &str,
        state: &JsonValue,
    ) -> Result<UserStateRecord, StorageError> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO user_states (user_id, platform, state_data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(user_id, platform) DO UPDATE SET
                state_data = excluded.state_data,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(platform)
        .bind(state.to_string())
        .bind(now)
        .bind(now)
        .execute(self.pool_manager.pool())
        .await?;

        self.get(user_id, platform)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("user state {}/{}", platform, user_id)))
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_states")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }
}
