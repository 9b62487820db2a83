//! Plugin repository (`plugins`): install records and enable/disable flags.

use chrono::Utc;
use tracing::info;

use crate::error::StorageError;
use crate::models::{NewPlugin, PluginRecord};
use crate::sqlite_pool::SqlitePoolManager;

#[derive(Clone)]
pub struct PluginRepository {
    pool_manager: SqlitePoolManager,
}

impl PluginRepository {
    pub(crate) fn new(pool_manager: SqlitePoolManager) -> Self {
        Self { pool_manager }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<PluginRecord>, StorageError> {
        let record = sqlx::query_as::<_, PluginRecord>("SELECT * FROM plugins WHERE name = ?")
            .bind(name)
            .fetch_optional(self.pool_manager.pool())
            .await?;
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<PluginRecord>, StorageError> {
        let records = sqlx::query_as::<_, PluginRecord>("SELECT * FROM plugins ORDER BY name ASC")
            .fetch_all(self.pool_manager.pool())
            .await?;
        Ok(records)
    }

    pub async fn list_enabled(&self) -> Result<Vec<PluginRecord>, StorageError> {
        let records = sqlx::query_as::<_, PluginRecord>(
            "SELECT * FROM plugins WHERE enabled = 1 ORDER BY name ASC",
        )
        .fetch_all(self.pool_manager.pool())
        .await?;
        Ok(records)
    }

    /// Inserts a new plugin row. Fails with [`StorageError::AlreadyExists`] on a duplicate name.
    pub async fn insert(&self, plugin: &NewPlugin) -> Result<PluginRecord, StorageError> {
        let now = Utc::now();
        let config = plugin.config.as_ref().map(|c| c.to_string());

        sqlx::query(
            r#"
            INSERT INTO plugins (name, version, enabled, module_path, config, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&plugin.name)
        .bind(&plugin.version)
        .bind(plugin.enabled)
        .bind(&plugin.module_path)
        .bind(config)
        .bind(now)
        .bind(now)
        .execute(self.pool_manager.pool())
        .await?;

        info!(name = %plugin.name, module_path = %plugin.module_path, "Plugin registered");

        self.find_by_name(&plugin.name)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("plugin {}", plugin.name)))
    }

    /// Sets the enabled flag; returns false if no plugin has that name.
    pub async fn set_enabled(&self, name: &str, enabled: bool) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE plugins SET enabled = ?, updated_at = ? WHERE name = ?")
            .bind(enabled)
            .bind(Utc::now())
            .bind(name)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Records the version reported by a freshly loaded plugin instance.
    pub async fn set_version(&self, name: &str, version: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("UPDATE plugins SET version = ?, updated_at = ? WHERE name = ?")
            .bind(version)
            .bind(Utc::now())
            .bind(name)
            .execute(self.pool_manager.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plugins")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }

    pub async fn count_enabled(&self) -> Result<i64, StorageError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plugins WHERE enabled = 1")
            .fetch_one(self.pool_manager.pool())
            .await?;
        Ok(count)
    }
}
