//! [`Database`]: one pool, one repository per table.

use crate::config_repo::BotConfigRepository;
use crate::error::StorageError;
use crate::metrics_repo::MetricsRepository;
use crate::plugin_repo::PluginRepository;
use crate::schema;
use crate::sqlite_pool::SqlitePoolManager;
use crate::update_repo::UpdateHistoryRepository;
use crate::user_state_repo::UserStateRepository;

/// Handle to the bot database. Cheap to clone; repositories share the pool.
#[derive(Clone)]
pub struct Database {
    pool_manager: SqlitePoolManager,
}

impl Database {
    /// Opens (or creates) the database and ensures the schema exists.
    pub async fn new(database_url: &str) -> Result<Self, StorageError> {
        let pool_manager = SqlitePoolManager::new(database_url).await?;
        schema::init(pool_manager.pool()).await?;
        Ok(Self { pool_manager })
    }

    /// Runs `SELECT 1`; used by health checks.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(self.pool_manager.pool())
            .await?;
        Ok(())
    }

    pub fn bot_config(&self) -> BotConfigRepository {
        BotConfigRepository::new(self.pool_manager.clone())
    }

    pub fn plugins(&self) -> PluginRepository {
        PluginRepository::new(self.pool_manager.clone())
    }

    pub fn update_history(&self) -> UpdateHistoryRepository {
        UpdateHistoryRepository::new(self.pool_manager.clone())
    }

    pub fn metrics(&self) -> MetricsRepository {
        MetricsRepository::new(self.pool_manager.clone())
    }

    pub fn user_states(&self) -> UserStateRepository {
        UserStateRepository::new(self.pool_manager.clone())
    }

    pub fn pool_manager(&self) -> &SqlitePoolManager {
        &self.pool_manager
    }
}
