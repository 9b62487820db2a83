//! DB-backed config lookup: `bot_config` row, then env var (key upper-cased), then default.

use storage::{BotConfigEntry, Database, StorageError};
use tracing::info;

use super::{env_opt, parse_bool};

/// Runtime-editable settings. The admin panel and CLI write here; handlers read.
#[derive(Clone)]
pub struct ConfigStore {
    db: Database,
}

impl ConfigStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        if let Some(entry) = self.db.bot_config().get(key).await? {
            return Ok(Some(entry.value));
        }
        Ok(env_opt(&key.to_ascii_uppercase()))
    }

    pub async fn get_or(&self, key: &str, default: &str) -> Result<String, StorageError> {
        Ok(self
            .get(key)
            .await?
            .unwrap_or_else(|| default.to_string()))
    }

    pub async fn get_bool(&self, key: &str, default: bool) -> Result<bool, StorageError> {
        Ok(self
            .get(key)
            .await?
            .map(|v| parse_bool(&v))
            .unwrap_or(default))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<BotConfigEntry, StorageError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(StorageError::InvalidValue("config key is empty".to_string()));
        }
        let entry = self.db.bot_config().set(key, value, false).await?;
        info!(key = %key, "Config updated");
        Ok(entry)
    }

    pub async fn list(&self) -> Result<Vec<BotConfigEntry>, StorageError> {
        self.db.bot_config().list().await
    }
}
