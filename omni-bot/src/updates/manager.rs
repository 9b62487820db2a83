//! Update flow: history row → backup → check → pull → plugin reload, with restore on failure.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use storage::{Database, UpdateRecord, UpdateStatus};
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use super::backup::{BackupInfo, BackupManager};
use super::git::VersionControl;
use super::UpdateError;
use crate::config::ConfigStore;
use crate::plugins::PluginManager;

/// `bot_config` key (env `AUTO_UPDATE_ENABLED`) gating [`UpdateManager::check_and_update`].
pub const AUTO_UPDATE_KEY: &str = "auto_update_enabled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateCheck {
    Available { version: String, message: String },
    UpToDate { version: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UpdateOutcome {
    Updated {
        update_id: i64,
        version: String,
        backup_path: String,
    },
    NoUpdate {
        update_id: Option<i64>,
    },
    Failed {
        update_id: i64,
        error: String,
        rolled_back: bool,
    },
    Disabled,
}

pub struct UpdateManager {
    db: Database,
    vcs: Arc<dyn VersionControl>,
    backups: BackupManager,
    plugins: Option<Arc<PluginManager>>,
    config: ConfigStore,
    auto_update_default: bool,
    running: Mutex<()>,
}

impl UpdateManager {
    pub fn new(
        db: Database,
        vcs: Arc<dyn VersionControl>,
        backups: BackupManager,
        plugins: Option<Arc<PluginManager>>,
        auto_update_default: bool,
    ) -> Self {
        Self {
            config: ConfigStore::new(db.clone()),
            db,
            vcs,
            backups,
            plugins,
            auto_update_default,
            running: Mutex::new(()),
        }
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    pub async fn current_version(&self) -> String {
        self.vcs.current_version().await
    }

    #[instrument(skip(self))]
    pub async fn check_for_updates(&self) -> Result<UpdateCheck, UpdateError> {
        let current = self.vcs.current_version().await;
        let remote = self.vcs.fetch_remote().await?;
        if remote.version == current {
            info!(version = %current, "Already up to date");
            return Ok(UpdateCheck::UpToDate { version: current });
        }
        info!(current = %current, latest = %remote.version, "Update available");
        Ok(UpdateCheck::Available {
            version: remote.version,
            message: remote.message,
        })
    }

    /// Runs one update attempt. Only one attempt runs at a time.
    #[instrument(skip(self))]
    pub async fn perform_update(&self) -> Result<UpdateOutcome, UpdateError> {
        let _guard = self.running.try_lock().map_err(|_| UpdateError::InProgress)?;

        let from = self.vcs.current_version().await;
        let history = self.db.update_history();
        let update_id = history.start(Some(&from)).await?;
        info!(update_id, version_from = %from, "step: update started");

        let mut backup: Option<BackupInfo> = None;
        let result = self.run_update(update_id, &from, &mut backup).await;

        match result {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                let message = e.to_string();
                error!(update_id, error = %message, "Update failed");
                // Restore runs even when these history writes fail.
                if let Err(db_error) = history
                    .finish(update_id, UpdateStatus::Failed, Some(&message))
                    .await
                {
                    error!(update_id, error = %db_error, "Failed to record update failure");
                }

                let rolled_back = match backup {
                    Some(ref info) => match self.restore(info.path.clone()).await {
                        Ok(()) => {
                            if let Err(db_error) =
                                history.set_status(update_id, UpdateStatus::RolledBack).await
                            {
                                error!(update_id, error = %db_error, "Failed to record rollback");
                            }
                            info!(update_id, "step: rolled back after failed update");
                            true
                        }
                        Err(rollback_error) => {
                            error!(update_id, error = %rollback_error, "Rollback failed");
                            false
                        }
                    },
                    None => false,
                };

                Ok(UpdateOutcome::Failed {
                    update_id,
                    error: message,
                    rolled_back,
                })
            }
        }
    }

    async fn run_update(
        &self,
        update_id: i64,
        from: &str,
        backup: &mut Option<BackupInfo>,
    ) -> Result<UpdateOutcome, UpdateError> {
        let history = self.db.update_history();

        let backups = self.backups.clone();
        let info = tokio::task::spawn_blocking(move || backups.create_backup())
            .await
            .map_err(|e| UpdateError::Backup(e.to_string()))??;
        let backup_path = info.path.display().to_string();
        history.set_backup_path(update_id, &backup_path).await?;
        *backup = Some(info);
        info!(update_id, backup = %backup_path, "step: backup created");

        let remote = self.vcs.fetch_remote().await?;
        if remote.version == from {
            history.finish(update_id, UpdateStatus::NoUpdate, None).await?;
            info!(update_id, "step: no update available");
            return Ok(UpdateOutcome::NoUpdate {
                update_id: Some(update_id),
            });
        }
        history.set_version_to(update_id, &remote.version).await?;

        self.vcs.pull().await?;
        info!(update_id, version = %remote.version, "step: pulled");

        if let Some(ref plugins) = self.plugins {
            match plugins.reload_all().await {
                Ok(n) => info!(update_id, plugins = n, "step: plugins reloaded"),
                Err(e) => warn!(update_id, error = %e, "Plugin reload after update failed"),
            }
        }

        history.finish(update_id, UpdateStatus::Success, None).await?;
        info!(update_id, version = %remote.version, "Successfully updated");
        Ok(UpdateOutcome::Updated {
            update_id,
            version: remote.version,
            backup_path,
        })
    }

    async fn restore(&self, path: PathBuf) -> Result<(), UpdateError> {
        let backups = self.backups.clone();
        tokio::task::spawn_blocking(move || backups.restore_backup(&path))
            .await
            .map_err(|e| UpdateError::Backup(e.to_string()))?
    }

    /// Restores the backup taken for `update_id` and marks the attempt rolled back.
    #[instrument(skip(self))]
    pub async fn rollback_update(&self, update_id: i64) -> Result<(), UpdateError> {
        let history = self.db.update_history();
        let record = history
            .find_by_id(update_id)
            .await?
            .ok_or(UpdateError::NotFound(update_id))?;
        let path = record
            .backup_path
            .ok_or(UpdateError::NoBackup(update_id))?;

        self.restore(PathBuf::from(&path)).await?;
        history.set_status(update_id, UpdateStatus::RolledBack).await?;
        info!(update_id, backup = %path, "Rolled back to backup");
        Ok(())
    }

    /// Applies an available update when auto-update is enabled.
    #[instrument(skip(self))]
    pub async fn check_and_update(&self) -> Result<UpdateOutcome, UpdateError> {
        let enabled = self
            .config
            .get_bool(AUTO_UPDATE_KEY, self.auto_update_default)
            .await?;
        if !enabled {
            return Ok(UpdateOutcome::Disabled);
        }
        match self.check_for_updates().await? {
            UpdateCheck::UpToDate { .. } => Ok(UpdateOutcome::NoUpdate { update_id: None }),
            UpdateCheck::Available { .. } => self.perform_update().await,
        }
    }

    pub async fn get_update_history(&self, limit: i64) -> Result<Vec<UpdateRecord>, UpdateError> {
        Ok(self.db.update_history().recent(limit).await?)
    }
}
