//! # Self-update
//!
//! [`UpdateManager`] pulls new code through a [`VersionControl`] client, snapshotting the
//! working tree with [`BackupManager`] first and restoring it when the attempt fails. Every
//! attempt is a row in `update_history`.

mod backup;
mod git;
mod manager;

pub use backup::{BackupInfo, BackupManager, BACKUP_PREFIX, EXCLUDED_DIRS};
pub use git::{GitCli, RemoteHead, VersionControl};
pub use manager::{UpdateCheck, UpdateManager, UpdateOutcome, AUTO_UPDATE_KEY};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("git error: {0}")]
    Git(String),

    #[error("backup error: {0}")]
    Backup(String),

    #[error("update {0} not found")]
    NotFound(i64),

    #[error("update {0} has no backup to roll back to")]
    NoBackup(i64),

    #[error("another update is already running")]
    InProgress,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),
}
