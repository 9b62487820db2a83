//! Update attempt row (`update_history` table).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Outcome of an update attempt. `Pending` is the only non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    Pending,
    Success,
    Failed,
    RolledBack,
    NoUpdate,
}

impl UpdateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateStatus::Pending => "pending",
            UpdateStatus::Success => "success",
            UpdateStatus::Failed => "failed",
            UpdateStatus::RolledBack => "rolled_back",
            UpdateStatus::NoUpdate => "no_update",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UpdateStatus {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(UpdateStatus::Pending),
            "success" => Ok(UpdateStatus::Success),
            "failed" => Ok(UpdateStatus::Failed),
            "rolled_back" => Ok(UpdateStatus::RolledBack),
            "no_update" => Ok(UpdateStatus::NoUpdate),
            other => Err(StorageError::InvalidValue(format!(
                "unknown update status: {}",
                other
            ))),
        }
    }
}

/// One row from `update_history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRecord {
    pub id: i64,
    pub version_from: Option<String>,
    pub version_to: Option<String>,
    pub status: UpdateStatus,
    pub backup_path: Option<String>,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Raw row; `status` is stored as text.
#[derive(sqlx::FromRow)]
pub(crate) struct UpdateRow {
    pub id: i64,
    pub version_from: Option<String>,
    pub version_to: Option<String>,
    pub status: String,
    pub backup_path: Option<String>,
    pub error_message: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<UpdateRow> for UpdateRecord {
    type Error = StorageError;

    fn try_from(row: UpdateRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            version_from: row.version_from,
            version_to: row.version_to,
            status: row.status.parse()?,
            backup_path: row.backup_path,
            error_message: row.error_message,
            started_at: row.started_at,
            completed_at: row.completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_matches_as_str() {
        for status in [
            UpdateStatus::Pending,
            UpdateStatus::Success,
            UpdateStatus::Failed,
            UpdateStatus::RolledBack,
            UpdateStatus::NoUpdate,
        ] {
            assert_eq!(status.as_str().parse::<UpdateStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_status_parse_unknown() {
        assert!("exploded".parse::<UpdateStatus>().is_err());
    }
}
