//! Storage crate: SQLite persistence for the bot platform.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – BotConfigEntry, PluginRecord, UpdateRecord, MetricRecord, UserStateRecord
//! - [`schema`] – Table creation
//! - [`sqlite_pool`] – SqlitePoolManager
//! - one repository per table, reachable from [`Database`]

mod config_repo;
mod database;
mod error;
mod metrics_repo;
mod models;
mod plugin_repo;
mod schema;
mod sqlite_pool;
mod update_repo;
mod user_state_repo;

#[cfg(test)]
mod repo_test;

pub use config_repo::BotConfigRepository;
pub use database::Database;
pub use error::StorageError;
pub use metrics_repo::{MetricsRepository, RETAINED_METRIC_PREFIX};
pub use models::{
    BotConfigEntry, MetricRecord, NewPlugin, PluginRecord, UpdateRecord, UpdateStatus,
    UserStateRecord,
};
pub use plugin_repo::PluginRepository;
pub use sqlite_pool::SqlitePoolManager;
pub use update_repo::UpdateHistoryRepository;
pub use user_state_repo::UserStateRepository;
