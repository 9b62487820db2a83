//! Data models for storage, one file per table.

mod bot_config;
mod metric;
mod plugin;
mod update;
mod user_state;

pub use bot_config::BotConfigEntry;
pub use metric::MetricRecord;
pub use plugin::{NewPlugin, PluginRecord};
pub(crate) use update::UpdateRow;
pub use update::{UpdateRecord, UpdateStatus};
pub use user_state::UserStateRecord;
