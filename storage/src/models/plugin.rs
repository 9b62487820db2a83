//! Installed plugin row (`plugins` table).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One row from `plugins`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PluginRecord {
    pub id: i64,
    /// Unique plugin name; also the key the plugin manager loads it under.
    pub name: String,
    pub version: String,
    pub enabled: bool,
    /// Factory path the plugin is built from, e.g. `builtin::example`.
    pub module_path: String,
    /// JSON config string.
    pub config: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PluginRecord {
    /// Config as JSON value; an empty object when unset or unparsable.
    pub fn config_json(&self) -> JsonValue {
        self.config
            .as_ref()
            .and_then(|c| serde_json::from_str(c).ok())
            .unwrap_or(JsonValue::Object(serde_json::Map::new()))
    }
}

/// Insert input for a newly discovered plugin.
#[derive(Debug, Clone)]
pub struct NewPlugin {
    pub name: String,
    pub version: String,
    pub enabled: bool,
    pub module_path: String,
    pub config: Option<JsonValue>,
}
