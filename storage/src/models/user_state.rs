//! Per-user conversational context (`user_states` table).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One row from `user_states`. `user_id` is text so non-Telegram platforms fit.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserStateRecord {
    pub id: i64,
    pub user_id: String,
    pub platform: String,
    /// JSON object.
    pub state_data: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserStateRecord {
    /// State as JSON; an empty object when the stored text does not parse.
    pub fn state_json(&self) -> JsonValue {
        serde_json::from_str(&self.state_data)
            .unwrap_or(JsonValue::Object(serde_json::Map::new()))
    }
}
