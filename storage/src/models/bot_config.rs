//! Key/value configuration entry (`bot_config` table).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row from `bot_config`. `encrypted` marks secrets; the value is masked when displayed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BotConfigEntry {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub encrypted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
