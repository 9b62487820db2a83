//! Loads or creates the sender's state row and bumps its counters before anything else runs.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value as JsonValue};
use storage::Database;
use tracing::{error, info, instrument};

use super::PLATFORM_TELEGRAM;
use crate::core::{Handler, Message, Result};

#[derive(Clone)]
pub struct UserStateHandler {
    db: Database,
}

impl UserStateHandler {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Handler for UserStateHandler {
    fn name(&self) -> &'static str {
        "UserStateHandler"
    }

    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let user_id = message.user.id.to_string();
        let repo = self.db.user_states();

        let mut state = match repo.get(&user_id, PLATFORM_TELEGRAM).await? {
            Some(record) => record.state_json(),
            None => {
                info!("step: first interaction, creating user state");
                json!({ "first_seen": Utc::now().to_rfc3339() })
            }
        };
        if !state.is_object() {
            state = json!({});
        }

        let count = state
            .get("message_count")
            .and_then(JsonValue::as_i64)
            .unwrap_or(0)
            + 1;
        state["message_count"] = json!(count);
        state["last_seen"] = json!(Utc::now().to_rfc3339());
        if let Some(ref username) = message.user.username {
            state["username"] = json!(username);
        }

        repo.upsert(&user_id, PLATFORM_TELEGRAM, &state)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to persist user state");
                e
            })?;

        info!(message_count = count, "step: UserStateHandler before done");
        Ok(true)
    }
}
