//! Free-text replies. With an LLM client, the user's recent turns (kept in
//! `state_data.history`) are sent along and the answer is appended to that history.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};
use storage::Database;
use tracing::{error, info, instrument, warn};

use super::{ACTIVE_BOT_REPLY, PLATFORM_TELEGRAM};
use crate::core::{Handler, HandlerResponse, Message, Result};
use crate::llm::{ChatMessage, LlmClient};

/// User/assistant exchanges kept per user.
pub const HISTORY_TURNS: usize = 10;

/// Each turn stores the user message and the reply.
const HISTORY_MESSAGES: usize = HISTORY_TURNS * 2;

pub struct ConversationHandler {
    db: Database,
    llm: Option<Arc<dyn LlmClient>>,
}

impl ConversationHandler {
    pub fn new(db: Database, llm: Option<Arc<dyn LlmClient>>) -> Self {
        Self { db, llm }
    }

    fn history_of(state: &JsonValue) -> Vec<ChatMessage> {
        state
            .get("history")
            .cloned()
            .and_then(|h| serde_json::from_value(h).ok())
            .unwrap_or_default()
    }

    async fn save_history(&self, user_id: &str, mut history: Vec<ChatMessage>) -> Result<()> {
        let repo = self.db.user_states();
        let mut state = repo
            .get(user_id, PLATFORM_TELEGRAM)
            .await?
            .map(|r| r.state_json())
            .filter(JsonValue::is_object)
            .unwrap_or_else(|| json!({}));

        if history.len() > HISTORY_MESSAGES {
            history.drain(..history.len() - HISTORY_MESSAGES);
        }
        state["history"] = serde_json::to_value(&history).unwrap_or_else(|_| json!([]));
        repo.upsert(user_id, PLATFORM_TELEGRAM, &state).await?;
        Ok(())
    }
}

#[async_trait]
impl Handler for ConversationHandler {
    fn name(&self) -> &'static str {
        "ConversationHandler"
    }

    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let text = message.content.trim();
        if text.is_empty() || message.is_command() {
            return Ok(HandlerResponse::Continue);
        }

        let Some(ref llm) = self.llm else {
            return Ok(HandlerResponse::Reply(ACTIVE_BOT_REPLY.to_string()));
        };

        let user_id = message.user.id.to_string();
        let state = self
            .db
            .user_states()
            .get(&user_id, PLATFORM_TELEGRAM)
            .await?
            .map(|r| r.state_json())
            .unwrap_or_else(|| json!({}));
        let mut history = Self::history_of(&state);

        let mut request = history.clone();
        request.push(ChatMessage::user(text));
        info!(history = history.len(), "step: asking LLM");

        let answer = match llm.complete(request).await {
            Ok(answer) if !answer.trim().is_empty() => answer,
            Ok(_) => {
                warn!("LLM returned an empty answer");
                return Ok(HandlerResponse::Reply(ACTIVE_BOT_REPLY.to_string()));
            }
            Err(e) => {
                for (i, cause) in e.chain().enumerate() {
                    if i == 0 {
                        error!(cause = %cause, "LLM request failed");
                    } else {
                        error!(cause = %cause, "Caused by");
                    }
                }
                return Ok(HandlerResponse::Reply(ACTIVE_BOT_REPLY.to_string()));
            }
        };

        history.push(ChatMessage::user(text));
        history.push(ChatMessage::assistant(answer.clone()));
        if let Err(e) = self.save_history(&user_id, history).await {
            error!(error = %e, "Failed to save conversation history");
        }

        Ok(HandlerResponse::Reply(answer))
    }
}
