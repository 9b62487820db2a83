//! Sends `HandlerResponse::Reply` text back to the chat the message came from.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use crate::core::{Bot, Handler, HandlerResponse, Message, Result};

#[derive(Clone)]
pub struct ReplyHandler {
    bot: Arc<dyn Bot>,
}

impl ReplyHandler {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Handler for ReplyHandler {
    fn name(&self) -> &'static str {
        "ReplyHandler"
    }

    /// Send failures are logged and swallowed so the chain still completes.
    #[instrument(skip(self, message, response), fields(chat_id = message.chat.id))]
    async fn after(&self, message: &Message, response: &HandlerResponse) -> Result<()> {
        let HandlerResponse::Reply(text) = response else {
            return Ok(());
        };
        match self.bot.send_message(&message.chat, text).await {
            Ok(()) => info!(len = text.len(), "step: reply sent"),
            Err(e) => error!(error = %e, "Failed to send reply"),
        }
        Ok(())
    }
}
