//! # Handler chain
//!
//! Runs a sequence of handlers in three phases: every `before` in order (any false stops the
//! chain), then `handle` until one returns Stop or Reply, then every `after` in reverse order
//! with the final response.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::core::{Handler, HandlerResponse, Message, Result};

#[derive(Clone, Default)]
pub struct HandlerChain {
    handlers: Vec<Arc<dyn Handler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn add_handler(mut self, handler: Arc<dyn Handler>) -> Self {
        self.handlers.push(handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs the three phases and returns the final response.
    #[instrument(skip(self, message), fields(user_id = message.user.id, chat_id = message.chat.id))]
    pub async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        info!(message_id = %message.id, "step: handler_chain started");

        for h in &self.handlers {
            if !h.before(message).await? {
                info!(handler = h.name(), "step: before returned false, chain stopped");
                return Ok(HandlerResponse::Stop);
            }
        }

        let mut final_response = HandlerResponse::Continue;
        for h in &self.handlers {
            let response = h.handle(message).await?;
            debug!(handler = h.name(), response = ?response, "Handler processed");

            if matches!(response, HandlerResponse::Stop | HandlerResponse::Reply(_)) {
                info!(
                    handler = h.name(),
                    reply_len = ?reply_len(&response),
                    "step: handle phase ended by handler"
                );
                final_response = response;
                break;
            }
        }

        for h in self.handlers.iter().rev() {
            h.after(message, &final_response).await?;
        }

        info!(message_id = %message.id, "step: handler_chain finished");
        Ok(final_response)
    }
}

fn reply_len(response: &HandlerResponse) -> Option<usize> {
    match response {
        HandlerResponse::Reply(text) => Some(text.len()),
        _ => None,
    }
}
