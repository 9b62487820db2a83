//! Bot abstraction for outgoing messages.
//!
//! [`Bot`] is transport-agnostic; `TelegramBotAdapter` implements it via teloxide and
//! tests substitute a recording mock.

use async_trait::async_trait;

use super::error::Result;
use super::types::{Chat, Message};

/// Sends messages on behalf of the bot. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()>;

    /// Asks the transport who the bot is; returns the bot username.
    /// Used by the health monitor as a reachability probe.
    async fn get_me(&self) -> Result<String>;
}
