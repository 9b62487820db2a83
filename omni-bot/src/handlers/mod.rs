//! Bot core handlers, in chain order:
//!
//! - [`UserStateHandler`] (before): per-user state bookkeeping
//! - [`ReplyHandler`] (after): sends the final `Reply` to the chat
//! - [`CommandHandler`] (handle): core and plugin commands
//! - [`ConversationHandler`] (handle): free text, answered by the LLM when configured

mod command;
mod conversation;
mod reply;
mod user_state;

pub use command::{parse_command, CommandHandler, ParsedCommand};
pub use conversation::{ConversationHandler, HISTORY_TURNS};
pub use reply::ReplyHandler;
pub use user_state::UserStateHandler;

/// Platform key under which Telegram users are stored in `user_states`.
pub const PLATFORM_TELEGRAM: &str = "telegram";

/// Reply for unknown commands and for text the bot cannot answer.
pub const ACTIVE_BOT_REPLY: &str = "🤖 OMNICore Bot is active. Use /help for commands.";

/// Reply when a plugin command fails.
pub const COMMAND_FAILED_REPLY: &str = "⚠️ Sorry, that command failed. Please try again later.";
