//! Telegram transport: teloxide-backed [`crate::core::Bot`], conversions to core types,
//! webhook payload parsing and the long-polling runner.

mod adapters;
mod bot_adapter;
mod runner;
mod update;

pub use adapters::{TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::{build_teloxide_bot, TelegramBotAdapter};
pub use runner::{delete_webhook, run_repl, set_webhook};
pub use update::{parse_update, TelegramUpdate};
