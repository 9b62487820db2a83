//! CLI parser and config loading.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser)]
#[command(name = "omni-bot")]
#[command(about = "OMNICore bot: Telegram bot, sales pages and admin panel", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server and the Telegram bot (config from env; token can override BOT_TOKEN).
    Serve {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Inspect and toggle plugins.
    Plugins {
        #[command(subcommand)]
        action: PluginAction,
    },
    /// Self-update from the git remote.
    Update {
        #[command(subcommand)]
        action: UpdateAction,
    },
    /// Read and write `bot_config` overrides.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Register or remove the Telegram webhook.
    Webhook {
        #[command(subcommand)]
        action: WebhookAction,
    },
}

#[derive(Subcommand)]
pub enum PluginAction {
    List,
    Enable { name: String },
    Disable { name: String },
    /// Reload one plugin, or every enabled plugin when no name is given.
    Reload { name: Option<String> },
}

#[derive(Subcommand)]
pub enum UpdateAction {
    Check,
    /// Back up, pull and reload plugins, restoring the backup on failure.
    Apply,
    History {
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },
    Rollback { id: i64 },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Value from `bot_config`, falling back to the env var of the same name.
    Get { key: String },
    Set { key: String, value: String },
    List,
}

#[derive(Subcommand)]
pub enum WebhookAction {
    /// Defaults to `$WEBHOOK_URL/telegram-webhook`.
    Set { url: Option<String> },
    Delete,
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    BotConfig::load(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: Nested subcommands parse with their arguments.**
    #[test]
    fn test_parse_nested_subcommands() {
        let cli = Cli::parse_from(["omni-bot", "update", "rollback", "7"]);
        assert!(matches!(
            cli.command,
            Commands::Update {
                action: UpdateAction::Rollback { id: 7 }
            }
        ));

        let cli = Cli::parse_from(["omni-bot", "plugins", "reload"]);
        assert!(matches!(
            cli.command,
            Commands::Plugins {
                action: PluginAction::Reload { name: None }
            }
        ));

        let cli = Cli::parse_from(["omni-bot", "serve", "--token", "abc"]);
        match cli.command {
            Commands::Serve { token } => assert_eq!(token.as_deref(), Some("abc")),
            _ => panic!("expected serve"),
        }
    }

    /// **Test: History limit defaults to 20.**
    #[test]
    fn test_history_default_limit() {
        let cli = Cli::parse_from(["omni-bot", "update", "history"]);
        assert!(matches!(
            cli.command,
            Commands::Update {
                action: UpdateAction::History { limit: 20 }
            }
        ));
    }
}
