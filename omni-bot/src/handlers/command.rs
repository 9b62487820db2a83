//! Core commands (`/start`, `/status`, `/help`) and dispatch of everything else to plugins.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument};

use super::{ACTIVE_BOT_REPLY, COMMAND_FAILED_REPLY};
use crate::core::{Handler, HandlerResponse, Message, Result};
use crate::plugins::{PluginContext, PluginManager};

const START_REPLY: &str = "🤖 OMNICore Bot Activated - Self-Evolving System

🧠 Core Features:
• Payment processing (Stripe)
• Auto-updates and plugins
• Multi-platform integration
• System monitoring

Type /help to explore all commands.";

/// A `/command arg1 arg2` line split into a lowercased command and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: String,
    pub args: Vec<String>,
}

/// Parses `/cmd@botname args…`. Returns `None` for text that is not a command.
pub fn parse_command(text: &str) -> Option<ParsedCommand> {
    let mut parts = text.split_whitespace();
    let head = parts.next()?.strip_prefix('/')?;
    let command = head.split('@').next().unwrap_or_default().to_ascii_lowercase();
    if command.is_empty() {
        return None;
    }
    Some(ParsedCommand {
        command,
        args: parts.map(str::to_string).collect(),
    })
}

pub struct CommandHandler {
    plugins: Arc<PluginManager>,
    stripe_configured: bool,
    llm_configured: bool,
}

impl CommandHandler {
    pub fn new(plugins: Arc<PluginManager>, stripe_configured: bool, llm_configured: bool) -> Self {
        Self {
            plugins,
            stripe_configured,
            llm_configured,
        }
    }

    async fn status(&self) -> String {
        let active = self.plugins.get_active_plugins().await.len();
        let mut lines = vec![
            "🔍 System Status:".to_string(),
            String::new(),
            "✅ Web Server: Online".to_string(),
        ];
        lines.push(if self.stripe_configured {
            "✅ Stripe: Configured".to_string()
        } else {
            "⚠️ Stripe: No API key".to_string()
        });
        lines.push(if self.llm_configured {
            "✅ OpenAI: Configured".to_string()
        } else {
            "⚠️ OpenAI: No API key".to_string()
        });
        lines.push(format!("🔌 Active Plugins: {}", active));
        lines.join("\n")
    }

    async fn help(&self) -> String {
        let mut text = String::from(
            "🧠 OMNICore Commands:\n\n\
             /start - Activate the system\n\
             /help - Show this help\n\
             /status - System status check\n\n\
             Plugin Commands:\n",
        );
        let commands = self.plugins.get_plugin_commands().await;
        if commands.is_empty() {
            text.push_str("No plugin commands available\n");
        }
        for cmd in commands {
            text.push_str(&format!("/{} - {}\n", cmd.command, cmd.description));
        }
        text.push_str(
            "\n🌐 Admin Panel: Visit the web interface to manage plugins, updates, and configuration.",
        );
        text
    }

    async fn plugin_command(&self, parsed: ParsedCommand, message: &Message) -> String {
        let ctx = PluginContext {
            user: message.user.clone(),
            chat: message.chat.clone(),
            args: parsed.args,
        };
        match self.plugins.dispatch(&parsed.command, &ctx).await {
            Ok(Some(reply)) => reply,
            Ok(None) => {
                info!(command = %parsed.command, "No plugin claims command");
                ACTIVE_BOT_REPLY.to_string()
            }
            Err(e) => {
                error!(command = %parsed.command, error = %e, "Plugin command failed");
                COMMAND_FAILED_REPLY.to_string()
            }
        }
    }
}

#[async_trait]
impl Handler for CommandHandler {
    fn name(&self) -> &'static str {
        "CommandHandler"
    }

    #[instrument(skip(self, message), fields(user_id = message.user.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let Some(parsed) = parse_command(&message.content) else {
            return Ok(HandlerResponse::Continue);
        };
        info!(command = %parsed.command, args = parsed.args.len(), "step: command received");

        let reply = match parsed.command.as_str() {
            "start" => START_REPLY.to_string(),
            "status" => self.status().await,
            "help" => self.help().await,
            _ => self.plugin_command(parsed, message).await,
        };
        Ok(HandlerResponse::Reply(reply))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_strips_bot_suffix_and_lowercases() {
        let parsed = parse_command("/Weather@omni_bot London UK").unwrap();
        assert_eq!(parsed.command, "weather");
        assert_eq!(parsed.args, vec!["London", "UK"]);
    }

    #[test]
    fn test_parse_command_rejects_plain_text() {
        assert!(parse_command("hello /start").is_none());
        assert!(parse_command("").is_none());
        assert!(parse_command("/").is_none());
        assert!(parse_command("/@bot").is_none());
    }

    #[test]
    fn test_parse_command_without_args() {
        let parsed = parse_command("  /help  ").unwrap();
        assert_eq!(parsed.command, "help");
        assert!(parsed.args.is_empty());
    }
}
