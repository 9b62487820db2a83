//! Long-polling runner and webhook registration.

use anyhow::Result;
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::adapters::TelegramMessageWrapper;
use crate::chain::HandlerChain;
use crate::core::ToCoreMessage;

/// Polls Telegram for updates and runs each text message through the chain in its own task.
#[instrument(skip(bot, handler_chain))]
pub async fn run_repl(bot: teloxide::Bot, handler_chain: HandlerChain) -> Result<()> {
    match bot.get_me().await {
        Ok(me) => info!(username = ?me.user.username, "Bot identity confirmed, starting polling"),
        Err(e) => error!(error = %e, "get_me failed, starting polling anyway"),
    }

    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = handler_chain.clone();
        async move {
            if msg.text().is_none() {
                info!(chat_id = msg.chat.id.0, "Received non-text message, ignored");
                return Ok(());
            }
            let core_msg = TelegramMessageWrapper(&msg).to_core();
            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                message_content = %core_msg.content,
                "Received message"
            );

            tokio::spawn(async move {
                if let Err(e) = chain.handle(&core_msg).await {
                    error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                }
            });
            Ok(())
        }
    })
    .await;

    Ok(())
}

/// Registers `url` as the bot's webhook, with an optional secret token Telegram echoes in
/// `X-Telegram-Bot-Api-Secret-Token`.
#[instrument(skip(bot, secret))]
pub async fn set_webhook(bot: &teloxide::Bot, url: &str, secret: Option<&str>) -> Result<()> {
    let url = reqwest::Url::parse(url)?;
    let request = bot.set_webhook(url);
    match secret {
        Some(secret) => request.secret_token(secret.to_string()).await?,
        None => request.await?,
    };
    info!("Webhook set");
    Ok(())
}

#[instrument(skip(bot))]
pub async fn delete_webhook(bot: &teloxide::Bot) -> Result<()> {
    bot.delete_webhook().await?;
    info!("Webhook deleted");
    Ok(())
}
