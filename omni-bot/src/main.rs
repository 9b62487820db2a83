//! omni-bot CLI: run the server and bot, manage plugins, updates, config and the webhook.

use anyhow::{Context, Result};
use clap::Parser;
use omni_bot::cli::{ConfigAction, PluginAction, UpdateAction, WebhookAction};
use omni_bot::telegram::{build_teloxide_bot, delete_webhook, set_webhook};
use omni_bot::{build_components, load_config, run_bot, AppComponents, BotConfig, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { token } => run_bot(load_config(token)?).await,
        Commands::Plugins { action } => handle_plugins(action).await,
        Commands::Update { action } => handle_update(action).await,
        Commands::Config { action } => handle_config(action).await,
        Commands::Webhook { action } => handle_webhook(action).await,
    }
}

/// Console-only logging for one-shot commands.
fn init_cli_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .with_target(false)
        .init();
}

async fn components() -> Result<(BotConfig, AppComponents)> {
    init_cli_tracing();
    let config = load_config(None)?;
    config.validate()?;
    let components = build_components(&config, None).await?;
    Ok((config, components))
}

async fn handle_plugins(action: PluginAction) -> Result<()> {
    let (_, c) = components().await?;
    match action {
        PluginAction::List => {
            for p in c.plugins.list_plugins().await? {
                println!(
                    "{:<24} {:<8} enabled={:<5} loaded={:<5} {}",
                    p.record.name, p.record.version, p.record.enabled, p.loaded, p.record.module_path
                );
            }
        }
        PluginAction::Enable { name } => {
            c.plugins.enable_plugin(&name).await?;
            println!("Enabled {}", name);
        }
        PluginAction::Disable { name } => {
            c.plugins.disable_plugin(&name).await?;
            println!("Disabled {}", name);
        }
        PluginAction::Reload { name: Some(name) } => {
            c.plugins.reload_plugin(&name).await?;
            println!("Reloaded {}", name);
        }
        PluginAction::Reload { name: None } => {
            let loaded = c.plugins.reload_all().await?;
            println!("Reloaded {} plugins", loaded);
        }
    }
    Ok(())
}

async fn handle_update(action: UpdateAction) -> Result<()> {
    let (_, c) = components().await?;
    match action {
        UpdateAction::Check => {
            let check = c.updates.check_for_updates().await?;
            println!("{}", serde_json::to_string_pretty(&check)?);
        }
        UpdateAction::Apply => {
            let outcome = c.updates.perform_update().await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        UpdateAction::History { limit } => {
            for u in c.updates.get_update_history(limit).await? {
                println!(
                    "#{:<4} {:<10} {} -> {} started={} {}",
                    u.id,
                    u.status,
                    u.version_from.as_deref().unwrap_or("-"),
                    u.version_to.as_deref().unwrap_or("-"),
                    u.started_at.format("%Y-%m-%d %H:%M:%S"),
                    u.error_message.as_deref().unwrap_or("")
                );
            }
        }
        UpdateAction::Rollback { id } => {
            c.updates.rollback_update(id).await?;
            println!("Rolled back update #{}", id);
        }
    }
    Ok(())
}

async fn handle_config(action: ConfigAction) -> Result<()> {
    let (_, c) = components().await?;
    match action {
        ConfigAction::Get { key } => match c.config_store.get(&key).await? {
            Some(value) => println!("{}", value),
            None => println!("{} is not set", key),
        },
        ConfigAction::Set { key, value } => {
            c.config_store.set(&key, &value).await?;
            println!("{} = {}", key, value);
        }
        ConfigAction::List => {
            for e in c.config_store.list().await? {
                let value = if e.encrypted { "******" } else { e.value.as_str() };
                println!("{} = {}", e.key, value);
            }
        }
    }
    Ok(())
}

async fn handle_webhook(action: WebhookAction) -> Result<()> {
    init_cli_tracing();
    let config = load_config(None)?;
    let token = config.bot_token().context("BOT_TOKEN is required")?;
    let bot = build_teloxide_bot(token, config.telegram_api_url());
    match action {
        WebhookAction::Set { url } => {
            let url = match url.or_else(|| {
                config
                    .base
                    .webhook_url
                    .as_ref()
                    .map(|u| format!("{}/telegram-webhook", u.trim_end_matches('/')))
            }) {
                Some(url) => url,
                None => anyhow::bail!("No URL given and WEBHOOK_URL is not set"),
            };
            set_webhook(&bot, &url, config.base.webhook_secret.as_deref()).await?;
            println!("Webhook set to {}", url);
        }
        WebhookAction::Delete => {
            delete_webhook(&bot).await?;
            println!("Webhook deleted");
        }
    }
    Ok(())
}
