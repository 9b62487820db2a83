use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

use crate::components::{build_app_state, build_components, build_handler_chain};
use crate::config::BotConfig;
use crate::core::init_tracing;
use crate::monitoring::spawn_observer;
use crate::server;
use crate::telegram::{run_repl, set_webhook};
use crate::updates::UpdateOutcome;

/// Main entry: init logging, validate config, build components, then run the HTTP server
/// together with the bot. With `WEBHOOK_URL` set the bot's webhook is registered and updates
/// arrive at `/telegram-webhook`; otherwise the bot long-polls alongside the server.
#[instrument(skip(config))]
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    init_tracing(config.log_file())?;

    let addr: SocketAddr = config
        .base
        .bind_addr
        .parse()
        .with_context(|| format!("BIND_ADDR is not a socket address: {}", config.base.bind_addr))?;

    info!(
        database_url = %config.database_url(),
        bind_addr = %addr,
        webhook = config.base.webhook_url.is_some(),
        "Initializing bot"
    );

    let components = build_components(&config, None).await?;
    let chain = build_handler_chain(&components);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let observer = spawn_observer(
        components.db.clone(),
        components.collector.clone(),
        config.monitoring.clone(),
        shutdown_rx,
    );

    let updates = components.updates.clone();
    tokio::spawn(async move {
        match updates.check_and_update().await {
            Ok(UpdateOutcome::Updated { version, .. }) => {
                info!(version = %version, "Startup update applied")
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Startup update check failed"),
        }
    });

    let polling = match (&components.teloxide_bot, &chain, &config.base.webhook_url) {
        (Some(bot), Some(_), Some(url)) => {
            let webhook = format!("{}/telegram-webhook", url.trim_end_matches('/'));
            if let Err(e) = set_webhook(bot, &webhook, config.base.webhook_secret.as_deref()).await {
                error!(error = %e, "Failed to register webhook");
            }
            None
        }
        (Some(bot), Some(chain), None) => {
            let (bot, chain) = (bot.clone(), chain.clone());
            Some(tokio::spawn(async move {
                if let Err(e) = run_repl(bot, chain).await {
                    error!(error = %e, "Polling stopped");
                }
            }))
        }
        _ => None,
    };

    let state = build_app_state(&config, &components, chain)?;
    info!("Bot started successfully");

    let result = server::serve(state, addr, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    })
    .await;

    let _ = shutdown_tx.send(true);
    if let Err(e) = observer.await {
        error!(error = %e, "Metrics observer task failed");
    }
    if let Some(polling) = polling {
        polling.abort();
    }
    result
}
