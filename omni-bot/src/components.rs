//! Component factory: builds every service from config. Isolates assembly logic from the
//! runner so the CLI and the integration tests can reuse it.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use storage::Database;
use tracing::{error, info, instrument};

use crate::chain::HandlerChain;
use crate::config::{BotConfig, ConfigStore};
use crate::content::ContentEngine;
use crate::core::Bot;
use crate::handlers::{CommandHandler, ConversationHandler, ReplyHandler, UserStateHandler};
use crate::llm::{LlmClient, OpenAILlmClient};
use crate::monitoring::{HealthMonitor, MetricsCollector};
use crate::payments::StripeClient;
use crate::plugins::{PluginManager, PluginRegistry, PluginServices};
use crate::server::{AppState, Templates};
use crate::telegram::{build_teloxide_bot, TelegramBotAdapter};
use crate::updates::{BackupManager, GitCli, UpdateManager};

/// Shared services produced by [`build_components`].
#[derive(Clone)]
pub struct AppComponents {
    pub db: Database,
    pub config_store: ConfigStore,
    pub content: Arc<ContentEngine>,
    pub plugins: Arc<PluginManager>,
    pub updates: Arc<UpdateManager>,
    pub collector: Arc<MetricsCollector>,
    pub health: Arc<HealthMonitor>,
    pub llm: Option<Arc<dyn LlmClient>>,
    /// Set when a bot token is configured.
    pub teloxide_bot: Option<teloxide::Bot>,
    /// What the handlers send through. Tests inject a mock here.
    pub bot: Option<Arc<dyn Bot>>,
    pub stripe: Option<StripeClient>,
}

/// Opens the database, loads plugins and wires the update, monitoring and LLM services.
///
/// When `bot_override` is `Some` it replaces the Telegram adapter as the handlers' [`Bot`].
#[instrument(skip(config, bot_override))]
pub async fn build_components(
    config: &BotConfig,
    bot_override: Option<Arc<dyn Bot>>,
) -> Result<AppComponents> {
    let db = Database::new(config.database_url()).await.map_err(|e| {
        error!(
            error = %e,
            database_url = %config.database_url(),
            "Failed to initialize database"
        );
        anyhow::anyhow!("Failed to initialize database: {}", e)
    })?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let content = Arc::new(ContentEngine::new());

    let services = PluginServices {
        db: db.clone(),
        content: content.clone(),
        http: http.clone(),
    };
    let plugins = Arc::new(PluginManager::new(
        db.clone(),
        PluginRegistry::with_builtins(),
        services,
        Some(PathBuf::from(&config.plugins.plugin_dir)),
    ));
    match plugins.load_all_plugins().await {
        Ok(n) => info!(loaded = n, "Plugins loaded"),
        Err(e) => error!(error = %e, "Plugin loading failed, continuing without plugins"),
    }

    let updates = Arc::new(UpdateManager::new(
        db.clone(),
        Arc::new(GitCli::new(
            &config.updates.repo_dir,
            config.updates.github_repo_url.clone(),
        )),
        BackupManager::new(
            &config.updates.repo_dir,
            &config.updates.backup_dir,
            config.updates.max_backups,
        ),
        Some(plugins.clone()),
        config.updates.auto_update_enabled,
    ));

    let teloxide_bot = config
        .bot_token()
        .map(|token| build_teloxide_bot(token, config.telegram_api_url()));
    let bot = bot_override.or_else(|| {
        teloxide_bot
            .clone()
            .map(|b| Arc::new(TelegramBotAdapter::new(b)) as Arc<dyn Bot>)
    });
    if bot.is_none() {
        info!("No bot token configured, Telegram bot disabled");
    }

    let collector = Arc::new(MetricsCollector::new(db.clone(), Some(plugins.clone())));
    let health = Arc::new(HealthMonitor::new(db.clone(), bot.clone(), collector.clone()));

    let llm = OpenAILlmClient::from_config(&config.llm).map(|c| Arc::new(c) as Arc<dyn LlmClient>);
    let stripe = config
        .stripe
        .secret_key
        .clone()
        .map(|key| StripeClient::new(http, key));

    info!(
        llm_configured = llm.is_some(),
        stripe_configured = stripe.is_some(),
        "Components built"
    );

    Ok(AppComponents {
        config_store: ConfigStore::new(db.clone()),
        db,
        content,
        plugins,
        updates,
        collector,
        health,
        llm,
        teloxide_bot,
        bot,
        stripe,
    })
}

/// Chain order: UserState (before), Reply (after), Command, Conversation.
/// `None` when there is no bot to reply through.
pub fn build_handler_chain(components: &AppComponents) -> Option<HandlerChain> {
    let bot = components.bot.clone()?;
    Some(
        HandlerChain::new()
            .add_handler(Arc::new(UserStateHandler::new(components.db.clone())))
            .add_handler(Arc::new(ReplyHandler::new(bot)))
            .add_handler(Arc::new(CommandHandler::new(
                components.plugins.clone(),
                components.stripe.is_some(),
                components.llm.is_some(),
            )))
            .add_handler(Arc::new(ConversationHandler::new(
                components.db.clone(),
                components.llm.clone(),
            ))),
    )
}

/// Router state for [`crate::server::build_router`].
pub fn build_app_state(
    config: &BotConfig,
    components: &AppComponents,
    chain: Option<HandlerChain>,
) -> Result<AppState> {
    Ok(AppState {
        db: components.db.clone(),
        config: components.config_store.clone(),
        plugins: components.plugins.clone(),
        updates: components.updates.clone(),
        health: components.health.clone(),
        content: components.content.clone(),
        templates: Arc::new(Templates::new()?),
        chain,
        stripe: components.stripe.clone(),
        stripe_webhook_secret: config.stripe.webhook_secret.clone(),
        telegram_webhook_secret: config.base.webhook_secret.clone(),
        admin_token: config.base.admin_token.clone(),
        public_base_url: config.base.public_base_url.clone(),
    })
}
