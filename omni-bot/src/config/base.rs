//! Base config: Telegram connection, HTTP server, database, logging. Loaded from env.

use anyhow::Result;

use super::{env_opt, env_or};

#[derive(Debug, Clone)]
pub struct BaseConfig {
    /// BOT_TOKEN or TELEGRAM_TOKEN. Without it the web server runs and the bot stays off.
    pub bot_token: Option<String>,
    /// TELEGRAM_API_URL or TELOXIDE_API_URL
    pub telegram_api_url: Option<String>,
    /// Public URL Telegram posts updates to. Unset means long polling.
    pub webhook_url: Option<String>,
    /// Compared against `X-Telegram-Bot-Api-Secret-Token` when set.
    pub webhook_secret: Option<String>,
    pub log_file: String,
    pub database_url: String,
    pub bind_addr: String,
    /// Bearer token guarding `/admin/*`. Unset leaves the panel open.
    pub admin_token: Option<String>,
    /// Base URL used in checkout redirect links.
    pub public_base_url: String,
}

impl BaseConfig {
    /// Loads from env. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| env_opt("BOT_TOKEN"))
            .or_else(|| env_opt("TELEGRAM_TOKEN"));
        let telegram_api_url = env_opt("TELEGRAM_API_URL").or_else(|| env_opt("TELOXIDE_API_URL"));

        Ok(Self {
            bot_token,
            telegram_api_url,
            webhook_url: env_opt("WEBHOOK_URL"),
            webhook_secret: env_opt("WEBHOOK_SECRET"),
            log_file: env_or("LOG_FILE", "logs/omni-bot.log"),
            database_url: env_or("DATABASE_URL", "omnicore.db"),
            bind_addr: env_or("BIND_ADDR", "0.0.0.0:5000"),
            admin_token: env_opt("ADMIN_TOKEN"),
            public_base_url: env_or("PUBLIC_BASE_URL", "http://localhost:5000"),
        })
    }

    /// URLs must parse; a webhook needs a token to register with.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("TELEGRAM_API_URL", &self.telegram_api_url),
            ("WEBHOOK_URL", &self.webhook_url),
        ] {
            if let Some(url) = value {
                if reqwest::Url::parse(url).is_err() {
                    anyhow::bail!("{} is set but not a valid URL: {}", name, url);
                }
            }
        }
        if reqwest::Url::parse(&self.public_base_url).is_err() {
            anyhow::bail!("PUBLIC_BASE_URL is not a valid URL: {}", self.public_base_url);
        }
        if self.webhook_url.is_some() && self.bot_token.is_none() {
            anyhow::bail!("WEBHOOK_URL is set but BOT_TOKEN is missing");
        }
        Ok(())
    }
}
