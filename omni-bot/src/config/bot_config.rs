//! BotConfig: BaseConfig plus the service sections. Use `load()` then `validate()`.

use anyhow::Result;

use super::{BaseConfig, LlmConfig, MonitoringConfig, PluginConfig, StripeConfig, UpdateConfig};

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub base: BaseConfig,
    pub llm: LlmConfig,
    pub stripe: StripeConfig,
    pub updates: UpdateConfig,
    pub plugins: PluginConfig,
    pub monitoring: MonitoringConfig,
}

impl BotConfig {
    /// Loads every section from env. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        Ok(Self {
            base: BaseConfig::load(token)?,
            llm: LlmConfig::from_env(),
            stripe: StripeConfig::from_env(),
            updates: UpdateConfig::from_env()?,
            plugins: PluginConfig::from_env(),
            monitoring: MonitoringConfig::from_env()?,
        })
    }

    /// Fails fast before anything is initialized.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        if let Some(ref url) = self.llm.base_url {
            if reqwest::Url::parse(url).is_err() {
                anyhow::bail!("OPENAI_BASE_URL is set but not a valid URL: {}", url);
            }
        }
        if self.monitoring.interval_secs == 0 {
            anyhow::bail!("METRICS_INTERVAL_SECS must be greater than zero");
        }
        if self.updates.max_backups == 0 {
            anyhow::bail!("MAX_BACKUPS must be greater than zero");
        }
        Ok(())
    }

    pub fn bot_token(&self) -> Option<&str> {
        self.base.bot_token.as_deref()
    }
    pub fn database_url(&self) -> &str {
        &self.base.database_url
    }
    pub fn log_file(&self) -> &str {
        &self.base.log_file
    }
    pub fn telegram_api_url(&self) -> Option<&str> {
        self.base.telegram_api_url.as_deref()
    }
}
