//! Per-service config sections. Every field has a default so an empty env still loads.

use anyhow::Result;

use super::{env_opt, env_or, env_parse, parse_bool};

/// OpenAI-compatible chat completion settings.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: String,
    pub system_prompt: Option<String>,
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: env_opt("OPENAI_API_KEY"),
            base_url: env_opt("OPENAI_BASE_URL"),
            model: env_or("LLM_MODEL", "gpt-3.5-turbo"),
            system_prompt: env_opt("LLM_SYSTEM_PROMPT"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: Option<String>,
    pub public_key: Option<String>,
    pub webhook_secret: Option<String>,
}

impl StripeConfig {
    pub fn from_env() -> Self {
        Self {
            secret_key: env_opt("STRIPE_SECRET_KEY"),
            public_key: env_opt("STRIPE_PUBLIC_KEY"),
            webhook_secret: env_opt("STRIPE_WEBHOOK_SECRET"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }
}

/// Self-update: git remote, working tree, backups.
#[derive(Debug, Clone)]
pub struct UpdateConfig {
    pub github_repo_url: Option<String>,
    pub repo_dir: String,
    pub auto_update_enabled: bool,
    pub backup_dir: String,
    pub max_backups: usize,
}

impl UpdateConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            github_repo_url: env_opt("GITHUB_REPO_URL"),
            repo_dir: env_or("REPO_DIR", "."),
            auto_update_enabled: env_opt("AUTO_UPDATE_ENABLED")
                .map(|v| parse_bool(&v))
                .unwrap_or(false),
            backup_dir: env_or("BACKUP_DIR", "backups"),
            max_backups: env_parse("MAX_BACKUPS", 10)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Directory scanned for `*.toml` plugin manifests.
    pub plugin_dir: String,
}

impl PluginConfig {
    pub fn from_env() -> Self {
        Self {
            plugin_dir: env_or("PLUGIN_DIR", "plugins"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    pub interval_secs: u64,
    pub retention_days: i64,
}

impl MonitoringConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            interval_secs: env_parse("METRICS_INTERVAL_SECS", 60)?,
            retention_days: env_parse("METRICS_RETENTION_DAYS", 7)?,
        })
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            retention_days: 7,
        }
    }
}
