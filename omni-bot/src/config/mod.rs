//! Configuration: [`BaseConfig`] (Telegram, server, database, logging) plus one section per
//! service, all loaded from env. [`ConfigStore`] layers the `bot_config` table on top.

mod base;
mod bot_config;
mod services;
mod store;

#[cfg(test)]
mod tests;

pub use base::BaseConfig;
pub use bot_config::BotConfig;
pub use services::{LlmConfig, MonitoringConfig, PluginConfig, StripeConfig, UpdateConfig};
pub use store::ConfigStore;

use std::env;
use std::str::FromStr;

/// Env var value, treating empty strings as unset.
pub(crate) fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub(crate) fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

/// Parses an env var; unset falls back to `default`, unparsable is an error.
pub(crate) fn env_parse<T: FromStr>(name: &str, default: T) -> anyhow::Result<T> {
    match env_opt(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} is not valid: {}", name, raw)),
        None => Ok(default),
    }
}

/// `true`/`1`/`yes`/`on` (case-insensitive) are true; anything else is false.
pub(crate) fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
