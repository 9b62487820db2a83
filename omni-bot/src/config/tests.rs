//! Config tests. Env-mutating tests run serially.

use std::env;

use serial_test::serial;
use storage::Database;

use super::{BotConfig, ConfigStore};

const VARS: &[&str] = &[
    "BOT_TOKEN",
    "TELEGRAM_TOKEN",
    "TELEGRAM_API_URL",
    "TELOXIDE_API_URL",
    "WEBHOOK_URL",
    "DATABASE_URL",
    "BIND_ADDR",
    "LOG_FILE",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "LLM_MODEL",
    "AUTO_UPDATE_ENABLED",
    "MAX_BACKUPS",
    "METRICS_INTERVAL_SECS",
    "METRICS_RETENTION_DAYS",
    "PUBLIC_BASE_URL",
    "OMNI_TEST_WELCOME",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    clear_env();

    let config = BotConfig::load(None).unwrap();

    assert!(config.bot_token().is_none());
    assert_eq!(config.database_url(), "omnicore.db");
    assert_eq!(config.log_file(), "logs/omni-bot.log");
    assert_eq!(config.base.bind_addr, "0.0.0.0:5000");
    assert_eq!(config.llm.model, "gpt-3.5-turbo");
    assert!(!config.llm.is_configured());
    assert!(!config.updates.auto_update_enabled);
    assert_eq!(config.updates.max_backups, 10);
    assert_eq!(config.monitoring.interval_secs, 60);
    assert_eq!(config.monitoring.retention_days, 7);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_config_telegram_token_fallback_and_override() {
    clear_env();
    env::set_var("TELEGRAM_TOKEN", "legacy_token");

    let config = BotConfig::load(None).unwrap();
    assert_eq!(config.bot_token(), Some("legacy_token"));

    let config = BotConfig::load(Some("override_token".to_string())).unwrap();
    assert_eq!(config.bot_token(), Some("override_token"));

    clear_env();
}

#[test]
#[serial]
fn test_load_config_custom_values() {
    clear_env();
    env::set_var("BOT_TOKEN", "custom_token");
    env::set_var("DATABASE_URL", "custom.db");
    env::set_var("AUTO_UPDATE_ENABLED", "True");
    env::set_var("METRICS_INTERVAL_SECS", "15");

    let config = BotConfig::load(None).unwrap();

    assert_eq!(config.database_url(), "custom.db");
    assert!(config.updates.auto_update_enabled);
    assert_eq!(config.monitoring.interval_secs, 15);

    clear_env();
}

#[test]
#[serial]
fn test_unparsable_number_is_error() {
    clear_env();
    env::set_var("MAX_BACKUPS", "ten");

    assert!(BotConfig::load(None).is_err());

    clear_env();
}

#[test]
#[serial]
fn test_validate_rejects_bad_urls_and_tokenless_webhook() {
    clear_env();
    env::set_var("TELEGRAM_API_URL", "not-a-valid-url");
    assert!(BotConfig::load(None).unwrap().validate().is_err());

    clear_env();
    env::set_var("WEBHOOK_URL", "https://bot.example.com/telegram-webhook");
    assert!(BotConfig::load(None).unwrap().validate().is_err());

    env::set_var("BOT_TOKEN", "test_token");
    assert!(BotConfig::load(None).unwrap().validate().is_ok());

    clear_env();
}

#[tokio::test]
#[serial]
async fn test_config_store_lookup_order() {
    clear_env();
    let db = Database::new("sqlite::memory:").await.unwrap();
    let store = ConfigStore::new(db);

    assert_eq!(
        store.get_or("omni_test_welcome", "default").await.unwrap(),
        "default"
    );

    env::set_var("OMNI_TEST_WELCOME", "from env");
    assert_eq!(
        store.get("omni_test_welcome").await.unwrap().as_deref(),
        Some("from env")
    );

    store.set("omni_test_welcome", "from db").await.unwrap();
    assert_eq!(
        store.get("omni_test_welcome").await.unwrap().as_deref(),
        Some("from db")
    );

    clear_env();
}

#[tokio::test]
async fn test_config_store_rejects_empty_key() {
    let db = Database::new("sqlite::memory:").await.unwrap();
    let store = ConfigStore::new(db);

    assert!(store.set("  ", "value").await.is_err());
}
