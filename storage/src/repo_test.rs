//! Unit tests for the repositories behind [`crate::Database`].

use chrono::{Duration, Utc};
use serde_json::json;

use crate::database::Database;
use crate::error::StorageError;
use crate::models::{NewPlugin, UpdateStatus};

async fn memory_db() -> Database {
    Database::new("sqlite::memory:")
        .await
        .expect("Failed to create database")
}

fn new_plugin(name: &str) -> NewPlugin {
    NewPlugin {
        name: name.to_string(),
        version: "1.0.0".to_string(),
        enabled: true,
        module_path: format!("builtin::{}", name),
        config: None,
    }
}

#[tokio::test]
async fn test_config_set_overwrites_value() {
    let db = memory_db().await;
    let repo = db.bot_config();

    repo.set("bot_name", "first", false).await.unwrap();
    let entry = repo.set("bot_name", "second", false).await.unwrap();

    assert_eq!(entry.value, "second");
    assert_eq!(repo.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_config_delete_missing_key() {
    let db = memory_db().await;
    assert!(!db.bot_config().delete("nope").await.unwrap());
}

#[tokio::test]
async fn test_plugin_duplicate_name_rejected() {
    let db = memory_db().await;
    let repo = db.plugins();

    repo.insert(&new_plugin("example")).await.unwrap();
    let err = repo.insert(&new_plugin("example")).await.unwrap_err();

    assert!(matches!(err, StorageError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_plugin_config_round_trips_as_json() {
    let db = memory_db().await;
    let mut plugin = new_plugin("weather");
    plugin.config = Some(json!({"city": "Austin"}));

    let record = db.plugins().insert(&plugin).await.unwrap();

    assert_eq!(record.config_json()["city"], "Austin");
}

#[tokio::test]
async fn test_update_status_transitions() {
    let db = memory_db().await;
    let repo = db.update_history();

    let id = repo.start(Some("abc1234")).await.unwrap();
    let pending = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(pending.status, UpdateStatus::Pending);
    assert!(pending.completed_at.is_none());

    repo.finish(id, UpdateStatus::Failed, Some("merge conflict"))
        .await
        .unwrap();
    repo.set_status(id, UpdateStatus::RolledBack).await.unwrap();

    let record = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(record.status, UpdateStatus::RolledBack);
    assert_eq!(record.error_message.as_deref(), Some("merge conflict"));
    assert!(record.completed_at.is_some());
}

#[tokio::test]
async fn test_metrics_prune_keeps_recent() {
    let db = memory_db().await;
    let repo = db.metrics();
    let now = Utc::now();

    repo.record_at("cpu_percent", 10.0, now - Duration::days(10))
        .await
        .unwrap();
    repo.record_at("cpu_percent", 20.0, now).await.unwrap();

    let deleted = repo.prune_older_than(now - Duration::days(7)).await.unwrap();

    assert_eq!(deleted, 1);
    let latest = repo.latest("cpu_percent").await.unwrap().unwrap();
    assert_eq!(latest.metric_value, 20.0);
}

/// **Test: Pruning never removes payment records**
///
/// **Setup:** Revenue and a completed-payment count recorded ten days ago, next to an
/// equally old resource sample.
/// **Action:** Prune with a seven-day cutoff.
/// **Expected:** Only the resource sample is deleted; revenue totals are unchanged.
#[tokio::test]
async fn test_metrics_prune_keeps_payment_records() {
    let db = memory_db().await;
    let repo = db.metrics();
    let now = Utc::now();
    let old = now - Duration::days(10);

    repo.record_at("payments.revenue_usd", 297.0, old).await.unwrap();
    repo.record_at("payments.completed", 1.0, old).await.unwrap();
    repo.record_at("memory_percent", 40.0, old).await.unwrap();

    let deleted = repo.prune_older_than(now - Duration::days(7)).await.unwrap();

    assert_eq!(deleted, 1);
    let since = now - Duration::days(30);
    assert_eq!(repo.sum_since("payments.revenue_usd", since).await.unwrap(), 297.0);
    assert_eq!(repo.count_since("payments.completed", since).await.unwrap(), 1);
    assert_eq!(repo.count_since("memory_percent", since).await.unwrap(), 0);
}

#[tokio::test]
async fn test_user_state_upsert_replaces_data() {
    let db = memory_db().await;
    let repo = db.user_states();

    repo.upsert("42", "telegram", &json!({"history": []}))
        .await
        .unwrap();
    let record = repo
        .upsert("42", "telegram", &json!({"history": ["hi"]}))
        .await
        .unwrap();

    assert_eq!(record.state_json()["history"][0], "hi");
    assert_eq!(repo.count().await.unwrap(), 1);
}
