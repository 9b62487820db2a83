//! Integration tests for [`storage::Database`] and its repositories.
//!
//! Uses in-memory SQLite for ordering/aggregation behaviour and a temp file for persistence.

use chrono::{Duration, Utc};
use storage::{Database, NewPlugin, UpdateStatus};

/// **Test: Schema creation is idempotent and data survives reopening a file database.**
///
/// **Setup:** Temp dir; open `bot.db`, set one config entry, drop the handle.
/// **Action:** Reopen the same file.
/// **Expected:** Opening succeeds and the entry is still there.
#[tokio::test]
async fn test_file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("bot.db");
    let url = path.to_string_lossy().to_string();

    {
        let db = Database::new(&url).await.expect("Failed to open database");
        db.bot_config()
            .set("welcome_message", "hello", false)
            .await
            .expect("Failed to set config");
    }

    let db = Database::new(&url).await.expect("Failed to reopen database");
    let entry = db
        .bot_config()
        .get("welcome_message")
        .await
        .expect("Failed to get config");

    assert_eq!(entry.map(|e| e.value), Some("hello".to_string()));
}

/// **Test: Enabled filter and counts for plugins.**
///
/// **Setup:** In-memory DB; insert three plugins, disable one.
/// **Action:** `list_enabled`, `count`, `count_enabled`.
/// **Expected:** Two enabled (sorted by name), three total; disabling an unknown plugin returns false.
#[tokio::test]
async fn test_plugin_enable_disable_and_counts() {
    let db = Database::new("sqlite::memory:")
        .await
        .expect("Failed to create database");
    let repo = db.plugins();

    for name in ["example", "analytics", "content_suggestions"] {
        repo.insert(&NewPlugin {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            enabled: true,
            module_path: format!("builtin::{}", name),
            config: None,
        })
        .await
        .expect("Failed to insert plugin");
    }

    assert!(repo.set_enabled("analytics", false).await.unwrap());
    assert!(!repo.set_enabled("missing", false).await.unwrap());

    let enabled: Vec<String> = repo
        .list_enabled()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();

    assert_eq!(enabled, vec!["content_suggestions", "example"]);
    assert_eq!(repo.count().await.unwrap(), 3);
    assert_eq!(repo.count_enabled().await.unwrap(), 2);
}

/// **Test: Update history is returned newest first and respects the limit.**
///
/// **Setup:** In-memory DB; start five attempts, finish each as success.
/// **Action:** `recent(3)`.
/// **Expected:** Three records with descending ids, all `success`.
#[tokio::test]
async fn test_update_history_recent_newest_first() {
    let db = Database::new("sqlite::memory:")
        .await
        .expect("Failed to create database");
    let repo = db.update_history();

    for i in 0..5 {
        let id = repo.start(Some(&format!("v{}", i))).await.unwrap();
        repo.set_version_to(id, &format!("v{}", i + 1)).await.unwrap();
        repo.finish(id, UpdateStatus::Success, None).await.unwrap();
    }

    let recent = repo.recent(3).await.unwrap();

    assert_eq!(recent.len(), 3);
    assert!(recent[0].id > recent[1].id && recent[1].id > recent[2].id);
    assert_eq!(recent[0].version_to.as_deref(), Some("v5"));
    assert!(recent.iter().all(|r| r.status == UpdateStatus::Success));
}

/// **Test: Metric aggregation over a time window.**
///
/// **Setup:** In-memory DB; two revenue samples today, one from 40 days ago.
/// **Action:** `sum_since` and `count_since` with a 30-day window.
/// **Expected:** Only today's samples are counted.
#[tokio::test]
async fn test_metrics_sum_and_count_since() {
    let db = Database::new("sqlite::memory:")
        .await
        .expect("Failed to create database");
    let repo = db.metrics();
    let now = Utc::now();

    repo.record("payments.revenue_usd", 297.0).await.unwrap();
    repo.record("payments.revenue_usd", 497.0).await.unwrap();
    repo.record_at("payments.revenue_usd", 997.0, now - Duration::days(40))
        .await
        .unwrap();

    let since = now - Duration::days(30);
    let sum = repo.sum_since("payments.revenue_usd", since).await.unwrap();
    let count = repo.count_since("payments.revenue_usd", since).await.unwrap();

    assert_eq!(sum, 794.0);
    assert_eq!(count, 2);
    assert_eq!(
        repo.sum_since("payments.unknown", since).await.unwrap(),
        0.0
    );
}

/// **Test: A metrics snapshot is written atomically with a shared timestamp.**
///
/// **Setup:** In-memory DB.
/// **Action:** `record_many` with three samples, then `recent(10)`.
/// **Expected:** Three rows, identical timestamps.
#[tokio::test]
async fn test_metrics_record_many() {
    let db = Database::new("sqlite::memory:")
        .await
        .expect("Failed to create database");
    let repo = db.metrics();

    repo.record_many(&[
        ("cpu_percent".to_string(), 12.5),
        ("memory_percent".to_string(), 40.0),
        ("disk_percent".to_string(), 70.0),
    ])
    .await
    .unwrap();

    let recent = repo.recent(10).await.unwrap();
    assert_eq!(recent.len(), 3);
    assert!(recent.iter().all(|m| m.timestamp == recent[0].timestamp));
}
