//! Health checks behind `GET /health` and the admin dashboard.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use storage::Database;
use tracing::{error, instrument};

use super::metrics::MetricsCollector;
use crate::core::Bot;

const BOT_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub healthy: bool,
    /// Healthy but close to a limit.
    pub warning: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "JsonValue::is_null")]
    pub details: JsonValue,
}

impl CheckResult {
    fn ok(details: JsonValue) -> Self {
        Self {
            healthy: true,
            warning: false,
            error: None,
            details,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            healthy: false,
            warning: false,
            error: Some(error.into()),
            details: JsonValue::Null,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub healthy: bool,
    pub timestamp: DateTime<Utc>,
    pub checks: BTreeMap<String, CheckResult>,
    pub response_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    /// `error` or `warning`.
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub message: String,
}

/// Errors for failing checks, warnings for checks near their limits.
pub fn alerts_for(status: &SystemStatus) -> Vec<Alert> {
    status
        .checks
        .iter()
        .filter_map(|(name, check)| {
            if !check.healthy {
                Some(Alert {
                    kind: "error".to_string(),
                    source: name.clone(),
                    message: check
                        .error
                        .clone()
                        .unwrap_or_else(|| "Health check failed".to_string()),
                })
            } else if check.warning {
                Some(Alert {
                    kind: "warning".to_string(),
                    source: name.clone(),
                    message: format!("{} is approaching limits", name),
                })
            } else {
                None
            }
        })
        .collect()
}

pub struct HealthMonitor {
    db: Database,
    bot: Option<Arc<dyn Bot>>,
    collector: Arc<MetricsCollector>,
}

impl HealthMonitor {
    pub fn new(db: Database, bot: Option<Arc<dyn Bot>>, collector: Arc<MetricsCollector>) -> Self {
        Self { db, bot, collector }
    }

    /// Runs every check, then stores `health.response_time_ms` and `health.healthy`.
    #[instrument(skip(self))]
    pub async fn get_system_status(&self) -> SystemStatus {
        let started = Instant::now();
        let mut checks = BTreeMap::new();

        checks.insert("database".to_string(), self.check_database().await);
        checks.insert("telegram_bot".to_string(), self.check_bot().await);

        let usage = self.collector.resources();
        let mem = usage.memory_percent;
        checks.insert(
            "memory_usage".to_string(),
            CheckResult {
                healthy: mem < 90.0,
                warning: mem > 80.0,
                error: (mem >= 90.0).then(|| format!("memory usage at {:.1}%", mem)),
                details: json!({ "used_percent": round2(mem) }),
            },
        );
        let cpu = usage.cpu_percent;
        checks.insert(
            "cpu_usage".to_string(),
            CheckResult {
                healthy: cpu < 90.0,
                warning: cpu > 70.0,
                error: (cpu >= 90.0).then(|| format!("cpu usage at {:.1}%", cpu)),
                details: json!({ "usage_percent": round2(cpu) }),
            },
        );
        let disk = match usage.disk_free_percent {
            Some(free) => CheckResult {
                healthy: free > 10.0,
                warning: free < 20.0,
                error: (free <= 10.0).then(|| format!("only {:.1}% disk free", free)),
                details: json!({ "free_percent": round2(free) }),
            },
            None => CheckResult::ok(json!({ "free_percent": null })),
        };
        checks.insert("disk_space".to_string(), disk);

        let healthy = checks.values().all(|c| c.healthy);
        let response_time_ms = round2(started.elapsed().as_secs_f64() * 1000.0);

        let samples = [
            ("health.response_time_ms".to_string(), response_time_ms),
            ("health.healthy".to_string(), if healthy { 1.0 } else { 0.0 }),
        ];
        if let Err(e) = self.db.metrics().record_many(&samples).await {
            error!(error = %e, "Failed to store health metrics");
        }

        SystemStatus {
            healthy,
            timestamp: Utc::now(),
            checks,
            response_time_ms,
        }
    }

    async fn check_database(&self) -> CheckResult {
        match self.db.ping().await {
            Ok(()) => CheckResult::ok(json!({ "connected": true })),
            Err(e) => CheckResult::failed(e.to_string()),
        }
    }

    async fn check_bot(&self) -> CheckResult {
        let Some(ref bot) = self.bot else {
            return CheckResult::ok(json!({ "configured": false }));
        };
        match tokio::time::timeout(BOT_CHECK_TIMEOUT, bot.get_me()).await {
            Ok(Ok(username)) => CheckResult::ok(json!({ "bot_username": username })),
            Ok(Err(e)) => CheckResult::failed(e.to_string()),
            Err(_) => CheckResult::failed("getMe timed out"),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alerts_for_failed_and_warning_checks() {
        let mut checks = BTreeMap::new();
        checks.insert("database".to_string(), CheckResult::failed("locked"));
        checks.insert(
            "memory_usage".to_string(),
            CheckResult {
                healthy: true,
                warning: true,
                error: None,
                details: JsonValue::Null,
            },
        );
        checks.insert("cpu_usage".to_string(), CheckResult::ok(JsonValue::Null));
        let status = SystemStatus {
            healthy: false,
            timestamp: Utc::now(),
            checks,
            response_time_ms: 1.0,
        };

        let alerts = alerts_for(&status);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, "error");
        assert_eq!(alerts[0].source, "database");
        assert_eq!(alerts[0].message, "locked");
        assert_eq!(alerts[1].kind, "warning");
        assert_eq!(alerts[1].source, "memory_usage");
    }

    #[tokio::test]
    async fn test_status_stores_health_metrics() {
        let db = Database::new("sqlite::memory:").await.unwrap();
        let collector = Arc::new(MetricsCollector::new(db.clone(), None));
        let monitor = HealthMonitor::new(db.clone(), None, collector);

        let status = monitor.get_system_status().await;
        assert!(status.checks["database"].healthy);
        assert!(status.checks["telegram_bot"].healthy);
        assert!(status.response_time_ms >= 0.0);

        let stored = db.metrics().latest("health.healthy").await.unwrap().unwrap();
        assert_eq!(stored.metric_value, if status.healthy { 1.0 } else { 0.0 });
        assert!(db
            .metrics()
            .latest("health.response_time_ms")
            .await
            .unwrap()
            .is_some());
    }
}
