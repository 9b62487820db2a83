//! `/metrics` and `/users`: read-only summaries of the metrics and user tables.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use storage::Database;

use crate::plugins::{Plugin, PluginCommand, PluginContext, PluginError, PluginInit};

pub struct AnalyticsPlugin {
    name: String,
    db: Database,
}

impl AnalyticsPlugin {
    pub fn new(init: PluginInit) -> Self {
        Self {
            name: init.name,
            db: init.services.db,
        }
    }

    async fn metrics(&self) -> Result<String, PluginError> {
        let repo = self.db.metrics();
        let latest = |v: Option<storage::MetricRecord>| {
            v.map(|m| format!("{:.1}", m.metric_value))
                .unwrap_or_else(|| "n/a".to_string())
        };
        let cpu = latest(repo.latest("cpu_percent").await?);
        let memory = latest(repo.latest("memory_percent").await?);

        let since = Utc::now() - Duration::days(30);
        let revenue = repo.sum_since("payments.revenue_usd", since).await?;
        let payments = repo.count_since("payments.completed", since).await?;

        Ok(format!(
            "📈 System Metrics:\n\n🖥️ CPU: {}%\n🧠 Memory: {}%\n\n💰 Revenue (30d): ${:.2}\n🧾 Payments (30d): {}",
            cpu, memory, revenue, payments
        ))
    }

    async fn users(&self) -> Result<String, PluginError> {
        let users = self.db.user_states().count().await?;
        let plugins = self.db.plugins().count().await?;
        let enabled = self.db.plugins().count_enabled().await?;
        Ok(format!(
            "👥 Users: {}\n🔌 Plugins: {} installed, {} enabled",
            users, plugins, enabled
        ))
    }
}

#[async_trait]
impl Plugin for AnalyticsPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        "1.0.0"
    }

    fn description(&self) -> &str {
        "Usage and revenue analytics"
    }

    fn commands(&self) -> Vec<PluginCommand> {
        vec![
            PluginCommand::new("metrics", "Show live system and revenue metrics"),
            PluginCommand::new("users", "Show user and plugin counts"),
        ]
    }

    async fn execute(
        &self,
        command: &str,
        _ctx: &PluginContext,
    ) -> Result<Option<String>, PluginError> {
        match command {
            "metrics" => self.metrics().await.map(Some),
            "users" => self.users().await.map(Some),
            other => Err(PluginError::Execution(format!("unknown command {}", other))),
        }
    }
}
