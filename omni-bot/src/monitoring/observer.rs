use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use storage::Database;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::metrics::MetricsCollector;
use crate::config::MonitoringConfig;

/// Samples metrics every `interval_secs` and prunes resource rows older than `retention_days`.
/// Payment metrics are never pruned.
/// The task ends when `shutdown` turns true or its sender is dropped.
pub fn spawn_observer(
    db: Database,
    collector: Arc<MetricsCollector>,
    config: MonitoringConfig,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let period = Duration::from_secs(config.interval_secs.max(1));
    tokio::spawn(async move {
        info!(interval_secs = period.as_secs(), retention_days = config.retention_days, "Metrics observer started");
        let mut ticker = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = collector.sample().await {
                        error!(error = %e, "Metrics sample failed");
                    }
                    let cutoff = Utc::now() - chrono::Duration::days(config.retention_days);
                    match db.metrics().prune_older_than(cutoff).await {
                        Ok(0) => {}
                        Ok(n) => info!(pruned = n, "Pruned old metrics"),
                        Err(e) => error!(error = %e, "Metrics prune failed"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Metrics observer stopped");
    })
}
