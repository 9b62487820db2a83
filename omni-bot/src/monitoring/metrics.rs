use std::sync::{Arc, Mutex, PoisonError};

use storage::{Database, StorageError};
use sysinfo::{Disks, System};
use tracing::{debug, instrument};

use crate::plugins::PluginManager;

/// One reading of machine and process resources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceUsage {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub process_rss_mb: f64,
    /// `None` when no disk is visible.
    pub disk_free_percent: Option<f64>,
}

pub struct MetricsCollector {
    db: Database,
    plugins: Option<Arc<PluginManager>>,
    /// Kept between samples; CPU usage is the delta since the previous refresh.
    system: Mutex<System>,
}

impl MetricsCollector {
    pub fn new(db: Database, plugins: Option<Arc<PluginManager>>) -> Self {
        Self {
            db,
            plugins,
            system: Mutex::new(System::new()),
        }
    }

    pub fn resources(&self) -> ResourceUsage {
        let mut sys = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        sys.refresh_cpu();
        sys.refresh_memory();

        let memory_percent = if sys.total_memory() == 0 {
            0.0
        } else {
            sys.used_memory() as f64 / sys.total_memory() as f64 * 100.0
        };

        let process_rss_mb = sysinfo::get_current_pid()
            .ok()
            .and_then(|pid| {
                sys.refresh_process(pid);
                sys.process(pid).map(|p| p.memory() as f64 / (1024.0 * 1024.0))
            })
            .unwrap_or(0.0);

        let disks = Disks::new_with_refreshed_list();
        let (free, total) = disks.list().iter().fold((0u64, 0u64), |(f, t), d| {
            (f + d.available_space(), t + d.total_space())
        });
        let disk_free_percent = (total > 0).then(|| free as f64 / total as f64 * 100.0);

        ResourceUsage {
            cpu_percent: sys.global_cpu_info().cpu_usage() as f64,
            memory_percent,
            process_rss_mb,
            disk_free_percent,
        }
    }

    /// Takes one sample and appends a row per metric. Returns what was recorded.
    #[instrument(skip(self))]
    pub async fn sample(&self) -> Result<Vec<(String, f64)>, StorageError> {
        let usage = self.resources();
        let active_plugins = match self.plugins {
            Some(ref p) => p.get_active_plugins().await.len() as f64,
            None => 0.0,
        };
        let user_count = self.db.user_states().count().await? as f64;

        let mut samples = vec![
            ("cpu_percent".to_string(), usage.cpu_percent),
            ("memory_percent".to_string(), usage.memory_percent),
            ("process_rss_mb".to_string(), usage.process_rss_mb),
            ("active_plugins".to_string(), active_plugins),
            ("user_count".to_string(), user_count),
        ];
        if let Some(disk) = usage.disk_free_percent {
            samples.push(("disk_free_percent".to_string(), disk));
        }

        self.db.metrics().record_many(&samples).await?;
        debug!(count = samples.len(), "Metrics sampled");
        Ok(samples)
    }
}
