//! Resource sampling into `system_metrics`, health checks, and the periodic observer task.

mod health;
mod metrics;
mod observer;

pub use health::{alerts_for, Alert, CheckResult, HealthMonitor, SystemStatus};
pub use metrics::{MetricsCollector, ResourceUsage};
pub use observer::spawn_observer;
