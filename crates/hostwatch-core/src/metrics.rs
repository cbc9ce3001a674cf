//! Metric records shared by the dashboard and the collector.
//!
//! Field names are part of the external contract: `/api/metrics` emits
//! `MetricsSnapshot` as-is and the collector persists `MetricSample` lists.

use serde::{Deserialize, Serialize};

/// Instantaneous utilisation of the local host, each value in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalMetrics {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

/// Result of one remote monitoring query.
///
/// A failed query is still a value: both figures are `None` and `error`
/// carries the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteReading {
    pub azure_cpu: Option<f64>,
    /// Memory working set in megabytes.
    pub azure_memory: Option<f64>,
    pub error: Option<String>,
}

impl RemoteReading {
    pub fn ok(cpu: f64, memory_mb: f64) -> Self {
        Self {
            azure_cpu: Some(round_to(cpu, 2)),
            azure_memory: Some(round_to(memory_mb, 2)),
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        let mut reason = reason.into();
        if reason.trim().is_empty() {
            reason = "remote metrics unavailable".to_string();
        }
        Self {
            azure_cpu: None,
            azure_memory: None,
            error: Some(reason),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// One response of the metrics endpoint.
///
/// Serialises flat: `{cpu, memory, disk}` and, when remote metrics are
/// enabled, `{azure_cpu, azure_memory, error}` next to them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    #[serde(flatten)]
    pub local: LocalMetrics,
    #[serde(flatten)]
    pub remote: Option<RemoteReading>,
}

impl MetricsSnapshot {
    /// Build the snapshot from two independently computed readings.
    pub fn merge(local: LocalMetrics, remote: Option<RemoteReading>) -> Self {
        Self { local, remote }
    }
}

/// One element of the collector's rolling log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub cpu_percent: f64,
    pub mem_percent: f64,
    pub disk_percent: f64,
    /// Unix seconds.
    pub timestamp: i64,
}

impl MetricSample {
    pub fn from_local(local: LocalMetrics, timestamp: i64) -> Self {
        Self {
            cpu_percent: local.cpu,
            mem_percent: local.memory,
            disk_percent: local.disk,
            timestamp,
        }
    }
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Clamp a ratio-derived percentage into `[0, 100]`; NaN becomes 0.
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// `used / total` as a percentage; 0 when `total` is 0.
pub fn percent_of(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    clamp_percent(used as f64 / total as f64 * 100.0)
}
