//! Metrics Component: local host readings plus an optional remote source.

pub mod azure;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use hostwatch_core::error::Result;
use hostwatch_core::{LocalMetrics, LocalSampler, MetricsSnapshot, RemoteReading};

pub use azure::AzureMonitorSource;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Raw figures from a remote monitoring API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteUsage {
    pub cpu: f64,
    pub memory_bytes: f64,
}

/// Remote compute resource metrics (e.g. Azure Monitor).
#[async_trait]
pub trait RemoteMetricsSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<RemoteUsage>;
}

pub struct MetricsService {
    sampler: Mutex<LocalSampler>,
    remote: Option<Arc<dyn RemoteMetricsSource>>,
}

impl MetricsService {
    pub fn new(remote: Option<Arc<dyn RemoteMetricsSource>>) -> Self {
        Self {
            sampler: Mutex::new(LocalSampler::new()),
            remote,
        }
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    pub fn local_metrics(&self) -> LocalMetrics {
        let mut sampler = match self.sampler.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("local sampler mutex was poisoned, recovering");
                poisoned.into_inner()
            }
        };
        sampler.sample()
    }

    /// `None` when no remote source is configured. Never fails: errors are
    /// folded into the reading.
    pub async fn remote_metrics(&self) -> Option<RemoteReading> {
        let source = self.remote.as_ref()?;
        let reading = match source.fetch().await {
            Ok(usage) => RemoteReading::ok(usage.cpu, usage.memory_bytes / BYTES_PER_MB),
            Err(e) => {
                tracing::warn!(source = source.name(), error = %e, "remote metrics unavailable");
                RemoteReading::failed(e.to_string())
            }
        };
        Some(reading)
    }

    /// Local and remote readings merged into one record.
    pub async fn snapshot(&self) -> MetricsSnapshot {
        let local = self.local_metrics();
        let remote = self.remote_metrics().await;
        MetricsSnapshot::merge(local, remote)
    }
}
