//! hostwatch collector library entry.
//!
//! Samples the local host on a fixed interval and keeps the newest samples in
//! `{DATA_DIR}/metrics.json`. Storage failures are logged and never stop the
//! loop.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod store;

use std::future::Future;

use hostwatch_core::error::Result;
use hostwatch_core::sampler::cpu_sample_window;
use hostwatch_core::{LocalSampler, MetricSample, DEFAULT_WINDOW_CAPACITY};

pub use config::CollectorConfig;
pub use store::MetricsLog;

pub struct Collector {
    cfg: CollectorConfig,
    sampler: LocalSampler,
    log: MetricsLog,
}

impl Collector {
    pub fn new(cfg: CollectorConfig) -> Self {
        let log = MetricsLog::new(cfg.log_path(), DEFAULT_WINDOW_CAPACITY);
        Self {
            cfg,
            sampler: LocalSampler::new(),
            log,
        }
    }

    pub fn log(&self) -> &MetricsLog {
        &self.log
    }

    /// Create the data directory. Failure is logged; ticks will keep
    /// reporting write errors until the directory appears.
    pub fn prepare(&self) {
        if let Err(e) = std::fs::create_dir_all(&self.cfg.data_dir) {
            tracing::error!(dir = %self.cfg.data_dir.display(), error = %e, "create data dir failed");
        }
    }

    /// Take one sample over the CPU window and persist it.
    pub async fn tick(&mut self) -> Result<MetricSample> {
        self.sampler.prime_cpu();
        tokio::time::sleep(cpu_sample_window()).await;

        let local = self.sampler.sample();
        let sample = MetricSample::from_local(local, chrono::Utc::now().timestamp());
        let window = self.log.append(sample)?;

        tracing::debug!(
            cpu = sample.cpu_percent,
            mem = sample.mem_percent,
            disk = sample.disk_percent,
            kept = window.len(),
            "sample recorded"
        );
        Ok(sample)
    }

    /// Tick forever, sleeping `interval` between ticks, until `shutdown`
    /// resolves. Shutdown is only observed between ticks.
    pub async fn run<S>(mut self, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let interval = self.cfg.interval();

        loop {
            if let Err(e) = self.tick().await {
                tracing::error!(code = e.code().as_str(), error = %e, "collect tick failed");
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        tracing::info!("collector stopped");
    }
}
