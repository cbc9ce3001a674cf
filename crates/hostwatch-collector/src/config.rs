use std::path::PathBuf;
use std::time::Duration;

use hostwatch_core::error::{HostwatchError, Result};

pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const INTERVAL_ENV: &str = "COLLECT_INTERVAL_SECONDS";

/// Name of the rolling log inside `data_dir`.
pub const LOG_FILE_NAME: &str = "metrics.json";

/// Collector settings, built once at start-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    pub data_dir: PathBuf,
    pub interval_secs: u64,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/app/data"),
            interval_secs: 5,
        }
    }
}

impl CollectorConfig {
    /// Defaults overlaid by `DATA_DIR` and `COLLECT_INTERVAL_SECONDS`.
    pub fn from_env<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(dir) = lookup(DATA_DIR_ENV).filter(|v| !v.trim().is_empty()) {
            cfg.data_dir = PathBuf::from(dir.trim());
        }
        if let Some(raw) = lookup(INTERVAL_ENV) {
            cfg.interval_secs = raw.trim().parse().map_err(|_| {
                HostwatchError::Config(format!("{INTERVAL_ENV} must be a whole number of seconds, got {raw:?}"))
            })?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(HostwatchError::Config(format!("{INTERVAL_ENV} must be >= 1")));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(HostwatchError::Config(format!("{DATA_DIR_ENV} must not be empty")));
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }
}
