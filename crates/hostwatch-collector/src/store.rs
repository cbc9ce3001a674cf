//! The on-disk rolling log.
//!
//! Every append is a full read-modify-write of one JSON array. The new
//! contents go to a sibling temp file first and are renamed over the log, so
//! a reader never sees a half-written array.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hostwatch_core::error::{HostwatchError, Result};
use hostwatch_core::{MetricSample, RollingWindow};

pub struct MetricsLog {
    path: PathBuf,
    capacity: usize,
}

impl MetricsLog {
    pub fn new(path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            path: path.into(),
            capacity,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current contents. A missing file is an empty log. A file that cannot
    /// be parsed is logged and treated as empty, so the next write replaces it.
    pub fn load(&self) -> Result<RollingWindow> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(RollingWindow::new(self.capacity)),
            Err(e) => {
                return Err(HostwatchError::Storage(format!(
                    "read {} failed: {e}",
                    self.path.display()
                )))
            }
        };

        match RollingWindow::from_json(self.capacity, &raw) {
            Ok(w) => Ok(w),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "discarding unreadable metrics log");
                Ok(RollingWindow::new(self.capacity))
            }
        }
    }

    /// Read, append, truncate, write. Returns the window as written.
    pub fn append(&self, sample: MetricSample) -> Result<RollingWindow> {
        let mut window = self.load()?;
        window.push(sample);
        self.write(&window)?;
        Ok(window)
    }

    pub fn write(&self, window: &RollingWindow) -> Result<()> {
        let body = window.to_json()?;
        let tmp = self.temp_path();

        fs::write(&tmp, body).map_err(|e| {
            HostwatchError::Storage(format!("write {} failed: {e}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            HostwatchError::Storage(format!("replace {} failed: {e}", self.path.display()))
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
