//! Bounded rolling window of metric samples.
//!
//! The window is persisted as a plain JSON array. Appending beyond capacity
//! drops the oldest entries, so the array always holds the newest
//! `capacity` samples in collection order.

use crate::error::{HostwatchError, Result};
use crate::metrics::MetricSample;

/// Number of samples kept by the collector.
pub const DEFAULT_WINDOW_CAPACITY: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct RollingWindow {
    capacity: usize,
    entries: Vec<MetricSample>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Vec::new(),
        }
    }

    /// Build from already-loaded samples, keeping only the newest `capacity`.
    pub fn from_entries(capacity: usize, entries: Vec<MetricSample>) -> Self {
        let mut w = Self {
            capacity: capacity.max(1),
            entries,
        };
        w.truncate();
        w
    }

    /// Parse a persisted JSON array. Blank input is an empty window.
    pub fn from_json(capacity: usize, s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self::new(capacity));
        }
        let entries: Vec<MetricSample> = serde_json::from_str(s)
            .map_err(|e| HostwatchError::Storage(format!("invalid metrics log: {e}")))?;
        Ok(Self::from_entries(capacity, entries))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.entries)
            .map_err(|e| HostwatchError::Internal(format!("encode metrics log failed: {e}")))
    }

    /// Append one sample and drop the oldest ones beyond capacity.
    pub fn push(&mut self, sample: MetricSample) {
        self.entries.push(sample);
        self.truncate();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> &[MetricSample] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&MetricSample> {
        self.entries.last()
    }

    fn truncate(&mut self) {
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.capacity;
            self.entries.drain(..excess);
        }
    }
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}
