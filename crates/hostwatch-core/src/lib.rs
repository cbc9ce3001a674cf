//! hostwatch core: metric records, the local OS sampler, the bounded rolling
//! window, and the error surface shared by the dashboard and the collector.
//!
//! This crate carries no HTTP or async runtime dependencies so both binaries
//! can share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `HostwatchError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;
pub mod sampler;
pub mod window;

/// Shared result type.
pub use error::{ErrorCode, HostwatchError, Result};
pub use metrics::{LocalMetrics, MetricSample, MetricsSnapshot, RemoteReading};
pub use sampler::LocalSampler;
pub use window::{RollingWindow, DEFAULT_WINDOW_CAPACITY};
