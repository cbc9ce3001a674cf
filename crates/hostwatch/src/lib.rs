//! Top-level facade crate for hostwatch.
//!
//! Re-exports the shared metric types, the dashboard library, and the collector
//! library so users can depend on a single crate.

pub mod core {
    pub use hostwatch_core::*;
}

pub mod dashboard {
    pub use hostwatch_dashboard::*;
}

pub mod collector {
    pub use hostwatch_collector::*;
}
