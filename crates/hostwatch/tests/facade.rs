#![allow(clippy::unwrap_used)]

use hostwatch::collector::CollectorConfig;
use hostwatch::core::{RollingWindow, DEFAULT_WINDOW_CAPACITY};
use hostwatch::dashboard::config;

#[test]
fn facade_exposes_all_three_crates() {
    assert_eq!(RollingWindow::default().capacity(), DEFAULT_WINDOW_CAPACITY);
    assert_eq!(CollectorConfig::default().interval_secs, 5);
    assert_eq!(config::parse_str("{}").unwrap().server.port, 5000);
}
