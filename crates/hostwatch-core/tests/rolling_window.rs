//! Rolling window capacity and persistence format.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use hostwatch_core::{MetricSample, RollingWindow, DEFAULT_WINDOW_CAPACITY};

fn sample(ts: i64) -> MetricSample {
    MetricSample {
        cpu_percent: 10.0,
        mem_percent: 20.0,
        disk_percent: 30.0,
        timestamp: ts,
    }
}

#[test]
fn caps_at_200_and_drops_oldest() {
    let mut w = RollingWindow::default();
    for ts in 1..=200 {
        w.push(sample(ts));
    }
    assert_eq!(w.len(), DEFAULT_WINDOW_CAPACITY);
    assert_eq!(w.entries()[0].timestamp, 1);

    w.push(sample(201));
    assert_eq!(w.len(), 200);
    assert_eq!(w.entries()[0].timestamp, 2);
    assert_eq!(w.latest().unwrap().timestamp, 201);

    let ts: Vec<i64> = w.entries().iter().map(|s| s.timestamp).collect();
    assert!(ts.windows(2).all(|p| p[0] < p[1]));
}

#[test]
fn oversized_input_is_truncated_on_load() {
    let entries: Vec<MetricSample> = (0..250).map(sample).collect();
    let json = serde_json::to_string(&entries).unwrap();

    let w = RollingWindow::from_json(200, &json).unwrap();
    assert_eq!(w.len(), 200);
    assert_eq!(w.entries()[0].timestamp, 50);
    assert_eq!(w.latest().unwrap().timestamp, 249);
}

#[test]
fn blank_input_is_empty_window() {
    let w = RollingWindow::from_json(200, "  \n").unwrap();
    assert!(w.is_empty());
}

#[test]
fn corrupt_input_is_storage_error() {
    let err = RollingWindow::from_json(200, "{not json").unwrap_err();
    assert_eq!(err.code().as_str(), "STORAGE");
}

#[test]
fn persisted_shape_matches_contract() {
    let mut w = RollingWindow::new(3);
    w.push(MetricSample {
        cpu_percent: 1.5,
        mem_percent: 42.0,
        disk_percent: 71.3,
        timestamp: 1_700_000_000,
    });

    let v: serde_json::Value = serde_json::from_str(&w.to_json().unwrap()).unwrap();
    let first = &v.as_array().unwrap()[0];
    assert_eq!(first["cpu_percent"], 1.5);
    assert_eq!(first["mem_percent"], 42.0);
    assert_eq!(first["disk_percent"], 71.3);
    assert_eq!(first["timestamp"], 1_700_000_000i64);
    assert!(first["timestamp"].is_i64());
}

#[test]
fn zero_capacity_keeps_one() {
    let mut w = RollingWindow::new(0);
    w.push(sample(1));
    w.push(sample(2));
    assert_eq!(w.capacity(), 1);
    assert_eq!(w.entries(), &[sample(2)]);
}
