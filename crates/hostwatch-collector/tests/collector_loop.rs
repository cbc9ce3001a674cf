//! Collector config and ticks against a temp data dir.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::HashMap;
use std::time::Duration;

use hostwatch_collector::{Collector, CollectorConfig};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |k: &str| map.get(k).cloned()
}

#[test]
fn defaults_without_env() {
    let cfg = CollectorConfig::from_env(env(&[])).unwrap();
    assert_eq!(cfg.data_dir, std::path::PathBuf::from("/app/data"));
    assert_eq!(cfg.interval(), Duration::from_secs(5));
    assert!(cfg.log_path().ends_with("metrics.json"));
}

#[test]
fn env_overrides_and_validation() {
    let cfg = CollectorConfig::from_env(env(&[
        ("DATA_DIR", "/tmp/hw"),
        ("COLLECT_INTERVAL_SECONDS", "30"),
    ]))
    .unwrap();
    assert_eq!(cfg.log_path(), std::path::PathBuf::from("/tmp/hw/metrics.json"));
    assert_eq!(cfg.interval_secs, 30);

    let err = CollectorConfig::from_env(env(&[("COLLECT_INTERVAL_SECONDS", "0")])).expect_err("zero");
    assert_eq!(err.code().as_str(), "CONFIG");

    let err = CollectorConfig::from_env(env(&[("COLLECT_INTERVAL_SECONDS", "soon")])).expect_err("nan");
    assert!(err.to_string().contains("COLLECT_INTERVAL_SECONDS"));
}

#[tokio::test]
async fn tick_appends_a_sample() {
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let mut collector = Collector::new(CollectorConfig {
        data_dir: data_dir.clone(),
        interval_secs: 1,
    });
    collector.prepare();
    assert!(data_dir.is_dir());

    let first = collector.tick().await.unwrap();
    let second = collector.tick().await.unwrap();
    assert!(second.timestamp >= first.timestamp);
    for v in [second.cpu_percent, second.mem_percent, second.disk_percent] {
        assert!((0.0..=100.0).contains(&v), "out of range: {v}");
    }

    let window = collector.log().load().unwrap();
    assert_eq!(window.len(), 2);
    assert_eq!(window.latest().copied(), Some(second));
}

#[tokio::test]
async fn failing_tick_does_not_stop_the_loop() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "file, not a dir").unwrap();

    let mut collector = Collector::new(CollectorConfig {
        data_dir: blocker.clone(),
        interval_secs: 1,
    });
    collector.prepare();
    let err = collector.tick().await.expect_err("write must fail");
    assert_eq!(err.code().as_str(), "STORAGE");

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let shutdown = async {
        let _ = stop_rx.await;
    };

    let driver = async {
        // The first tick inside run() fails against the blocker file.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert!(!blocker.is_dir());

        std::fs::remove_file(&blocker).unwrap();
        std::fs::create_dir(&blocker).unwrap();

        // A later tick lands once the directory exists.
        tokio::time::sleep(Duration::from_millis(1_800)).await;
        stop_tx.send(()).unwrap();
    };

    tokio::time::timeout(Duration::from_secs(10), async {
        tokio::join!(collector.run(shutdown), driver);
    })
    .await
    .expect("run returns after shutdown");

    let raw = std::fs::read_to_string(blocker.join("metrics.json")).unwrap();
    let samples: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
    assert!(!samples.is_empty());
}
