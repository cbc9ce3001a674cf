//! hostwatch collector
//!
//! Appends one local sample to `{DATA_DIR}/metrics.json` every
//! `COLLECT_INTERVAL_SECONDS`, keeping the newest 200.

use tracing_subscriber::{fmt, EnvFilter};

use hostwatch_collector::{Collector, CollectorConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cfg = match CollectorConfig::from_env(|key| std::env::var(key).ok()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(code = e.code().as_str(), error = %e, "hostwatch-collector failed");
            std::process::exit(1);
        }
    };

    tracing::info!(
        dir = %cfg.data_dir.display(),
        interval_secs = cfg.interval_secs,
        "hostwatch-collector starting"
    );

    let collector = Collector::new(cfg);
    collector.prepare();
    collector.run(shutdown_signal()).await;
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
