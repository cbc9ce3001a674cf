//! hostwatch dashboard
//!
//! - Entra ID login (authorization-code flow) guarding every page
//! - `/` HTML view and `/api/metrics` JSON of live host metrics
//! - Optional Azure Monitor figures for a container app

use std::time::Duration;

use tracing_subscriber::{fmt, EnvFilter};

use hostwatch_core::error::{HostwatchError, Result};
use hostwatch_dashboard::{app_state, config, router, session};

const SESSION_PURGE_EVERY: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!(code = e.code().as_str(), error = %e, "hostwatch-dashboard failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load(|key| std::env::var(key).ok())?;
    let listen = cfg.server.socket_addr()?;

    let state = app_state::AppState::from_config(cfg)?;
    session::spawn_purger(state.clone(), SESSION_PURGE_EVERY);
    let app = router::build_router(state);

    tracing::info!(%listen, "hostwatch-dashboard starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| HostwatchError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| HostwatchError::Internal(format!("server failed: {e}")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "ctrl-c handler unavailable");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
