//! Shared application state for the dashboard.
//!
//! Built once at start-up from the immutable `DashboardConfig`; cloned into
//! every handler as an `Arc`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};

use hostwatch_core::error::Result;

use crate::auth::{EntraProvider, IdentityProvider};
use crate::config::DashboardConfig;
use crate::metrics::{AzureMonitorSource, MetricsService, RemoteMetricsSource};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: DashboardConfig,
    cookie_key: Key,
    sessions: SessionStore,
    identity: Arc<dyn IdentityProvider>,
    metrics: MetricsService,
}

impl AppState {
    /// Wire state from explicit collaborators (tests inject fakes here).
    pub fn new(
        cfg: DashboardConfig,
        identity: Arc<dyn IdentityProvider>,
        remote: Option<Arc<dyn RemoteMetricsSource>>,
    ) -> Result<Self> {
        cfg.validate()?;

        // `Key::from` needs 64 bytes; derive them from a secret of any length.
        let cookie_key = Key::from(&Sha512::digest(cfg.session.secret.as_bytes()));
        let sessions = SessionStore::new(Duration::from_secs(cfg.session.ttl_secs));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cookie_key,
                sessions,
                identity,
                metrics: MetricsService::new(remote),
                cfg,
            }),
        })
    }

    /// Wire state against Entra ID and, when configured, Azure Monitor.
    pub fn from_config(cfg: DashboardConfig) -> Result<Self> {
        let identity: Arc<dyn IdentityProvider> = Arc::new(EntraProvider::from_config(&cfg.identity)?);

        let remote: Option<Arc<dyn RemoteMetricsSource>> = match cfg.azure.target() {
            Some(target) => {
                let source = AzureMonitorSource::new(&cfg.identity, &cfg.azure, &target)?;
                tracing::info!(resource = source.resource_id(), "azure monitor metrics enabled");
                Some(Arc::new(source))
            }
            None => {
                tracing::info!("azure monitor metrics disabled");
                None
            }
        };

        Self::new(cfg, identity, remote)
    }

    pub fn cfg(&self) -> &DashboardConfig {
        &self.inner.cfg
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    pub fn metrics(&self) -> &MetricsService {
        &self.inner.metrics
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.inner.cookie_key.clone()
    }
}
