//! Browser sessions.
//!
//! The browser only holds an opaque random id in a signed cookie; the
//! session contents (logged-in user, pending login flow, post-login
//! destination) live in the in-process `SessionStore`.

pub mod guard;
pub mod store;

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;

use crate::app_state::AppState;
use crate::auth::{AuthFlow, UserIdentity};

pub use guard::require_login;
pub use store::{SessionStore, ANONYMOUS_TTL};

pub const SESSION_COOKIE: &str = "hostwatch_session";

/// Everything stored for one browser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionData {
    pub user: Option<UserIdentity>,
    /// Pending authorization-code flow started by `/login`.
    pub flow: Option<AuthFlow>,
    /// Local path (+query) to return to after login.
    pub post_login_redirect: Option<String>,
}

/// Per-request view of the caller's session.
#[derive(Debug)]
pub struct Session {
    id: Option<String>,
    pub data: SessionData,
}

impl Session {
    /// Resolve the cookie against the store. Unknown, forged, or expired ids
    /// yield a fresh empty session that gets a new id on `save`.
    pub fn load(store: &SessionStore, jar: &SignedCookieJar) -> Self {
        let id = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
        match id.as_deref().and_then(|id| store.load(id)) {
            Some(data) => Self { id, data },
            None => Self {
                id: None,
                data: SessionData::default(),
            },
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.data.user.as_ref()
    }

    /// Forget the current id so the next `save` issues a new one.
    pub fn cycle_id(&mut self, store: &SessionStore) {
        if let Some(old) = self.id.take() {
            store.remove(&old);
        }
    }

    /// Persist the session and (re)issue its cookie.
    pub fn save(self, store: &SessionStore, jar: SignedCookieJar, secure: bool) -> SignedCookieJar {
        let id = self.id.unwrap_or_else(new_session_id);
        store.save(&id, self.data);
        jar.add(session_cookie(id, secure))
    }

    /// Remove all session data and expire the cookie.
    pub fn destroy(self, store: &SessionStore, jar: SignedCookieJar) -> SignedCookieJar {
        if let Some(id) = self.id {
            store.remove(&id);
        }
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}

fn session_cookie(id: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// 256-bit random id, URL-safe base64.
pub fn new_session_id() -> String {
    random_token(32)
}

pub(crate) fn random_token(len: usize) -> String {
    let mut buf = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// Periodically drop expired sessions.
pub fn spawn_purger(state: AppState, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            let removed = state.sessions().purge_expired();
            if removed > 0 {
                tracing::debug!(removed, active = state.sessions().len(), "expired sessions purged");
            }
        }
    })
}
