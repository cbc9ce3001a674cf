use std::time::{Duration, Instant};

use dashmap::DashMap;

use super::SessionData;

struct SessionEntry {
    data: SessionData,
    touched: Instant,
}

/// Idle lifetime of a session nobody has logged into yet.
pub const ANONYMOUS_TTL: Duration = Duration::from_secs(600);

impl SessionEntry {
    fn expired(&self, ttl: Duration, anonymous_ttl: Duration) -> bool {
        let limit = if self.data.user.is_some() { ttl } else { anonymous_ttl };
        self.touched.elapsed() >= limit
    }
}

/// Server-side session store: `session_id -> SessionData`.
///
/// Entries idle longer than their TTL are treated as absent and removed
/// lazily on access or in bulk by `purge_expired`. Sessions without a user
/// (pending logins, remembered destinations) use the shorter anonymous TTL.
pub struct SessionStore {
    entries: DashMap<String, SessionEntry>,
    ttl: Duration,
    anonymous_ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self::with_anonymous_ttl(ttl, ANONYMOUS_TTL)
    }

    /// `anonymous_ttl` is capped at `ttl`.
    pub fn with_anonymous_ttl(ttl: Duration, anonymous_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            anonymous_ttl: anonymous_ttl.min(ttl),
        }
    }

    /// Return a copy of the session and refresh its idle timer.
    pub fn load(&self, id: &str) -> Option<SessionData> {
        let mut entry = self.entries.get_mut(id)?;
        if entry.expired(self.ttl, self.anonymous_ttl) {
            drop(entry);
            self.entries.remove(id);
            return None;
        }
        entry.touched = Instant::now();
        Some(entry.data.clone())
    }

    pub fn save(&self, id: &str, data: SessionData) {
        self.entries.insert(
            id.to_string(),
            SessionEntry {
                data,
                touched: Instant::now(),
            },
        );
    }

    pub fn remove(&self, id: &str) -> Option<SessionData> {
        self.entries.remove(id).map(|(_, e)| e.data)
    }

    /// Drop every expired entry; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let before = self.entries.len();
        let (ttl, anonymous_ttl) = (self.ttl, self.anonymous_ttl);
        self.entries.retain(|_, e| !e.expired(ttl, anonymous_ttl));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
