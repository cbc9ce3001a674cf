#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use hostwatch_dashboard::auth::UserIdentity;
use hostwatch_dashboard::session::{new_session_id, SessionData, SessionStore, ANONYMOUS_TTL};

fn logged_in() -> SessionData {
    SessionData {
        user: Some(UserIdentity {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            subject: None,
        }),
        ..Default::default()
    }
}

#[test]
fn save_load_remove() {
    let store = SessionStore::new(Duration::from_secs(60));
    store.save("a", logged_in());
    assert_eq!(store.load("a"), Some(logged_in()));
    assert_eq!(store.load("b"), None);

    assert_eq!(store.remove("a"), Some(logged_in()));
    assert!(store.is_empty());
}

#[test]
fn idle_sessions_expire() {
    let store = SessionStore::new(Duration::from_millis(20));
    store.save("a", logged_in());
    store.save("b", logged_in());
    std::thread::sleep(Duration::from_millis(40));

    assert_eq!(store.load("a"), None);
    assert_eq!(store.purge_expired(), 1);
    assert!(store.is_empty());
}

#[test]
fn anonymous_sessions_expire_before_logged_in_ones() {
    let store = SessionStore::with_anonymous_ttl(Duration::from_secs(60), Duration::from_millis(20));
    store.save("anon", SessionData {
        post_login_redirect: Some("/".into()),
        ..Default::default()
    });
    store.save("user", logged_in());
    std::thread::sleep(Duration::from_millis(40));

    assert_eq!(store.purge_expired(), 1);
    assert_eq!(store.load("anon"), None);
    assert_eq!(store.load("user"), Some(logged_in()));
}

#[test]
fn anonymous_ttl_never_exceeds_session_ttl() {
    let store = SessionStore::with_anonymous_ttl(Duration::from_millis(20), Duration::from_secs(3600));
    store.save("anon", SessionData::default());
    std::thread::sleep(Duration::from_millis(40));
    assert_eq!(store.load("anon"), None);

    assert!(ANONYMOUS_TTL < Duration::from_secs(28_800));
}

#[test]
fn session_ids_are_unique_and_url_safe() {
    let a = new_session_id();
    let b = new_session_id();
    assert_ne!(a, b);
    assert_eq!(a.len(), 43);
    assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
}
