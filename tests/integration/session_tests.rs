//! Session round-trip tests over the wired application state

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use kboel_client::config::AppConfig;
use kboel_client::models::route::RoleSet;
use kboel_client::session::guard::Decision;
use kboel_client::session::indicator::SessionIndicator;
use kboel_client::session::store::{MemorySessionStore, SessionStore};
use kboel_client::AppState;

fn mint(sub: &str, roles: &[&str], exp: i64) -> String {
    encode(
        &Header::default(),
        &json!({"sub": sub, "roles": roles, "exp": exp, "iat": Utc::now().timestamp()}),
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("Failed to encode token")
}

fn state_with_memory_store() -> (AppState, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::new());
    let state = AppState::with_store(AppConfig::default(), store.clone());
    (state, store)
}

#[test]
fn test_login_logout_round_trip() {
    let (state, store) = state_with_memory_store();

    // Simulated login persists a well-formed member token
    let exp = Utc::now().timestamp() + 3600;
    store.set(&mint("alice", &["MEMBER"], exp)).unwrap();
    assert_eq!(state.inspector.current_role(), Some("MEMBER".to_string()));

    // Simulated logout
    store.clear().unwrap();
    assert_eq!(state.inspector.current_role(), None);
}

#[test]
fn test_member_blocked_from_librarian_route() {
    let (state, store) = state_with_memory_store();

    let exp = Utc::now().timestamp() + 3600;
    store.set(&mint("alice", &["MEMBER"], exp)).unwrap();

    // Member views render, librarian-only views redirect to the
    // configured forbidden destination
    assert_eq!(state.check_route("/dashboard"), Decision::Render);
    assert_eq!(
        state.check_route("/admin/books"),
        Decision::RedirectToForbidden
    );
    assert_eq!(
        state
            .routes
            .redirect_target(Decision::RedirectToForbidden),
        Some("/404")
    );
}

#[test]
fn test_anonymous_visitor_routing() {
    let (state, _store) = state_with_memory_store();

    // Public routes render without a session
    assert_eq!(state.check_route("/catalog"), Decision::Render);
    // Protected routes send the visitor to sign-in
    assert_eq!(state.check_route("/dashboard"), Decision::RedirectToSignIn);
    assert_eq!(
        state.routes.redirect_target(Decision::RedirectToSignIn),
        Some("/auth")
    );
}

#[test]
fn test_guard_evaluates_fresh_on_each_navigation() {
    let (state, store) = state_with_memory_store();
    let librarian_only: RoleSet = ["LIBRARIAN".to_string()].into_iter().collect();

    assert_eq!(
        state.guard.evaluate(&librarian_only),
        Decision::RedirectToSignIn
    );

    let exp = Utc::now().timestamp() + 3600;
    store.set(&mint("lib", &["LIBRARIAN"], exp)).unwrap();
    assert_eq!(state.guard.evaluate(&librarian_only), Decision::Render);

    store.clear().unwrap();
    assert_eq!(
        state.guard.evaluate(&librarian_only),
        Decision::RedirectToSignIn
    );
}

#[test]
fn test_indicator_tracks_login_and_logout() {
    let (state, store) = state_with_memory_store();
    let indicator = SessionIndicator::attach(state.inspector.clone(), store.as_ref());

    assert!(!indicator.is_authenticated());

    let exp = Utc::now().timestamp() + 3600;
    store.set(&mint("alice", &["MEMBER"], exp)).unwrap();
    assert_eq!(indicator.current(), Some("MEMBER".to_string()));

    store.clear().unwrap();
    assert!(!indicator.is_authenticated());
}

#[test]
fn test_corrupt_persisted_token_self_heals() {
    let dir = tempfile::tempdir().unwrap();
    let token_path = dir.path().join("jwt_token");
    std::fs::write(&token_path, "corrupted-on-disk").unwrap();

    let mut config = AppConfig::default();
    config.session.token_path = token_path.clone();
    let state = AppState::new(config);

    assert_eq!(state.inspector.current_role(), None);
    // The bad token was deleted, not left to fail again
    assert!(!token_path.exists());
    assert_eq!(state.check_route("/dashboard"), Decision::RedirectToSignIn);
}
