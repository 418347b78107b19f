//! Live-backend API tests
//!
//! These need a running backend and a seeded "member"/"member" account.

use std::sync::Arc;

use kboel_client::api::auth::AuthClient;
use kboel_client::config::ApiConfig;
use kboel_client::models::claims::ClaimSchema;
use kboel_client::session::inspector::TokenInspector;
use kboel_client::session::store::{MemorySessionStore, SessionStore};
use kboel_client::AppError;

fn api_config() -> ApiConfig {
    ApiConfig {
        base_url: "http://localhost:8080/api/v1".to_string(),
    }
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_login_persists_token() {
    let store = Arc::new(MemorySessionStore::new());
    let auth = AuthClient::new(&api_config(), store.clone());

    auth.login("member", "member")
        .await
        .expect("Failed to sign in");

    let inspector = TokenInspector::new(store.clone(), ClaimSchema::Auto);
    let session = inspector.current_session().expect("No session after login");
    assert_eq!(session.subject, "member");
    assert!(!session.roles.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let store = Arc::new(MemorySessionStore::new());
    let auth = AuthClient::new(&api_config(), store.clone());

    let result = auth.login("member", "wrong-password").await;
    assert!(matches!(result, Err(AppError::Authentication(_))));
    // A failed login must not leave a token behind
    assert_eq!(store.get().unwrap(), None);
}

#[tokio::test]
#[ignore]
async fn test_logout_clears_token() {
    let store = Arc::new(MemorySessionStore::new());
    let auth = AuthClient::new(&api_config(), store.clone());

    auth.login("member", "member")
        .await
        .expect("Failed to sign in");
    assert!(store.get().unwrap().is_some());

    auth.logout().expect("Failed to sign out");
    assert_eq!(store.get().unwrap(), None);
}
