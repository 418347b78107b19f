//! KBOeL Digital Library Client
//!
//! Session and access-control core for the KBOeL catalog client: bearer
//! token inspection, role derivation, and route-level gating over the
//! remote REST API. Presentation concerns (rendering, forms, styling)
//! live above this crate and consume it through `TokenInspector`,
//! `RouteGuard`, and `SessionIndicator`.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use models::route::RouteTable;
use session::guard::{Decision, RouteGuard};
use session::inspector::TokenInspector;
use session::store::{FileSessionStore, SessionStore};

/// Application state shared across the client
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn SessionStore>,
    pub inspector: TokenInspector,
    pub guard: RouteGuard,
    pub routes: Arc<RouteTable>,
}

impl AppState {
    /// Wire the session core from configuration, persisting the token at
    /// the configured path
    pub fn new(config: AppConfig) -> Self {
        let store: Arc<dyn SessionStore> =
            Arc::new(FileSessionStore::new(&config.session.token_path));
        Self::with_store(config, store)
    }

    /// Wire the session core over an explicit store (used by tests and
    /// embedded consumers)
    pub fn with_store(config: AppConfig, store: Arc<dyn SessionStore>) -> Self {
        let inspector = TokenInspector::new(store.clone(), config.session.claim_schema);
        let guard = RouteGuard::new(inspector.clone(), config.session.role_policy);
        let routes = Arc::new(RouteTable::from_config(&config.routes));

        Self {
            config: Arc::new(config),
            store,
            inspector,
            guard,
            routes,
        }
    }

    /// Evaluate a navigation against the route table. Public routes always
    /// render; protected routes go through the guard.
    pub fn check_route(&self, path: &str) -> Decision {
        match self.routes.allowed_roles(path) {
            None => Decision::Render,
            Some(allowed) => self.guard.evaluate(allowed),
        }
    }
}
