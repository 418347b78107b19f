//! Token inspection: derive the current role from the persisted token

use std::sync::Arc;

use crate::models::claims::{ClaimSchema, Role, TokenClaims};
use crate::session::store::SessionStore;

/// Clock abstraction so expiry boundaries can be pinned in tests
pub trait TimeSource: Send + Sync {
    /// Seconds since epoch
    fn now_unix(&self) -> i64;
}

pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_unix(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Resolved view of a valid session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub subject: String,
    /// All roles the token carries, in claim order. Never empty.
    pub roles: Vec<Role>,
}

impl SessionInfo {
    /// The role the rest of the client keys on (first claim entry)
    pub fn primary_role(&self) -> &str {
        &self.roles[0]
    }
}

/// Reads the persisted token and derives a trustworthy, current role.
///
/// Self-healing: any invalid token (undecodable, expired, role-less) is
/// deleted on first detection so later checks observe "no token" instead
/// of failing on the same corrupt value. No failure propagates to the
/// caller; every one collapses to `None`.
#[derive(Clone)]
pub struct TokenInspector {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn TimeSource>,
    schema: ClaimSchema,
}

impl TokenInspector {
    pub fn new(store: Arc<dyn SessionStore>, schema: ClaimSchema) -> Self {
        Self::with_clock(store, schema, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn SessionStore>,
        schema: ClaimSchema,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self { store, clock, schema }
    }

    /// The first role of the current session, or `None` when no valid
    /// session exists
    pub fn current_role(&self) -> Option<Role> {
        self.current_session()
            .map(|session| session.primary_role().to_string())
    }

    /// The full resolved session, or `None` when no valid session exists
    pub fn current_session(&self) -> Option<SessionInfo> {
        let token = match self.store.get() {
            Ok(Some(token)) => token,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Failed to read session store: {}", e);
                return None;
            }
        };

        let claims = match TokenClaims::from_token(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("Discarding undecodable session token: {}", e);
                self.discard();
                return None;
            }
        };

        // Strict inequality: a token expiring exactly now is already stale
        let now = self.clock.now_unix();
        if claims.exp <= now {
            tracing::info!(exp = claims.exp, now, "Session token expired, discarding");
            self.discard();
            return None;
        }

        let roles: Vec<Role> = claims
            .resolve_roles(self.schema)
            .into_iter()
            .map(str::to_string)
            .collect();
        if roles.is_empty() {
            tracing::warn!("Session token carries no role, discarding");
            self.discard();
            return None;
        }

        Some(SessionInfo {
            subject: claims.sub,
            roles,
        })
    }

    fn discard(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear invalid session token: {}", e);
        }
    }
}
