//! Route guard: gate rendering of protected views by role

use serde::{Deserialize, Serialize};

use crate::models::route::RoleSet;
use crate::session::inspector::TokenInspector;

/// Outcome of a guard evaluation. The routing layer performs the actual
/// navigation for the two redirect variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the nested protected content
    Render,
    /// No valid session: send the visitor to the sign-in view
    RedirectToSignIn,
    /// Valid session, insufficient role: send to the forbidden view
    RedirectToForbidden,
}

/// How a multi-role claim is matched against a route's allow-list.
///
/// `First` is the historical behavior: only the first claimed role is
/// ever considered. `Any` grants access when any claimed role is allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleMatchPolicy {
    First,
    Any,
}

/// Access-control checkpoint evaluated on every navigation.
///
/// Decisions are recomputed fresh each time; nothing is cached across
/// evaluations beyond what the inspector's store holds.
#[derive(Clone)]
pub struct RouteGuard {
    inspector: TokenInspector,
    policy: RoleMatchPolicy,
}

impl RouteGuard {
    pub fn new(inspector: TokenInspector, policy: RoleMatchPolicy) -> Self {
        Self { inspector, policy }
    }

    /// Decide whether the current session may view a route that permits
    /// `allowed` roles.
    pub fn evaluate(&self, allowed: &RoleSet) -> Decision {
        if allowed.is_empty() {
            // An empty allow-list locks everyone out; almost certainly a
            // route-table mistake, so make it loud.
            tracing::warn!("Route allow-list is empty, denying all access");
        }

        let Some(session) = self.inspector.current_session() else {
            tracing::debug!("No valid session, redirecting to sign-in");
            return Decision::RedirectToSignIn;
        };

        let granted = match self.policy {
            RoleMatchPolicy::First => allowed.contains(session.primary_role()),
            RoleMatchPolicy::Any => session.roles.iter().any(|role| allowed.contains(role)),
        };

        if granted {
            tracing::debug!(subject = %session.subject, "Access granted");
            Decision::Render
        } else {
            tracing::debug!(
                subject = %session.subject,
                role = %session.primary_role(),
                "Role not allowed, redirecting to forbidden view"
            );
            Decision::RedirectToForbidden
        }
    }
}
