//! Route access policy table

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;

use crate::config::RoutesConfig;
use crate::models::claims::Role;
use crate::session::guard::Decision;

pub const ROLE_MEMBER: &str = "MEMBER";
pub const ROLE_LIBRARIAN: &str = "LIBRARIAN";

/// Set of roles permitted to view a route
pub type RoleSet = BTreeSet<Role>;

/// Routes protected out of the box. Historically each page hardcoded its
/// own allow-list; the table makes the policy reviewable in one place.
static DEFAULT_PROTECTED: Lazy<IndexMap<String, Vec<String>>> = Lazy::new(|| {
    let member_or_librarian = vec![ROLE_MEMBER.to_string(), ROLE_LIBRARIAN.to_string()];
    let librarian_only = vec![ROLE_LIBRARIAN.to_string()];

    IndexMap::from([
        ("/dashboard".to_string(), member_or_librarian.clone()),
        ("/upload".to_string(), member_or_librarian.clone()),
        ("/profile".to_string(), member_or_librarian),
        ("/admin".to_string(), librarian_only.clone()),
        ("/admin/books".to_string(), librarian_only.clone()),
        ("/admin/users".to_string(), librarian_only.clone()),
        ("/admin/borrowing".to_string(), librarian_only),
    ])
});

pub fn default_protected() -> IndexMap<String, Vec<String>> {
    DEFAULT_PROTECTED.clone()
}

/// Static mapping from protected routes to their allowed roles, plus the
/// redirect destinations the routing layer navigates to on a deny.
#[derive(Debug, Clone)]
pub struct RouteTable {
    protected: IndexMap<String, RoleSet>,
    sign_in: String,
    forbidden: String,
}

impl RouteTable {
    pub fn from_config(config: &RoutesConfig) -> Self {
        let protected = config
            .protected
            .iter()
            .map(|(path, roles)| (path.clone(), roles.iter().cloned().collect()))
            .collect();

        Self {
            protected,
            sign_in: config.sign_in.clone(),
            forbidden: config.forbidden.clone(),
        }
    }

    /// Allowed roles for a route; `None` means the route is public.
    /// Lookup is by exact path, matching how the router mounts views.
    pub fn allowed_roles(&self, path: &str) -> Option<&RoleSet> {
        self.protected.get(path)
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected.contains_key(path)
    }

    pub fn sign_in_path(&self) -> &str {
        &self.sign_in
    }

    pub fn forbidden_path(&self) -> &str {
        &self.forbidden
    }

    /// Path the routing layer should navigate to for a deny decision,
    /// or `None` when the guard rendered the view.
    pub fn redirect_target(&self, decision: Decision) -> Option<&str> {
        match decision {
            Decision::Render => None,
            Decision::RedirectToSignIn => Some(self.sign_in.as_str()),
            Decision::RedirectToForbidden => Some(self.forbidden.as_str()),
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_config(&RoutesConfig::default())
    }
}
