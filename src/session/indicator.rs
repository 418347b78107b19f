//! Cached role view for presentation code
//!
//! The navigation bar shows sign-in vs. dashboard/logout affordances based
//! on the current role. It re-checks on mount, on every route change, and
//! whenever the session store broadcasts a change, rather than decoding
//! the token on every render.

use std::sync::{Arc, Mutex};

use crate::models::claims::Role;
use crate::session::inspector::TokenInspector;
use crate::session::store::SessionStore;

pub struct SessionIndicator {
    inspector: TokenInspector,
    role: Mutex<Option<Role>>,
}

impl SessionIndicator {
    /// Build an indicator subscribed to the store's change notifications.
    /// The initial role is resolved immediately.
    pub fn attach(inspector: TokenInspector, store: &dyn SessionStore) -> Arc<Self> {
        let indicator = Arc::new(Self {
            inspector,
            role: Mutex::new(None),
        });
        indicator.refresh();

        let weak = Arc::downgrade(&indicator);
        store.on_change(Box::new(move || {
            if let Some(indicator) = weak.upgrade() {
                indicator.refresh();
            }
        }));

        indicator
    }

    /// Re-derive the role from the store. Invoked automatically on store
    /// changes; callers invoke it on navigation.
    pub fn refresh(&self) {
        *self.role.lock().unwrap() = self.inspector.current_role();
    }

    /// Navigation hook: the token may have expired or been replaced by
    /// another process since the last check.
    pub fn route_changed(&self) {
        self.refresh();
    }

    pub fn current(&self) -> Option<Role> {
        self.role.lock().unwrap().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }
}
