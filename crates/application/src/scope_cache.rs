//! Keyed, invalidatable store for resolved access scopes.
//!
//! Scope is recomputed, not mutated in place: any event that changes a
//! user's visibility (grant added/revoked, role changed, profile updated)
//! invalidates the entry and the next lookup re-resolves from the store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use deskhive_domain::{AccessScope, UserId};

/// Shared cache of resolved scopes, keyed by user id.
#[derive(Clone, Default)]
pub struct ScopeCache {
    entries: Arc<Mutex<HashMap<UserId, AccessScope>>>,
}

impl ScopeCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached scope for a user, if present.
    #[must_use]
    pub fn get(&self, user_id: UserId) -> Option<AccessScope> {
        self.lock().get(&user_id).cloned()
    }

    /// Stores a freshly resolved scope.
    pub fn store(&self, user_id: UserId, scope: AccessScope) {
        self.lock().insert(user_id, scope);
    }

    /// Drops the cached scope for a user.
    pub fn invalidate(&self, user_id: UserId) {
        self.lock().remove(&user_id);
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<UserId, AccessScope>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
