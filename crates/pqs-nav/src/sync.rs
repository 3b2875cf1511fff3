//! One-way synchronization from the router to the navigation state.
//!
//! The route is the source of truth for the active item only. Expanded groups
//! belong to the user and are never changed here, so deep-linking into a page
//! does not collapse or open unrelated groups.

use tracing::debug;

use crate::router::Location;
use crate::routes;
use crate::state::NavigationStateStore;

/// Applies the active item for each newly observed location.
#[derive(Debug, Clone, Default)]
pub struct RouterSynchronizer {
    last_key: Option<u64>,
}

impl RouterSynchronizer {
    /// Create a synchronizer that has not seen any location yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Key of the last location applied.
    #[must_use]
    pub fn last_key(&self) -> Option<u64> {
        self.last_key
    }

    /// Whether `location` has not been applied yet.
    #[must_use]
    pub fn is_new(&self, location: &Location) -> bool {
        self.last_key != Some(location.key)
    }

    /// Apply `location` to `store`. Returns `false` if it was already applied.
    pub fn observe(&mut self, location: &Location, store: &mut NavigationStateStore) -> bool {
        if !self.is_new(location) {
            return false;
        }
        self.last_key = Some(location.key);

        let active_item = routes::state_for_route(&location.path).active_item;
        debug!(path = %location.path, active_item = %active_item, "synchronized active item");
        store.set_active_item(active_item);
        true
    }
}
