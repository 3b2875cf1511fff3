//! Navigation state: which menu entry is active and which groups are open.
//!
//! The store is a plain reducer over [`NavigationState`]. It performs no
//! validation; ids that do not correspond to a menu entry simply highlight
//! nothing.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Id of the default menu entry.
pub const HOME_ITEM: &str = "home";

/// The selected menu entry and the expanded menu groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    /// Id of the currently selected menu or submenu entry.
    pub active_item: String,
    /// Ids of expanded top-level groups, in display order, without duplicates.
    pub expanded_menus: Vec<String>,
}

impl NavigationState {
    /// Build a state from borrowed ids.
    #[must_use]
    pub fn new(active_item: &str, expanded_menus: &[&str]) -> Self {
        Self {
            active_item: active_item.to_string(),
            expanded_menus: expanded_menus.iter().map(|id| (*id).to_string()).collect(),
        }
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new(HOME_ITEM, &[])
    }
}

/// A partial update merged into the current state.
///
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    /// New active item.
    pub active_item: Option<String>,
    /// New expanded menu list.
    pub expanded_menus: Option<Vec<String>>,
}

/// Session-scoped owner of the [`NavigationState`].
#[derive(Debug, Clone, Default)]
pub struct NavigationStateStore {
    state: NavigationState,
}

impl NavigationStateStore {
    /// Create a store holding the default `{home, []}` state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Currently active item id.
    #[must_use]
    pub fn active_item(&self) -> &str {
        &self.state.active_item
    }

    /// Currently expanded groups.
    #[must_use]
    pub fn expanded_menus(&self) -> &[String] {
        &self.state.expanded_menus
    }

    /// Whether the group `id` is expanded.
    #[must_use]
    pub fn is_expanded(&self, id: &str) -> bool {
        self.state.expanded_menus.iter().any(|m| m == id)
    }

    /// Shallow-merge `update` into the current state.
    pub fn update_state(&mut self, update: StateUpdate) {
        if let Some(active_item) = update.active_item {
            self.state.active_item = active_item;
        }
        if let Some(expanded_menus) = update.expanded_menus {
            self.state.expanded_menus = dedup_preserving_order(expanded_menus);
        }
        trace!(
            active_item = %self.state.active_item,
            expanded = ?self.state.expanded_menus,
            "navigation state updated"
        );
    }

    /// Select a menu entry.
    pub fn set_active_item(&mut self, id: impl Into<String>) {
        self.update_state(StateUpdate {
            active_item: Some(id.into()),
            ..StateUpdate::default()
        });
    }

    /// Replace the expanded group list. Repeated ids keep their first position.
    pub fn set_expanded_menus(&mut self, ids: Vec<String>) {
        self.update_state(StateUpdate {
            expanded_menus: Some(ids),
            ..StateUpdate::default()
        });
    }

    /// Collapse `id` if it is expanded, otherwise expand it at the end.
    pub fn toggle_menu(&mut self, id: &str) {
        let mut menus = self.state.expanded_menus.clone();
        if let Some(pos) = menus.iter().position(|m| m == id) {
            menus.remove(pos);
        } else {
            menus.push(id.to_string());
        }
        self.set_expanded_menus(menus);
    }

    /// Return to `{home, []}`.
    pub fn reset_state(&mut self) {
        self.state = NavigationState::default();
        trace!("navigation state reset");
    }
}

fn dedup_preserving_order(ids: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}
