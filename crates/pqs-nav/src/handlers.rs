//! UI intents: menu clicks, submenu clicks, sign-out and keyboard shortcuts.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::router::Router;
use crate::routes;
use crate::session::NavigationSession;

/// Keyboard navigation shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Step back in history.
    Back,
    /// Step forward in history.
    Forward,
    /// Go to the home page.
    Home,
}

impl Shortcut {
    /// Key combination bound to the shortcut.
    #[must_use]
    pub fn keys(self) -> &'static str {
        match self {
            Self::Back => "Alt+ArrowLeft",
            Self::Forward => "Alt+ArrowRight",
            Self::Home => "Alt+Home",
        }
    }

    /// Action name recorded in analytics.
    #[must_use]
    pub fn action(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Forward => "forward",
            Self::Home => "home",
        }
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keys())
    }
}

impl FromStr for Shortcut {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Back, Self::Forward, Self::Home]
            .into_iter()
            .find(|sc| sc.keys().eq_ignore_ascii_case(s) || sc.action().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown shortcut: {s}"))
    }
}

impl<R: Router> NavigationSession<R> {
    /// A top-level menu entry was clicked.
    ///
    /// Groups toggle their expansion; standalone entries become active and
    /// navigate to their route.
    pub fn handle_menu_click(&mut self, item_id: &str) {
        let label = routes::label_for_item(item_id).unwrap_or(item_id);
        self.analytics.track_menu_click(item_id, label);

        if routes::is_menu_group(item_id) {
            self.state.toggle_menu(item_id);
            return;
        }

        self.state.set_active_item(item_id);
        match routes::route_for_item(item_id, None) {
            Some(route) => self.navigate(route, None),
            None => debug!(item_id, "menu entry has no route"),
        }
    }

    /// A submenu entry under `parent_id` was clicked.
    pub fn handle_submenu_click(&mut self, parent_id: &str, sub_item_id: &str) {
        let label = routes::label_for_item(sub_item_id).unwrap_or(sub_item_id);
        self.analytics
            .track_submenu_click(parent_id, sub_item_id, label);

        self.state.set_active_item(sub_item_id);
        match routes::route_for_item(parent_id, Some(sub_item_id)) {
            Some(route) => self.navigate(route, None),
            None => debug!(parent_id, sub_item_id, "submenu entry has no route"),
        }
    }

    /// Sign out: reset navigation, drop history and custom crumbs, and go to
    /// the sign-in page.
    pub fn handle_sign_out(&mut self) {
        info!("signing out");
        self.state.reset_state();
        self.history.clear_history();
        self.breadcrumbs.clear_breadcrumbs();
        self.flush_quietly();
        self.navigate(routes::LOGIN_ROUTE, None);
    }

    /// A keyboard shortcut was pressed. Returns whether navigation happened.
    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> bool {
        self.analytics
            .track_shortcut_used(shortcut.keys(), shortcut.action());
        match shortcut {
            Shortcut::Back => self.go_back(),
            Shortcut::Forward => self.go_forward(),
            Shortcut::Home => {
                self.navigate("/home", None);
                true
            }
        }
    }
}
