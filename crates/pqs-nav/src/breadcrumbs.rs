//! Breadcrumb trail derived from the current path.
//!
//! The trail is recomputed from scratch on every change: the route-derived
//! part from the path, followed by custom entries pushed for nested or
//! dynamic contexts. Custom entries are dropped automatically when the user
//! lands on a top-level section.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::routes;

/// Id of the leading Home crumb.
pub const HOME_CRUMB_ID: &str = "home";

/// Path of the leading Home crumb.
pub const HOME_PATH: &str = "/home";

/// Paths that clear custom crumbs when entered.
pub const TOP_LEVEL_ROUTES: &[&str] = &["/", "/home", "/dashboard", "/profile", "/settings", "/welcome"];

/// Single-level sections: (path, id).
const STATIC_CRUMBS: &[(&str, &str)] = &[
    ("/dashboard", "dashboard"),
    ("/profile", "profile"),
    ("/settings", "settings"),
    ("/welcome", routes::WELCOME_GROUP),
];

/// Sections with nested pages: (prefix, root path, root id).
const NESTED_SECTIONS: &[(&str, &str, &str)] = &[
    ("/dashboard/", "/dashboard", "dashboard"),
    ("/welcome/", "/welcome", routes::WELCOME_GROUP),
];

/// One displayed crumb.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbItem {
    /// Unique id in the trail.
    pub id: String,
    /// Display text.
    pub label: String,
    /// Target path.
    pub path: String,
    /// Whether clicking navigates.
    pub is_clickable: bool,
    /// Whether this crumb is the current page.
    pub is_active: bool,
}

impl BreadcrumbItem {
    /// A clickable, inactive crumb.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            path: path.into(),
            is_clickable: true,
            is_active: false,
        }
    }

    fn at(mut self, current_path: &str) -> Self {
        self.is_active = self.path == current_path;
        if self.is_active {
            self.is_clickable = false;
        }
        self
    }
}

/// Whether entering `path` clears the custom crumbs.
#[must_use]
pub fn is_top_level_route(path: &str) -> bool {
    TOP_LEVEL_ROUTES.contains(&path)
}

/// Crumbs implied by `path` alone.
#[must_use]
pub fn route_breadcrumbs(path: &str) -> Vec<BreadcrumbItem> {
    let home_active = path == "/" || path == HOME_PATH;
    let mut crumbs = vec![BreadcrumbItem {
        is_active: home_active,
        is_clickable: !home_active,
        ..BreadcrumbItem::new(HOME_CRUMB_ID, "Home", HOME_PATH)
    }];

    if let Some((route, id)) = STATIC_CRUMBS.iter().find(|(route, _)| *route == path) {
        crumbs.push(BreadcrumbItem::new(*id, routes::label_for_path(route), *route).at(path));
        return crumbs;
    }

    for (prefix, root_path, root_id) in NESTED_SECTIONS {
        let Some(rest) = path.strip_prefix(prefix) else {
            continue;
        };
        let Some(segment) = rest.trim_end_matches('/').rsplit('/').next().filter(|s| !s.is_empty())
        else {
            continue;
        };
        crumbs.push(BreadcrumbItem::new(
            *root_id,
            routes::label_for_path(root_path),
            *root_path,
        ));
        // Ids are unique within a trail; a repeat collapses into the earlier crumb.
        if crumbs.iter().any(|c| c.id == segment) {
            break;
        }
        let label = routes::label_for_item(segment)
            .map_or_else(|| routes::capitalize(segment), ToString::to_string);
        crumbs.push(BreadcrumbItem {
            is_active: true,
            is_clickable: false,
            ..BreadcrumbItem::new(segment, label, path)
        });
        break;
    }
    crumbs
}

/// The custom crumb list plus the derived trail for the current path.
#[derive(Debug, Clone, Default)]
pub struct BreadcrumbTrail {
    custom: Vec<BreadcrumbItem>,
}

impl BreadcrumbTrail {
    /// Trail with no custom crumbs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Custom crumbs, in insertion order.
    #[must_use]
    pub fn custom(&self) -> &[BreadcrumbItem] {
        &self.custom
    }

    /// Full trail for `current_path`: route crumbs, then custom crumbs whose
    /// ids have not appeared yet.
    ///
    /// At most one crumb is active. A route crumb for the current page wins
    /// over a custom crumb pointing at the same path.
    #[must_use]
    pub fn derive(&self, current_path: &str) -> Vec<BreadcrumbItem> {
        let mut trail = route_breadcrumbs(current_path);
        let mut has_active = trail.iter().any(|c| c.is_active);
        for crumb in &self.custom {
            if trail.iter().any(|c| c.id == crumb.id) {
                continue;
            }
            let mut crumb = crumb.clone().at(current_path);
            if crumb.is_active && has_active {
                crumb.is_active = false;
            }
            has_active |= crumb.is_active;
            trail.push(crumb);
        }
        trail
    }

    /// Push a custom crumb.
    pub fn add_breadcrumb(&mut self, item: BreadcrumbItem) {
        debug!(id = %item.id, path = %item.path, "custom breadcrumb added");
        self.custom.push(item);
    }

    /// Remove every custom crumb with `id`.
    pub fn remove_breadcrumb(&mut self, id: &str) {
        self.custom.retain(|c| c.id != id);
    }

    /// Remove all custom crumbs.
    pub fn clear_breadcrumbs(&mut self) {
        if !self.custom.is_empty() {
            debug!(count = self.custom.len(), "custom breadcrumbs cleared");
        }
        self.custom.clear();
    }

    /// React to a newly observed path. Returns whether custom crumbs were cleared.
    pub fn observe(&mut self, path: &str) -> bool {
        if is_top_level_route(path) && !self.custom.is_empty() {
            self.clear_breadcrumbs();
            return true;
        }
        false
    }
}
