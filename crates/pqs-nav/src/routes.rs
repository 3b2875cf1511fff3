//! Route ↔ navigation state mapping for the PQS menu.
//!
//! Two independently maintained tables live here: the path → state table used
//! when the router reports a location, and the item → path tables used when a
//! menu entry is clicked. [`check_consistency`] verifies that every menu entry
//! round-trips through both.

use std::fmt;

use serde::Serialize;

use crate::state::{NavigationState, HOME_ITEM};

/// Group holding the introductory training-standards pages.
pub const WELCOME_GROUP: &str = "welcome";

/// Group holding the administration pages.
pub const ADMIN_GROUP: &str = "admin";

/// Path used after signing out.
pub const LOGIN_ROUTE: &str = "/login";

/// Path → (active item, expanded groups).
const ROUTE_STATES: &[(&str, &str, &[&str])] = &[
    ("/", HOME_ITEM, &[]),
    ("/home", HOME_ITEM, &[]),
    ("/dashboard", "dashboard", &[]),
    ("/profile", "profile", &[]),
    ("/settings", "settings", &[]),
    ("/welcome/introduction", "introduction", &[WELCOME_GROUP]),
    ("/welcome/standards", "standards", &[WELCOME_GROUP]),
    ("/welcome/curriculum", "curriculum", &[WELCOME_GROUP]),
    ("/welcome/training-units", "training-units", &[WELCOME_GROUP]),
    ("/dashboard/users", "users", &[ADMIN_GROUP]),
    ("/dashboard/officers", "officers", &[ADMIN_GROUP]),
    ("/dashboard/database", "database", &[ADMIN_GROUP]),
];

/// Leaf pages under the welcome group.
const WELCOME_ROUTES: &[(&str, &str)] = &[
    ("introduction", "/welcome/introduction"),
    ("standards", "/welcome/standards"),
    ("curriculum", "/welcome/curriculum"),
    ("training-units", "/welcome/training-units"),
];

/// Pages under the admin group.
const ADMIN_ROUTES: &[(&str, &str)] = &[
    ("users", "/dashboard/users"),
    ("officers", "/dashboard/officers"),
    ("database", "/dashboard/database"),
];

/// Top-level entries without children.
const STANDALONE_ROUTES: &[(&str, &str)] = &[
    (HOME_ITEM, "/home"),
    ("dashboard", "/dashboard"),
    ("profile", "/profile"),
    ("settings", "/settings"),
];

const MENU_GROUPS: &[&str] = &[WELCOME_GROUP, ADMIN_GROUP];

/// Display labels for menu ids and path segments.
const LABELS: &[(&str, &str)] = &[
    (HOME_ITEM, "Home"),
    ("dashboard", "Dashboard"),
    ("profile", "Profile"),
    ("settings", "Settings"),
    (WELCOME_GROUP, "Welcome"),
    ("introduction", "Introduction"),
    ("standards", "Training Standards"),
    ("curriculum", "Curriculum"),
    ("training-units", "Training Units"),
    (ADMIN_GROUP, "Administration"),
    ("users", "User Management"),
    ("officers", "High-Ranking Officers"),
    ("database", "Database Management"),
    ("login", "Sign In"),
];

fn lookup(table: &[(&'static str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Map a path to its canonical navigation state.
///
/// Unknown paths map to the home state. Each call returns a fresh value.
#[must_use]
pub fn state_for_route(path: &str) -> NavigationState {
    ROUTE_STATES
        .iter()
        .find(|(route, _, _)| *route == path)
        .map_or_else(NavigationState::default, |(_, item, menus)| {
            NavigationState::new(item, menus)
        })
}

/// Resolve the route for a clicked entry.
///
/// `sub_item_id` is checked against the welcome table, then the admin table;
/// only then is `item_id` treated as a standalone entry.
#[must_use]
pub fn route_for_item(item_id: &str, sub_item_id: Option<&str>) -> Option<&'static str> {
    if let Some(sub) = sub_item_id {
        if let Some(route) = lookup(WELCOME_ROUTES, sub) {
            return Some(route);
        }
        if let Some(route) = lookup(ADMIN_ROUTES, sub) {
            return Some(route);
        }
    }
    lookup(STANDALONE_ROUTES, item_id)
}

/// Whether `id` is a page under the welcome group.
#[must_use]
pub fn is_welcome_sub_item(id: &str) -> bool {
    lookup(WELCOME_ROUTES, id).is_some()
}

/// Whether `id` is a page under the admin group.
#[must_use]
pub fn is_admin_sub_item(id: &str) -> bool {
    lookup(ADMIN_ROUTES, id).is_some()
}

/// Whether `id` is a top-level entry with its own route.
#[must_use]
pub fn is_standalone_item(id: &str) -> bool {
    lookup(STANDALONE_ROUTES, id).is_some()
}

/// Whether `id` is an expandable group.
#[must_use]
pub fn is_menu_group(id: &str) -> bool {
    MENU_GROUPS.contains(&id)
}

/// Every selectable entry id: standalone items, then welcome pages, then admin pages.
#[must_use]
pub fn known_item_ids() -> Vec<&'static str> {
    STANDALONE_ROUTES
        .iter()
        .chain(WELCOME_ROUTES)
        .chain(ADMIN_ROUTES)
        .map(|(id, _)| *id)
        .collect()
}

/// Group a selectable entry belongs to, if any.
#[must_use]
pub fn parent_group(id: &str) -> Option<&'static str> {
    if is_welcome_sub_item(id) {
        Some(WELCOME_GROUP)
    } else if is_admin_sub_item(id) {
        Some(ADMIN_GROUP)
    } else {
        None
    }
}

/// Display label for a menu id, if one is defined.
#[must_use]
pub fn label_for_item(id: &str) -> Option<&'static str> {
    lookup(LABELS, id)
}

/// Human-readable label for a path.
///
/// Known routes use their menu label; anything else uses the label of the
/// trailing segment or, failing that, the segment with its first letter
/// capitalized.
#[must_use]
pub fn label_for_path(path: &str) -> String {
    if let Some((_, item, _)) = ROUTE_STATES.iter().find(|(route, _, _)| *route == path) {
        if let Some(label) = label_for_item(item) {
            return label.to_string();
        }
    }
    match path.trim_end_matches('/').rsplit('/').next() {
        Some(segment) if !segment.is_empty() => label_for_item(segment)
            .map_or_else(|| capitalize(segment), ToString::to_string),
        _ => "Home".to_string(),
    }
}

/// Uppercase the first character of `segment`.
#[must_use]
pub fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A menu entry whose route does not map back to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteInconsistency {
    /// The menu entry that failed the round trip.
    pub item_id: String,
    /// The route resolved for it, if any.
    pub route: Option<String>,
    /// The active item the route maps back to.
    pub resolved_item: Option<String>,
}

impl fmt::Display for RouteInconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.route, &self.resolved_item) {
            (Some(route), Some(resolved)) => write!(
                f,
                "{} -> {} -> {} (expected {})",
                self.item_id, route, resolved, self.item_id
            ),
            _ => write!(f, "{} has no route", self.item_id),
        }
    }
}

/// Check that every selectable entry round-trips through both tables, and
/// that sub-pages expand their parent group.
#[must_use]
pub fn check_consistency() -> Vec<RouteInconsistency> {
    let mut problems = Vec::new();
    for id in known_item_ids() {
        let parent = parent_group(id);
        let route = match parent {
            Some(group) => route_for_item(group, Some(id)),
            None => route_for_item(id, None),
        };
        let Some(route) = route else {
            problems.push(RouteInconsistency {
                item_id: id.to_string(),
                route: None,
                resolved_item: None,
            });
            continue;
        };

        let state = state_for_route(route);
        let expands_parent = parent.map_or(true, |group| {
            state.expanded_menus.iter().any(|m| m == group)
        });
        if state.active_item != id || !expands_parent {
            problems.push(RouteInconsistency {
                item_id: id.to_string(),
                route: Some(route.to_string()),
                resolved_item: Some(state.active_item),
            });
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_for_known_routes() {
        let state = state_for_route("/dashboard/database");
        assert_eq!(state.active_item, "database");
        assert_eq!(state.expanded_menus, vec!["admin"]);

        let state = state_for_route("/welcome/standards");
        assert_eq!(state.active_item, "standards");
        assert_eq!(state.expanded_menus, vec!["welcome"]);
    }

    #[test]
    fn test_state_for_unknown_route_is_home() {
        assert_eq!(state_for_route("/nope"), NavigationState::default());
        assert_eq!(state_for_route(""), NavigationState::default());
        assert_eq!(state_for_route("/dashboard/database/"), NavigationState::default());
    }

    #[test]
    fn test_state_for_route_returns_fresh_copy() {
        let mut first = state_for_route("/dashboard/users");
        first.expanded_menus.push("welcome".to_string());

        let second = state_for_route("/dashboard/users");
        assert_eq!(second.expanded_menus, vec!["admin"]);
    }

    #[test]
    fn test_route_for_item_prefers_sub_items() {
        assert_eq!(
            route_for_item("admin", Some("database")),
            Some("/dashboard/database")
        );
        assert_eq!(
            route_for_item("welcome", Some("curriculum")),
            Some("/welcome/curriculum")
        );
        // A standalone id as parent does not shadow a known sub-item.
        assert_eq!(
            route_for_item("dashboard", Some("users")),
            Some("/dashboard/users")
        );
    }

    #[test]
    fn test_route_for_item_falls_back_to_standalone() {
        assert_eq!(route_for_item("profile", None), Some("/profile"));
        assert_eq!(route_for_item("settings", Some("unknown")), Some("/settings"));
    }

    #[test]
    fn test_route_for_unknown_item_is_none() {
        assert_eq!(route_for_item("admin", None), None);
        assert_eq!(route_for_item("ghost", Some("phantom")), None);
    }

    #[test]
    fn test_membership_predicates() {
        assert!(is_welcome_sub_item("introduction"));
        assert!(!is_welcome_sub_item("users"));
        assert!(is_admin_sub_item("officers"));
        assert!(!is_admin_sub_item("home"));
        assert!(is_standalone_item("dashboard"));
        assert!(!is_standalone_item("admin"));
        assert!(is_menu_group("admin"));
        assert!(!is_menu_group("database"));
    }

    #[test]
    fn test_parent_group() {
        assert_eq!(parent_group("users"), Some("admin"));
        assert_eq!(parent_group("standards"), Some("welcome"));
        assert_eq!(parent_group("home"), None);
    }

    #[test]
    fn test_label_for_path() {
        assert_eq!(label_for_path("/"), "Home");
        assert_eq!(label_for_path("/home"), "Home");
        assert_eq!(label_for_path("/dashboard/database"), "Database Management");
        assert_eq!(label_for_path("/welcome"), "Welcome");
        assert_eq!(label_for_path("/dashboard/reports"), "Reports");
        assert_eq!(label_for_path("/login"), "Sign In");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("reports"), "Reports");
        assert_eq!(capitalize("élan"), "Élan");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_tables_are_consistent() {
        let problems = check_consistency();
        assert!(problems.is_empty(), "inconsistent routes: {problems:?}");
    }

    #[test]
    fn test_known_item_ids_cover_all_tables() {
        let ids = known_item_ids();
        assert_eq!(ids.len(), 11);
        assert!(ids.contains(&"home"));
        assert!(ids.contains(&"training-units"));
        assert!(ids.contains(&"database"));
    }

    #[test]
    fn test_inconsistency_display() {
        let missing = RouteInconsistency {
            item_id: "ghost".to_string(),
            route: None,
            resolved_item: None,
        };
        assert_eq!(missing.to_string(), "ghost has no route");

        let wrong = RouteInconsistency {
            item_id: "users".to_string(),
            route: Some("/dashboard/users".to_string()),
            resolved_item: Some("home".to_string()),
        };
        assert!(wrong.to_string().contains("expected users"));
    }
}
