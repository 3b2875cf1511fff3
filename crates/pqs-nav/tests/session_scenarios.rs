//! End-to-end navigation scenarios driven through a `NavigationSession`.

use std::rc::Rc;

use pqs_nav::analytics::EventType;
use pqs_nav::{
    BreadcrumbItem, Config, KeyValueStore, ManualClock, MemoryRouter, MemoryStore,
    NavigationSession, Router, Shortcut, SqliteStore,
};

const START: i64 = 1_700_000_000_000;

fn session_with(
    path: &str,
    store: Box<dyn KeyValueStore>,
    clock: &ManualClock,
) -> NavigationSession<MemoryRouter> {
    NavigationSession::with_clock(
        &Config::default(),
        MemoryRouter::new(path),
        store,
        Rc::new(clock.clone()),
    )
    .expect("default config is valid")
}

fn session_at(path: &str) -> NavigationSession<MemoryRouter> {
    session_with(path, Box::new(MemoryStore::new()), &ManualClock::new(START))
}

#[test]
fn observing_a_sub_page_keeps_expanded_menus() {
    let mut session = session_at("/home");
    session.state_mut().set_expanded_menus(vec!["admin".to_string()]);

    session.navigate("/dashboard/database", None);
    assert_eq!(session.state().active_item(), "database");
    assert_eq!(session.state().expanded_menus(), ["admin".to_string()]);

    // The synchronizer never expands groups on its own.
    session.state_mut().set_expanded_menus(vec!["welcome".to_string()]);
    session.navigate("/dashboard/users", None);
    assert_eq!(session.state().active_item(), "users");
    assert_eq!(session.state().expanded_menus(), ["welcome".to_string()]);
}

#[test]
fn going_back_from_the_only_entry_is_a_no_op() {
    let mut session = session_at("/home");
    assert_eq!(session.history().len(), 1);

    assert!(!session.go_back());
    assert!(!session.handle_shortcut(Shortcut::Back));
    assert_eq!(session.history().cursor(), Some(0));
    assert_eq!(session.router().navigation_count(), 0);
    assert_eq!(session.current_path(), "/home");
}

#[test]
fn returning_home_clears_custom_breadcrumbs() {
    let mut session = session_at("/dashboard/users");
    session.add_breadcrumb(BreadcrumbItem::new("custom1", "Custom", "/x"));
    assert!(session.breadcrumbs().iter().any(|c| c.id == "custom1"));

    // Nested pages keep custom crumbs.
    session.navigate("/dashboard/officers", None);
    assert!(session.breadcrumbs().iter().any(|c| c.id == "custom1"));

    session.navigate("/home", None);
    let trail = session.breadcrumbs();
    assert!(trail.iter().all(|c| c.id != "custom1"));
    assert_eq!(trail.len(), 1);
    assert!(trail[0].is_active);
}

#[test]
fn visiting_after_going_back_discards_forward_entries() {
    let mut session = session_at("/home");
    session.navigate("/dashboard", None);
    session.navigate("/profile", None);

    assert!(session.go_back());
    assert!(session.go_back());
    assert_eq!(session.current_path(), "/home");
    assert!(session.history().can_go_forward());

    session.navigate("/settings", None);
    let paths: Vec<&str> = session
        .history()
        .entries()
        .iter()
        .map(|e| e.path.as_str())
        .collect();
    assert_eq!(paths, vec!["/home", "/settings"]);
    assert!(!session.history().can_go_forward());
}

#[test]
fn jumping_to_a_history_item_replays_without_recording() {
    let mut session = session_at("/home");
    session.navigate("/welcome/introduction", None);
    session.navigate("/welcome/curriculum", None);
    let first = session.history().entries()[0].id.clone();

    assert!(session.go_to_history_item(&first));
    assert_eq!(session.current_path(), "/home");
    assert_eq!(session.history().len(), 3);
    assert_eq!(session.history().cursor(), Some(0));

    assert!(!session.go_to_history_item("missing"));
    assert_eq!(session.history().cursor(), Some(0));
}

#[test]
fn replayed_navigation_carries_entry_state() {
    let mut session = session_at("/home");
    session.navigate("/dashboard/users", Some(serde_json::json!({ "tab": "pending" })));
    session.navigate("/settings", None);

    assert!(session.go_back());
    assert_eq!(
        session.router().location().state,
        Some(serde_json::json!({ "tab": "pending" }))
    );
}

#[test]
fn menu_flow_through_admin_section() {
    let clock = ManualClock::new(START);
    let mut session = session_with("/home", Box::new(MemoryStore::new()), &clock);

    session.handle_menu_click("admin");
    assert!(session.state().is_expanded("admin"));

    clock.advance(2_000);
    session.handle_submenu_click("admin", "officers");
    assert_eq!(session.current_path(), "/dashboard/officers");
    assert_eq!(session.state().active_item(), "officers");

    let crumbs: Vec<String> = session.breadcrumbs().into_iter().map(|c| c.label).collect();
    assert_eq!(crumbs, vec!["Home", "Dashboard", "High-Ranking Officers"]);

    clock.advance(500);
    session.navigate_to_breadcrumb("/dashboard");
    assert_eq!(session.state().active_item(), "dashboard");
    assert!(session.state().is_expanded("admin"));

    let stats = session.analytics().stats();
    assert_eq!(stats.events_by_type[&EventType::PageView], 3);
    assert_eq!(stats.events_by_type[&EventType::MenuClick], 1);
    assert_eq!(stats.events_by_type[&EventType::SubmenuClick], 1);
    assert_eq!(stats.events_by_type[&EventType::BreadcrumbClick], 1);

    let durations: Vec<Option<i64>> = session
        .analytics()
        .events()
        .filter(|e| e.kind == EventType::PageView)
        .map(|e| e.duration)
        .collect();
    assert_eq!(durations, vec![Some(0), Some(2_000), Some(500)]);
}

#[test]
fn sign_out_lands_on_login_with_clean_state() {
    let mut session = session_at("/home");
    session.handle_menu_click("welcome");
    session.handle_submenu_click("welcome", "training-units");
    session.navigate("/profile", None);

    session.handle_sign_out();
    assert_eq!(session.current_path(), "/login");
    assert_eq!(session.state().active_item(), "home");
    assert!(session.state().expanded_menus().is_empty());
    assert_eq!(session.history().len(), 1);
    assert!(!session.history().can_go_back());
}

#[test]
fn analytics_survive_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("local-storage.db");
    let clock = ManualClock::new(START);

    {
        let store = SqliteStore::open(&db_path).unwrap();
        let mut session = session_with("/home", Box::new(store), &clock);
        session.navigate("/profile", None);
        session.handle_menu_click("settings");
        session.shutdown().unwrap();
    }

    let store = SqliteStore::open(&db_path).unwrap();
    let session = session_with("/home", Box::new(store), &clock);
    // 4 from the first session plus the initial page view of this one.
    assert_eq!(session.analytics().len(), 5);
    let stats = session.analytics().stats();
    assert_eq!(stats.most_visited_paths[0].path, "/home");
    assert_eq!(stats.most_visited_paths[0].count, 2);
}

#[test]
fn malformed_stored_analytics_start_empty() {
    let store = MemoryStore::new();
    store.set("navigation_analytics", "{not json").unwrap();

    let session = session_with("/home", Box::new(store), &ManualClock::new(START));
    assert_eq!(session.analytics().len(), 1);
}

#[test]
fn disabled_analytics_do_not_block_navigation() {
    let mut config = Config::default();
    config.analytics.enabled = false;
    let store = MemoryStore::new();
    let mut session = NavigationSession::with_clock(
        &config,
        MemoryRouter::new("/home"),
        Box::new(store.clone()),
        Rc::new(ManualClock::new(START)),
    )
    .unwrap();

    session.handle_menu_click("dashboard");
    assert_eq!(session.current_path(), "/dashboard");
    assert!(session.analytics().is_empty());

    session.shutdown().unwrap();
    assert_eq!(store.get("navigation_analytics").unwrap(), Some("[]".to_string()));
}

#[test]
fn history_limit_comes_from_config() {
    let mut config = Config::default();
    config.navigation.history_limit = 3;
    let mut session = NavigationSession::with_clock(
        &config,
        MemoryRouter::new("/home"),
        Box::new(MemoryStore::new()),
        Rc::new(ManualClock::new(START)),
    )
    .unwrap();

    for path in ["/dashboard", "/profile", "/settings", "/welcome/standards"] {
        session.navigate(path, None);
    }
    let paths: Vec<&str> = session
        .history()
        .entries()
        .iter()
        .map(|e| e.path.as_str())
        .collect();
    assert_eq!(paths, vec!["/profile", "/settings", "/welcome/standards"]);
    assert_eq!(session.history().cursor(), Some(2));
}
