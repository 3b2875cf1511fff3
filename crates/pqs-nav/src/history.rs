//! Back/forward history with a movable cursor.
//!
//! Classic browser semantics: visiting a page while the cursor is behind the
//! tail discards everything after the cursor. Moving back, forward or jumping
//! only moves the cursor and asks the router to navigate.
//!
//! Programmatic navigations come back through [`HistoryStack::observe`] like
//! any other location change. The replay latch set by the movement methods
//! makes the next observation a no-op so the replay is not recorded as a new
//! visit.

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::router::{Location, NavigationRequest};

/// Default number of retained entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One visited location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique id within the session.
    pub id: String,
    /// Visited path.
    pub path: String,
    /// Human-readable label.
    pub label: String,
    /// Creation time in Unix milliseconds.
    pub timestamp: i64,
    /// Router payload of the visit.
    pub state: Option<Value>,
}

impl HistoryEntry {
    fn request(&self) -> NavigationRequest {
        NavigationRequest {
            path: self.path.clone(),
            state: self.state.clone(),
        }
    }
}

/// Ordered visits plus a cursor.
#[derive(Debug)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
    replaying: bool,
    max_entries: usize,
    next_seq: u64,
    clock: Rc<dyn Clock>,
}

impl HistoryStack {
    /// Empty history retaining at most `max_entries` entries (at least one).
    #[must_use]
    pub fn new(max_entries: usize, clock: Rc<dyn Clock>) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            replaying: false,
            max_entries: max_entries.max(1),
            next_seq: 0,
            clock,
        }
    }

    /// All retained entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Cursor position, `None` when empty.
    #[must_use]
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Entry under the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Whether the next observation will be skipped as a replay.
    #[must_use]
    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// `true` iff the cursor is past the first entry.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    /// `true` iff the cursor is before the last entry.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    /// Record a new visit after the cursor and move the cursor to it.
    pub fn add_to_history(
        &mut self,
        path: impl Into<String>,
        label: impl Into<String>,
        state: Option<Value>,
    ) -> &HistoryEntry {
        let timestamp = self.clock.now_millis();
        let entry = HistoryEntry {
            id: format!("h{timestamp}-{}", self.next_seq),
            path: path.into(),
            label: label.into(),
            timestamp,
            state,
        };
        self.next_seq += 1;

        if let Some(c) = self.cursor {
            let dropped = self.entries.len() - (c + 1);
            if dropped > 0 {
                trace!(dropped, "discarding forward history");
            }
            self.entries.truncate(c + 1);
        }
        self.entries.push(entry);

        let overflow = self.entries.len().saturating_sub(self.max_entries);
        if overflow > 0 {
            self.entries.drain(..overflow);
        }
        let tail = self.entries.len() - 1;
        self.cursor = Some(tail);

        let entry = &self.entries[tail];
        debug!(path = %entry.path, cursor = tail, len = self.entries.len(), "history entry added");
        entry
    }

    /// Move the cursor one step back.
    pub fn go_back(&mut self) -> Option<NavigationRequest> {
        let c = self.cursor.filter(|&c| c > 0)?;
        self.move_to(c - 1)
    }

    /// Move the cursor one step forward.
    pub fn go_forward(&mut self) -> Option<NavigationRequest> {
        let c = self.cursor.filter(|&c| c + 1 < self.entries.len())?;
        self.move_to(c + 1)
    }

    /// Move the cursor to the entry with `id`. Unknown ids are ignored.
    pub fn go_to_history_item(&mut self, id: &str) -> Option<NavigationRequest> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        self.move_to(index)
    }

    fn move_to(&mut self, index: usize) -> Option<NavigationRequest> {
        let request = self.entries.get(index)?.request();
        self.cursor = Some(index);
        self.replaying = true;
        debug!(cursor = index, path = %request.path, "history replay");
        Some(request)
    }

    /// Record an observed location.
    ///
    /// Consumes a pending replay latch without recording. Otherwise a visit to
    /// the path already under the cursor is ignored and anything else is
    /// added. Returns whether an entry was added.
    pub fn observe(&mut self, location: &Location, label: impl Into<String>) -> bool {
        if self.replaying {
            self.replaying = false;
            trace!(path = %location.path, "replay observed");
            return false;
        }
        if self.current().is_some_and(|e| e.path == location.path) {
            return false;
        }
        self.add_to_history(location.path.clone(), label, location.state.clone());
        true
    }

    /// Drop every entry.
    pub fn clear_history(&mut self) {
        self.entries.clear();
        self.cursor = None;
        self.replaying = false;
        debug!("history cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    fn stack() -> HistoryStack {
        HistoryStack::new(DEFAULT_HISTORY_LIMIT, Rc::new(ManualClock::new(1_000)))
    }

    fn paths(history: &HistoryStack) -> Vec<&str> {
        history.entries().iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_empty_history() {
        let history = stack();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn test_add_moves_cursor_to_tail() {
        let mut history = stack();
        history.add_to_history("/home", "Home", None);
        history.add_to_history("/profile", "Profile", None);

        assert_eq!(history.cursor(), Some(1));
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());
        assert_eq!(history.current().unwrap().label, "Profile");
    }

    #[test]
    fn test_ids_are_unique() {
        let mut history = stack();
        let a = history.add_to_history("/a", "A", None).id.clone();
        let b = history.add_to_history("/b", "B", None).id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn test_add_behind_tail_truncates() {
        let mut history = stack();
        for p in ["/a", "/b", "/c"] {
            history.add_to_history(p, p, None);
        }
        history.go_back();
        history.go_back();
        assert_eq!(history.cursor(), Some(0));

        history.add_to_history("/d", "D", None);
        assert_eq!(paths(&history), vec!["/a", "/d"]);
        assert_eq!(history.cursor(), Some(1));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let mut history = HistoryStack::new(3, Rc::new(ManualClock::new(0)));
        for p in ["/1", "/2", "/3", "/4"] {
            history.add_to_history(p, p, None);
        }
        assert_eq!(paths(&history), vec!["/2", "/3", "/4"]);
        assert_eq!(history.cursor(), Some(2));
        assert_eq!(history.current().unwrap().path, "/4");
    }

    #[test]
    fn test_go_back_on_single_entry_is_noop() {
        let mut history = stack();
        history.add_to_history("/home", "Home", None);

        assert!(history.go_back().is_none());
        assert_eq!(history.cursor(), Some(0));
        assert!(!history.is_replaying());
    }

    #[test]
    fn test_back_and_forward_emit_requests() {
        let mut history = stack();
        history.add_to_history("/home", "Home", None);
        history.add_to_history(
            "/dashboard/users",
            "Users",
            Some(serde_json::json!({"page": 2})),
        );

        let back = history.go_back().unwrap();
        assert_eq!(back.path, "/home");
        assert!(history.is_replaying());

        let forward = history.go_forward().unwrap();
        assert_eq!(forward.path, "/dashboard/users");
        assert_eq!(forward.state, Some(serde_json::json!({"page": 2})));
        assert!(history.go_forward().is_none());
    }

    #[test]
    fn test_go_to_history_item() {
        let mut history = stack();
        let first = history.add_to_history("/a", "A", None).id.clone();
        history.add_to_history("/b", "B", None);
        history.add_to_history("/c", "C", None);

        let request = history.go_to_history_item(&first).unwrap();
        assert_eq!(request.path, "/a");
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_go_to_unknown_item_is_noop() {
        let mut history = stack();
        history.add_to_history("/a", "A", None);

        assert!(history.go_to_history_item("missing").is_none());
        assert_eq!(history.cursor(), Some(0));
        assert!(!history.is_replaying());
    }

    #[test]
    fn test_observe_skips_replay_once() {
        let mut history = stack();
        history.add_to_history("/a", "A", None);
        history.add_to_history("/b", "B", None);
        let request = history.go_back().unwrap();

        assert!(!history.observe(&Location::new(request.path, 5), "A"));
        assert!(!history.is_replaying());
        assert_eq!(history.len(), 2);

        assert!(history.observe(&Location::new("/c", 6), "C"));
        assert_eq!(paths(&history), vec!["/a", "/c"]);
    }

    #[test]
    fn test_observe_ignores_duplicate_of_current() {
        let mut history = stack();
        assert!(history.observe(&Location::new("/home", 1), "Home"));
        assert!(!history.observe(&Location::new("/home", 2), "Home"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_observe_keeps_location_state() {
        let mut history = stack();
        let mut location = Location::new("/dashboard/users", 1);
        location.state = Some(serde_json::json!({"from": "menu"}));

        history.observe(&location, "User Management");
        assert_eq!(
            history.current().unwrap().state,
            Some(serde_json::json!({"from": "menu"}))
        );
    }

    #[test]
    fn test_clear_history() {
        let mut history = stack();
        history.add_to_history("/a", "A", None);
        history.add_to_history("/b", "B", None);
        history.go_back();

        history.clear_history();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
        assert!(!history.is_replaying());
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let mut history = HistoryStack::new(0, Rc::new(ManualClock::new(0)));
        history.add_to_history("/a", "A", None);
        history.add_to_history("/b", "B", None);
        assert_eq!(paths(&history), vec!["/b"]);
    }
}
