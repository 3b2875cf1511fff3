//! Navigation analytics: a capped event log persisted to local storage.
//!
//! Events are kept in memory and written back to the [`KeyValueStore`] in
//! batches: after `flush_every` mutations, on [`AnalyticsRecorder::clear_analytics`],
//! on an explicit [`AnalyticsRecorder::flush`], and when the recorder is
//! dropped. Storage problems are logged and never surface from tracking calls.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::config::AnalyticsConfig;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

/// Default buffer capacity.
pub const DEFAULT_MAX_EVENTS: usize = 1000;

/// Entries in each "top" list of [`NavigationStats`].
const TOP_N: usize = 10;

/// Events included in the journey.
const JOURNEY_LEN: usize = 50;

/// Events included in an export.
const EXPORT_EVENTS: usize = 100;

/// Kind of recorded navigation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A location was displayed.
    PageView,
    /// A top-level menu entry was clicked.
    MenuClick,
    /// A submenu entry was clicked.
    SubmenuClick,
    /// A breadcrumb was clicked.
    BreadcrumbClick,
    /// A keyboard shortcut was used.
    ShortcutUsed,
}

impl EventType {
    /// Every event type.
    pub const ALL: [Self; 5] = [
        Self::PageView,
        Self::MenuClick,
        Self::SubmenuClick,
        Self::BreadcrumbClick,
        Self::ShortcutUsed,
    ];
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageView => write!(f, "page_view"),
            Self::MenuClick => write!(f, "menu_click"),
            Self::SubmenuClick => write!(f, "submenu_click"),
            Self::BreadcrumbClick => write!(f, "breadcrumb_click"),
            Self::ShortcutUsed => write!(f, "shortcut_used"),
        }
    }
}

/// A recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    /// Unique id.
    pub id: String,
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: EventType,
    /// Path the event relates to.
    pub path: String,
    /// Human-readable label.
    pub label: String,
    /// Unix milliseconds.
    pub timestamp: i64,
    /// For page views: milliseconds spent on the previous page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    /// Kind-specific details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// The caller-supplied part of an event; id and timestamp are assigned on record.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    /// Event kind.
    pub kind: EventType,
    /// Path the event relates to.
    pub path: String,
    /// Human-readable label.
    pub label: String,
    /// Optional duration in milliseconds.
    pub duration: Option<i64>,
    /// Optional details.
    pub metadata: Option<Value>,
}

impl EventDraft {
    /// Draft without duration or metadata.
    #[must_use]
    pub fn new(kind: EventType, path: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            label: label.into(),
            duration: None,
            metadata: None,
        }
    }

    /// Attach metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Attach a duration.
    #[must_use]
    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Window size reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
}

/// Host environment attached to page views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// Current window size.
    pub viewport: Option<Viewport>,
    /// Where the session came from, if the host knows.
    pub referrer: Option<String>,
}

/// A path with its page-view count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathCount {
    /// Visited path.
    pub path: String,
    /// Number of page views.
    pub count: usize,
}

/// A menu id with its click count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuCount {
    /// Menu or submenu id.
    pub menu_id: String,
    /// Number of clicks.
    pub count: usize,
}

/// Aggregates over the current buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationStats {
    /// Number of buffered events.
    pub total_events: usize,
    /// Count per event type, every type present.
    pub events_by_type: BTreeMap<EventType, usize>,
    /// Up to ten most visited paths.
    pub most_visited_paths: Vec<PathCount>,
    /// Up to ten most clicked menu and submenu ids.
    pub most_used_menus: Vec<MenuCount>,
    /// Mean page-view duration in milliseconds, 0 without data.
    pub average_page_duration_ms: f64,
    /// The last fifty events, oldest first.
    pub user_journey: Vec<NavigationEvent>,
}

/// Session-scoped event recorder.
#[derive(Debug)]
pub struct AnalyticsRecorder {
    events: VecDeque<NavigationEvent>,
    enabled: bool,
    max_events: usize,
    flush_every: usize,
    pending: usize,
    storage_key: String,
    store: Box<dyn KeyValueStore>,
    clock: Rc<dyn Clock>,
    session_start: i64,
    last_page_view: i64,
    current_path: String,
    environment: Environment,
    next_seq: u64,
}

impl AnalyticsRecorder {
    /// Create a recorder and load any previously persisted events.
    ///
    /// Missing or unreadable data starts an empty buffer.
    #[must_use]
    pub fn new(config: &AnalyticsConfig, store: Box<dyn KeyValueStore>, clock: Rc<dyn Clock>) -> Self {
        let now = clock.now_millis();
        let max_events = config.max_events.max(1);
        let mut recorder = Self {
            events: VecDeque::new(),
            enabled: config.enabled,
            max_events,
            flush_every: config.flush_every.max(1),
            pending: 0,
            storage_key: config.storage_key.clone(),
            store,
            clock,
            session_start: now,
            last_page_view: now,
            current_path: "/".to_string(),
            environment: Environment::default(),
            next_seq: 0,
        };
        recorder.events = recorder.load();
        recorder.next_seq = next_seq_after(&recorder.events);
        recorder
    }

    fn load(&self) -> VecDeque<NavigationEvent> {
        let raw = match self.store.get(&self.storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return VecDeque::new(),
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "failed to read stored analytics");
                return VecDeque::new();
            }
        };
        match serde_json::from_str::<VecDeque<NavigationEvent>>(&raw) {
            Ok(mut events) => {
                let excess = events.len().saturating_sub(self.max_events);
                events.drain(..excess);
                info!(count = events.len(), "loaded stored analytics");
                events
            }
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "stored analytics are malformed, starting empty");
                VecDeque::new()
            }
        }
    }

    /// Whether events are being recorded.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn recording on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        debug!(enabled, "analytics tracking toggled");
    }

    /// Environment attached to page views.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Replace the environment attached to future page views.
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    /// Buffered events, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &NavigationEvent> {
        self.events.iter()
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Mutations not yet written to storage.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.pending
    }

    /// Record an event. Returns `None` when tracking is disabled.
    pub fn track_event(&mut self, draft: EventDraft) -> Option<&NavigationEvent> {
        if !self.enabled {
            return None;
        }
        let timestamp = self.clock.now_millis();
        let event = NavigationEvent {
            id: format!("e{timestamp}-{}", self.next_seq),
            kind: draft.kind,
            path: draft.path,
            label: draft.label,
            timestamp,
            duration: draft.duration,
            metadata: draft.metadata,
        };
        self.next_seq += 1;
        debug!(kind = %event.kind, path = %event.path, "tracked navigation event");

        self.events.push_back(event);
        while self.events.len() > self.max_events {
            self.events.pop_front();
        }
        self.mark_dirty();
        self.events.back()
    }

    /// Record a page view with the time spent on the previous page.
    pub fn track_page_view(&mut self, path: &str, label: &str) -> Option<&NavigationEvent> {
        let now = self.clock.now_millis();
        let duration = now - self.last_page_view;
        self.last_page_view = now;
        let previous_path = std::mem::replace(&mut self.current_path, path.to_string());

        let metadata = json!({
            "viewport": self.environment.viewport,
            "referrer": self.environment.referrer,
            "previousPath": previous_path,
        });
        self.track_event(
            EventDraft::new(EventType::PageView, path, label)
                .with_duration(duration)
                .with_metadata(metadata),
        )
    }

    /// Record a click on a top-level menu entry.
    pub fn track_menu_click(&mut self, menu_id: &str, label: &str) -> Option<&NavigationEvent> {
        let path = self.current_path.clone();
        self.track_event(
            EventDraft::new(EventType::MenuClick, path, label)
                .with_metadata(json!({ "menuId": menu_id })),
        )
    }

    /// Record a click on a submenu entry.
    pub fn track_submenu_click(
        &mut self,
        parent_menu_id: &str,
        submenu_id: &str,
        label: &str,
    ) -> Option<&NavigationEvent> {
        let path = self.current_path.clone();
        self.track_event(
            EventDraft::new(EventType::SubmenuClick, path, label).with_metadata(json!({
                "parentMenuId": parent_menu_id,
                "submenuId": submenu_id,
            })),
        )
    }

    /// Record a click on a breadcrumb targeting `path`.
    pub fn track_breadcrumb_click(&mut self, path: &str, label: &str) -> Option<&NavigationEvent> {
        let from = self.current_path.clone();
        self.track_event(
            EventDraft::new(EventType::BreadcrumbClick, path, label)
                .with_metadata(json!({ "fromPath": from })),
        )
    }

    /// Record a keyboard shortcut.
    pub fn track_shortcut_used(&mut self, shortcut: &str, action: &str) -> Option<&NavigationEvent> {
        let path = self.current_path.clone();
        self.track_event(
            EventDraft::new(EventType::ShortcutUsed, path, action).with_metadata(json!({
                "shortcut": shortcut,
                "action": action,
            })),
        )
    }

    /// Aggregate the current buffer.
    #[must_use]
    pub fn stats(&self) -> NavigationStats {
        let mut events_by_type: BTreeMap<EventType, usize> =
            EventType::ALL.iter().map(|t| (*t, 0)).collect();
        for event in &self.events {
            *events_by_type.entry(event.kind).or_default() += 1;
        }

        let page_views = || self.events.iter().filter(|e| e.kind == EventType::PageView);

        let most_visited_paths = top_counts(page_views().map(|e| e.path.as_str()))
            .into_iter()
            .map(|(path, count)| PathCount { path, count })
            .collect();

        let menu_ids = self.events.iter().filter_map(|e| {
            let field = match e.kind {
                EventType::MenuClick => "menuId",
                EventType::SubmenuClick => "submenuId",
                _ => return None,
            };
            e.metadata.as_ref()?.get(field)?.as_str()
        });
        let most_used_menus = top_counts(menu_ids)
            .into_iter()
            .map(|(menu_id, count)| MenuCount { menu_id, count })
            .collect();

        let durations: Vec<i64> = page_views().filter_map(|e| e.duration).collect();
        #[allow(clippy::cast_precision_loss)]
        let average_page_duration_ms = if durations.is_empty() {
            0.0
        } else {
            durations.iter().sum::<i64>() as f64 / durations.len() as f64
        };

        let skip = self.events.len().saturating_sub(JOURNEY_LEN);
        NavigationStats {
            total_events: self.events.len(),
            events_by_type,
            most_visited_paths,
            most_used_menus,
            average_page_duration_ms,
            user_journey: self.events.iter().skip(skip).cloned().collect(),
        }
    }

    /// Empty the buffer, reset the page-view baseline, and persist immediately.
    pub fn clear_analytics(&mut self) {
        self.events.clear();
        self.last_page_view = self.clock.now_millis();
        self.pending = 0;
        info!("analytics cleared");
        self.persist();
    }

    /// Snapshot of the session as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export_analytics(&self) -> Result<String> {
        let now = self.clock.now_millis();
        let exported_at = DateTime::<Utc>::from_timestamp_millis(now)
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default();
        let skip = self.events.len().saturating_sub(EXPORT_EVENTS);
        let events: Vec<&NavigationEvent> = self.events.iter().skip(skip).collect();

        let snapshot = json!({
            "exportedAt": exported_at,
            "sessionDurationMs": now - self.session_start,
            "stats": self.stats(),
            "events": events,
        });
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Write [`Self::export_analytics`] to disk and return the file written.
    ///
    /// When `target` is an existing directory the file is named
    /// `navigation_export_<unix seconds>.json` inside it. Missing parent
    /// directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be created, serialization
    /// fails, or the file cannot be written.
    pub fn export_to_file(&self, target: &Path) -> Result<PathBuf> {
        let path = if target.is_dir() {
            let secs = self.clock.now_millis().div_euclid(1000);
            target.join(format!("navigation_export_{secs}.json"))
        } else {
            target.to_path_buf()
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, self.export_analytics()?)?;
        info!(path = %path.display(), count = self.events.len(), "analytics exported");
        Ok(path)
    }

    /// Write the buffer to storage now.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn flush(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.events)?;
        self.store.set(&self.storage_key, &raw)?;
        debug!(count = self.events.len(), "analytics flushed");
        self.pending = 0;
        Ok(())
    }

    /// Flush, logging instead of returning any failure.
    pub(crate) fn persist(&mut self) {
        match self.flush() {
            Ok(()) => {}
            Err(e) if e.is_storage_error() => warn!(error = %e, "failed to persist analytics"),
            Err(e) => error!(error = %e, "analytics could not be written"),
        }
    }

    fn mark_dirty(&mut self) {
        self.pending += 1;
        if self.pending >= self.flush_every {
            self.persist();
        }
    }
}

impl Drop for AnalyticsRecorder {
    fn drop(&mut self) {
        if self.pending > 0 {
            self.persist();
        }
    }
}

/// First sequence number not used by any loaded event id.
///
/// Ids look like `e<timestamp>-<seq>`. Never below the buffer length.
fn next_seq_after(events: &VecDeque<NavigationEvent>) -> u64 {
    let max_seen = events
        .iter()
        .filter_map(|e| e.id.rsplit_once('-'))
        .filter_map(|(_, seq)| seq.parse::<u64>().ok())
        .max()
        .map_or(0, |seq| seq + 1);
    max_seen.max(events.len() as u64)
}

/// Count occurrences and return the top entries, most frequent first,
/// ties broken alphabetically.
fn top_counts<'a>(items: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in items {
        *counts.entry(item).or_default() += 1;
    }
    let mut sorted: Vec<(&str, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sorted
        .into_iter()
        .take(TOP_N)
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
