//! The routing mechanism the navigation core observes and drives.
//!
//! The host owns the real router. This crate only needs the current
//! [`Location`] and a way to request navigation; [`MemoryRouter`] is a
//! synchronous implementation used by the CLI and tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A committed router location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Path component, e.g. `/dashboard/users`.
    pub path: String,
    /// Payload passed to [`Router::navigate`], returned unchanged.
    pub state: Option<Value>,
    /// Changes on every committed navigation, including repeats of the same path.
    pub key: u64,
}

impl Location {
    /// Location with no state payload.
    #[must_use]
    pub fn new(path: impl Into<String>, key: u64) -> Self {
        Self {
            path: path.into(),
            state: None,
            key,
        }
    }
}

/// A navigation the core wants the router to perform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationRequest {
    /// Target path.
    pub path: String,
    /// Payload to attach to the new location.
    pub state: Option<Value>,
}

impl NavigationRequest {
    /// Request navigation to `path` without a payload.
    #[must_use]
    pub fn to(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            state: None,
        }
    }
}

/// Routing mechanism contract.
///
/// `navigate` must eventually make [`Router::location`] report the new path
/// with a new key, and must hand back `state` unchanged.
pub trait Router {
    /// The most recently committed location.
    fn location(&self) -> &Location;

    /// Request navigation to `path`.
    fn navigate(&mut self, path: &str, state: Option<Value>);
}

/// In-process router that commits navigations immediately.
#[derive(Debug, Clone)]
pub struct MemoryRouter {
    location: Location,
    next_key: u64,
    navigations: usize,
}

impl MemoryRouter {
    /// Router starting at `initial_path`.
    #[must_use]
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            location: Location::new(initial_path, 0),
            next_key: 1,
            navigations: 0,
        }
    }

    /// Number of navigations performed since construction.
    #[must_use]
    pub fn navigation_count(&self) -> usize {
        self.navigations
    }
}

impl Default for MemoryRouter {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Router for MemoryRouter {
    fn location(&self) -> &Location {
        &self.location
    }

    fn navigate(&mut self, path: &str, state: Option<Value>) {
        debug!(from = %self.location.path, to = %path, "router navigate");
        self.location = Location {
            path: path.to_string(),
            state,
            key: self.next_key,
        };
        self.next_key += 1;
        self.navigations += 1;
    }
}
