//! `pqs-nav` - Navigation core for the PQS personnel desktop app
//!
//! This library tracks which sidebar entry is active and which menu groups are
//! expanded, keeps a bounded back/forward history, derives breadcrumb trails
//! from the current route, and records navigation analytics to local storage.
//!
//! Everything for one application session lives in a [`NavigationSession`],
//! which is generic over the host's [`Router`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analytics;
pub mod breadcrumbs;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod history;
pub mod logging;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
pub mod storage;
pub mod sync;

pub use analytics::{AnalyticsRecorder, EventType, NavigationEvent, NavigationStats};
pub use breadcrumbs::{BreadcrumbItem, BreadcrumbTrail};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
pub use handlers::Shortcut;
pub use history::{HistoryEntry, HistoryStack};
pub use logging::init_logging;
pub use router::{Location, MemoryRouter, NavigationRequest, Router};
pub use session::NavigationSession;
pub use state::{NavigationState, NavigationStateStore, StateUpdate};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use sync::RouterSynchronizer;
