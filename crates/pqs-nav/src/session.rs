//! The per-session composition root.
//!
//! A [`NavigationSession`] owns the router handle and every navigation store
//! for one application session. Hosts call [`NavigationSession::sync`] after
//! the router commits a location; navigation methods on the session call it
//! themselves, which is enough for routers that commit synchronously.

use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info};

use crate::analytics::AnalyticsRecorder;
use crate::breadcrumbs::{BreadcrumbItem, BreadcrumbTrail};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::Result;
use crate::history::HistoryStack;
use crate::router::{NavigationRequest, Router};
use crate::routes;
use crate::state::NavigationStateStore;
use crate::storage::KeyValueStore;
use crate::sync::RouterSynchronizer;

/// Navigation state, history, breadcrumbs and analytics for one session.
#[derive(Debug)]
pub struct NavigationSession<R: Router> {
    pub(crate) router: R,
    pub(crate) state: NavigationStateStore,
    pub(crate) synchronizer: RouterSynchronizer,
    pub(crate) history: HistoryStack,
    pub(crate) breadcrumbs: BreadcrumbTrail,
    pub(crate) analytics: AnalyticsRecorder,
}

impl<R: Router> NavigationSession<R> {
    /// Start a session using the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: &Config, router: R, store: Box<dyn KeyValueStore>) -> Result<Self> {
        Self::with_clock(config, router, store, Rc::new(SystemClock))
    }

    /// Start a session with an explicit clock.
    ///
    /// The router's current location is observed immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn with_clock(
        config: &Config,
        router: R,
        store: Box<dyn KeyValueStore>,
        clock: Rc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let mut session = Self {
            router,
            state: NavigationStateStore::new(),
            synchronizer: RouterSynchronizer::new(),
            history: HistoryStack::new(config.navigation.history_limit, Rc::clone(&clock)),
            breadcrumbs: BreadcrumbTrail::new(),
            analytics: AnalyticsRecorder::new(&config.analytics, store, clock),
        };
        info!(path = %session.current_path(), "navigation session started");
        session.sync();
        Ok(session)
    }

    /// The router.
    #[must_use]
    pub fn router(&self) -> &R {
        &self.router
    }

    /// Path of the router's current location.
    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.router.location().path
    }

    /// Navigation state store.
    #[must_use]
    pub fn state(&self) -> &NavigationStateStore {
        &self.state
    }

    /// Mutable navigation state store.
    pub fn state_mut(&mut self) -> &mut NavigationStateStore {
        &mut self.state
    }

    /// History stack.
    #[must_use]
    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Analytics recorder.
    #[must_use]
    pub fn analytics(&self) -> &AnalyticsRecorder {
        &self.analytics
    }

    /// Mutable analytics recorder.
    pub fn analytics_mut(&mut self) -> &mut AnalyticsRecorder {
        &mut self.analytics
    }

    /// Observe the router's current location.
    ///
    /// Runs the synchronizer, breadcrumb auto-clear, history recording and
    /// page-view tracking once per committed location. Returns `false` when
    /// the location was already observed.
    pub fn sync(&mut self) -> bool {
        let location = self.router.location().clone();
        if !self.synchronizer.observe(&location, &mut self.state) {
            return false;
        }

        let label = routes::label_for_path(&location.path);
        self.history.observe(&location, label.clone());
        self.breadcrumbs.observe(&location.path);
        self.analytics.track_page_view(&location.path, &label);
        true
    }

    /// Navigate to `path` and observe the result.
    pub fn navigate(&mut self, path: &str, state: Option<Value>) {
        self.router.navigate(path, state);
        self.sync();
    }

    fn replay(&mut self, request: Option<NavigationRequest>) -> bool {
        let Some(request) = request else {
            return false;
        };
        self.router.navigate(&request.path, request.state);
        self.sync();
        true
    }

    /// Step back in history. Returns `false` at the first entry.
    pub fn go_back(&mut self) -> bool {
        let request = self.history.go_back();
        self.replay(request)
    }

    /// Step forward in history. Returns `false` at the last entry.
    pub fn go_forward(&mut self) -> bool {
        let request = self.history.go_forward();
        self.replay(request)
    }

    /// Jump to a history entry by id. Returns `false` for unknown ids.
    pub fn go_to_history_item(&mut self, id: &str) -> bool {
        let request = self.history.go_to_history_item(id);
        self.replay(request)
    }

    /// Forget all history.
    pub fn clear_history(&mut self) {
        self.history.clear_history();
    }

    /// Breadcrumb trail for the current location.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbItem> {
        self.breadcrumbs.derive(self.current_path())
    }

    /// Push a custom breadcrumb.
    pub fn add_breadcrumb(&mut self, item: BreadcrumbItem) {
        self.breadcrumbs.add_breadcrumb(item);
    }

    /// Remove a custom breadcrumb.
    pub fn remove_breadcrumb(&mut self, id: &str) {
        self.breadcrumbs.remove_breadcrumb(id);
    }

    /// Remove all custom breadcrumbs.
    pub fn clear_breadcrumbs(&mut self) {
        self.breadcrumbs.clear_breadcrumbs();
    }

    /// Follow a breadcrumb. Everything else updates through the observer.
    pub fn navigate_to_breadcrumb(&mut self, path: &str) {
        let label = self
            .breadcrumbs()
            .into_iter()
            .find(|c| c.path == path)
            .map_or_else(|| routes::label_for_path(path), |c| c.label);
        self.analytics.track_breadcrumb_click(path, &label);
        debug!(path, "breadcrumb navigation");
        self.navigate(path, None);
    }

    /// Write pending analytics and end the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the analytics buffer cannot be persisted.
    pub fn shutdown(mut self) -> Result<()> {
        info!("navigation session ending");
        self.analytics.flush()
    }

    pub(crate) fn flush_quietly(&mut self) {
        self.analytics.persist();
    }
}
