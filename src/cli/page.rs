//! Page host for CLI commands
//!
//! A [`PageHost`] plays the part of the browser tab: it owns the router, the
//! toast log and the session gate for one command, and drives the route guard
//! the way the rendered tree would. Opening a page is a two-phase mount. The
//! guard first sees an unmounted tree (loader), then the session is activated
//! from the store and the guard settles, following any redirect it issues.

use crate::guard::{GuardView, PublicPaths, RouteDecision, RouteGuard};
use crate::session::{FileStore, KeyValueStore, SessionGate};
use crate::shell::{Navigation, Navigator, NotificationLog};
use crate::types::{Notification, SessionStatus};
use crate::utils::AttorneyConfig;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Upper bound on redirects followed while settling one page.
const MAX_REDIRECTS: usize = 4;

/// One guard evaluation as seen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub path: String,
    pub decision: RouteDecision,
}

/// Router, toasts, session and guard for one command.
pub struct PageHost {
    pub gate: Arc<SessionGate>,
    pub navigation: Arc<Navigation>,
    pub notifications: Arc<NotificationLog>,
    guard: RouteGuard,
    trail: Vec<Step>,
}

impl PageHost {
    /// Build a host at `path` on top of `store`.
    pub fn new(store: Arc<dyn KeyValueStore>, public_paths: PublicPaths, path: &str) -> Self {
        let navigation = Arc::new(Navigation::new(path));
        let notifications = Arc::new(NotificationLog::new());
        let gate = Arc::new(SessionGate::new(
            store,
            navigation.clone(),
            notifications.clone(),
        ));
        let guard = RouteGuard::new(public_paths, navigation.clone());

        Self {
            gate,
            navigation,
            notifications,
            guard,
            trail: Vec::new(),
        }
    }

    /// Build a host from configuration, opening the file store.
    pub fn from_config(
        config: &AttorneyConfig,
        store_override: Option<&Path>,
        path: &str,
    ) -> anyhow::Result<Self> {
        let store_path = store_override.unwrap_or(config.app.store_path.as_path());
        let store = FileStore::open(store_path)
            .with_context(|| format!("Failed to open session store {:?}", store_path))?;
        debug!(store = ?store.path(), path, "Opening page");
        Ok(Self::new(
            Arc::new(store),
            config.routes.public_paths(),
            path,
        ))
    }

    /// Mount the page: loader first, then activate the session and settle.
    pub fn open(&mut self) -> RouteDecision {
        let path = self.path();
        let initial = self.guard.evaluate(false, self.gate.status(), &path);
        self.record(path, initial);

        self.gate.activate();
        self.settle()
    }

    /// Re-evaluate after a status or path change, following redirects.
    pub fn settle(&mut self) -> RouteDecision {
        let mut decision = RouteDecision::ShowLoader;

        for _ in 0..=MAX_REDIRECTS {
            let path = self.path();
            decision = self.guard.evaluate(true, self.gate.status(), &path);
            self.record(path.clone(), decision);

            if decision.redirect_target().is_none() || self.path() == path {
                return decision;
            }
        }

        warn!(path = %self.path(), "Too many redirects, giving up");
        decision
    }

    /// Current router path.
    pub fn path(&self) -> String {
        self.navigation.current_path()
    }

    pub fn status(&self) -> SessionStatus {
        self.gate.status()
    }

    /// The most recent settled decision.
    pub fn decision(&self) -> RouteDecision {
        self.trail
            .last()
            .map(|step| step.decision)
            .unwrap_or(RouteDecision::ShowLoader)
    }

    /// Every evaluation so far, oldest first.
    pub fn trail(&self) -> &[Step] {
        &self.trail
    }

    /// Toasts raised since the last call.
    pub fn take_notifications(&self) -> Vec<Notification> {
        self.notifications.drain()
    }

    /// What the guard renders for `children` at the current path.
    pub fn view<C>(&self, children: C) -> GuardView<C> {
        RouteGuard::view(
            self.decision(),
            children,
            &self.path(),
            self.gate.logout_handle(),
        )
    }

    fn record(&mut self, path: String, decision: RouteDecision) {
        self.trail.push(Step { path, decision });
    }
}
