//! Route guarding
//!
//! [`decide`] is the whole rule table: a pure, total function of
//! `(mounted, status, path, public paths)`. [`RouteGuard`] wraps it with the
//! one piece of memory the rule table cannot have, namely which decision is
//! currently settled, so that a redirect navigation is issued once per entry
//! into a redirect decision and never on a plain re-render.
//!
//! | mounted & status known | path is public | logged in | decision |
//! |------------------------|----------------|-----------|----------|
//! | no                     | -              | -         | `ShowLoader` |
//! | yes                    | yes            | yes       | `RedirectToHome` |
//! | yes                    | yes            | no        | `ShowPublicContent` |
//! | yes                    | no             | yes       | `ShowProtectedContent` |
//! | yes                    | no             | no        | `RedirectToLogin` |

use crate::session::LogoutHandle;
use crate::shell::{AppShell, Navigator, HOME_PATH, LOGIN_PATH, REGISTER_PATH};
use crate::types::SessionStatus;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Render/redirect outcome for the current session and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteDecision {
    ShowLoader,
    ShowPublicContent,
    ShowProtectedContent,
    RedirectToHome,
    RedirectToLogin,
}

impl RouteDecision {
    /// Where a redirect decision navigates to.
    pub fn redirect_target(self) -> Option<&'static str> {
        match self {
            RouteDecision::RedirectToHome => Some(HOME_PATH),
            RouteDecision::RedirectToLogin => Some(LOGIN_PATH),
            _ => None,
        }
    }

    /// Pending redirects show the loader, never the page behind them.
    pub fn renders_loader(self) -> bool {
        matches!(
            self,
            RouteDecision::ShowLoader
                | RouteDecision::RedirectToHome
                | RouteDecision::RedirectToLogin
        )
    }
}

/// Paths reachable without a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicPaths(BTreeSet<String>);

impl PublicPaths {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(paths.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for PublicPaths {
    fn default() -> Self {
        Self::new([LOGIN_PATH, REGISTER_PATH])
    }
}

/// The rule table.
pub fn decide(
    mounted: bool,
    status: SessionStatus,
    path: &str,
    public_paths: &PublicPaths,
) -> RouteDecision {
    if !mounted || status == SessionStatus::Unknown {
        return RouteDecision::ShowLoader;
    }

    let logged_in = status.is_logged_in();
    if public_paths.contains(path) {
        if logged_in {
            RouteDecision::RedirectToHome
        } else {
            RouteDecision::ShowPublicContent
        }
    } else if logged_in {
        RouteDecision::ShowProtectedContent
    } else {
        RouteDecision::RedirectToLogin
    }
}

/// Guard lifecycle.
///
/// Deciding happens entirely inside [`RouteGuard::evaluate`], so the guard is
/// only ever observed before its first evaluation or settled on a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Nothing evaluated yet.
    Initializing,
    Settled(RouteDecision),
}

/// What the guard renders for a decision.
#[derive(Debug)]
pub enum GuardView<C> {
    Loader,
    Public(C),
    Protected(AppShell<C>),
}

/// Decision state machine that issues navigation side effects.
pub struct RouteGuard {
    public_paths: PublicPaths,
    navigator: Arc<dyn Navigator>,
    state: GuardState,
}

impl RouteGuard {
    pub fn new(public_paths: PublicPaths, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            public_paths,
            navigator,
            state: GuardState::Initializing,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn public_paths(&self) -> &PublicPaths {
        &self.public_paths
    }

    /// Recompute the decision from the given inputs.
    ///
    /// Navigates only when this evaluation enters a redirect decision that was
    /// not already settled.
    pub fn evaluate(&mut self, mounted: bool, status: SessionStatus, path: &str) -> RouteDecision {
        let previous = match self.state {
            GuardState::Settled(decision) => Some(decision),
            _ => None,
        };

        let decision = decide(mounted, status, path, &self.public_paths);
        self.state = GuardState::Settled(decision);

        trace!(mounted, %status, path, ?decision, "Route evaluated");

        if previous != Some(decision) {
            if let Some(target) = decision.redirect_target() {
                debug!(from = path, to = target, "Route guard redirect");
                self.navigator.replace(target);
            }
        }

        decision
    }

    /// Map a decision onto what should be displayed.
    pub fn view<C>(
        decision: RouteDecision,
        children: C,
        path: &str,
        on_logout: LogoutHandle,
    ) -> GuardView<C> {
        match decision {
            RouteDecision::ShowPublicContent => GuardView::Public(children),
            RouteDecision::ShowProtectedContent => {
                GuardView::Protected(AppShell::new(children, path, on_logout))
            }
            _ => GuardView::Loader,
        }
    }

    /// Re-evaluate on every status or path change until either channel closes.
    ///
    /// Each settled decision is published on `decisions`. Inputs are always
    /// read fresh from the channels at evaluation time.
    pub async fn watch(
        mut self,
        mut status: watch::Receiver<SessionStatus>,
        mut path: watch::Receiver<String>,
        decisions: watch::Sender<RouteDecision>,
    ) {
        loop {
            let current_status = *status.borrow_and_update();
            let current_path = path.borrow_and_update().clone();

            let decision = self.evaluate(true, current_status, &current_path);
            decisions.send_replace(decision);

            tokio::select! {
                changed = status.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                changed = path.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        debug!("Route guard stopped");
    }

    /// Spawn [`watch`](Self::watch) on the runtime.
    ///
    /// The returned receiver starts at `ShowLoader` (not yet mounted).
    pub fn spawn(
        self,
        status: watch::Receiver<SessionStatus>,
        path: watch::Receiver<String>,
    ) -> (watch::Receiver<RouteDecision>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(RouteDecision::ShowLoader);
        let handle = tokio::spawn(self.watch(status, path, tx));
        (rx, handle)
    }
}
