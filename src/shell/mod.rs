//! Navigation and notification seams between the core and whatever renders it
//!
//! The session and routing layers never draw anything themselves. They talk to
//! the surrounding UI through two small traits:
//!
//! - [`Navigator`]: "what is the current path" and "go to path P"
//! - [`Notifier`]: fire-and-forget toasts with a severity
//!
//! [`Navigation`] is an in-process router backed by a `watch` channel so the
//! route guard can re-evaluate on every path change. [`AppShell`] is the
//! persistent chrome wrapped around protected content.

use crate::session::LogoutHandle;
use crate::types::{Notification, Severity};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{info, warn};

/// Path of the dashboard.
pub const HOME_PATH: &str = "/";
/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";
/// Path of the registration page.
pub const REGISTER_PATH: &str = "/register";

/// Receives navigation requests.
pub trait Navigator: Send + Sync {
    /// The path currently displayed.
    fn current_path(&self) -> String;

    /// Replace the current history entry with `path`.
    fn replace(&self, path: &str);
}

/// Receives user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// In-process router.
///
/// Every call to [`Navigation::replace`] that actually changes the path wakes
/// all subscribers.
#[derive(Debug)]
pub struct Navigation {
    path: watch::Sender<String>,
}

impl Navigation {
    pub fn new(initial: impl Into<String>) -> Self {
        let (path, _) = watch::channel(initial.into());
        Self { path }
    }

    /// Subscribe to path changes.
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.path.subscribe()
    }
}

impl Default for Navigation {
    fn default() -> Self {
        Self::new(HOME_PATH)
    }
}

impl Navigator for Navigation {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn replace(&self, path: &str) {
        let changed = self.path.send_if_modified(|current| {
            if current.as_str() == path {
                false
            } else {
                *current = path.to_string();
                true
            }
        });
        if changed {
            info!(path, "Navigated");
        }
    }
}

/// Notifier that keeps every notification in memory and mirrors it to tracing.
#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Mutex<Vec<Notification>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all notifications received so far.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => {
                info!(title = %notification.title, "{}", notification.message)
            }
            Severity::Destructive => {
                warn!(title = %notification.title, "{}", notification.message)
            }
        }
        self.entries.lock().push(notification);
    }
}

// ============= Navigation Shell =============

/// An entry in the shell's sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

const NAV_ITEMS: [(&str, &str); 4] = [
    ("/", "Dashboard"),
    ("/document-insight", "Document Insight"),
    ("/legal-guidance", "Legal Guidance"),
    ("/lawyer-locator", "Lawyer Locator"),
];

/// Sidebar entries with the one matching `current_path` marked active.
pub fn nav_items(current_path: &str) -> Vec<NavItem> {
    NAV_ITEMS
        .iter()
        .map(|&(href, label)| NavItem {
            href,
            label,
            active: href == current_path,
        })
        .collect()
}

/// Persistent chrome around protected content.
pub struct AppShell<C> {
    pub children: C,
    pub nav: Vec<NavItem>,
    pub on_logout: LogoutHandle,
}

impl<C> AppShell<C> {
    pub fn new(children: C, current_path: &str, on_logout: LogoutHandle) -> Self {
        Self {
            children,
            nav: nav_items(current_path),
            on_logout,
        }
    }

    /// The entry for the page being shown, if it is a sidebar page.
    pub fn active_item(&self) -> Option<&NavItem> {
        self.nav.iter().find(|item| item.active)
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for AppShell<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppShell")
            .field("children", &self.children)
            .field("nav", &self.nav)
            .finish_non_exhaustive()
    }
}
