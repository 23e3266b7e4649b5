//! Demo session management
//!
//! [`SessionGate`] owns the tri-state [`SessionStatus`] and the list of
//! registered demo accounts. Both live in an injected [`KeyValueStore`]:
//!
//! | Key | Value |
//! |-----|-------|
//! | `isLoggedIn_ai_attorney` | `"true"` or absent |
//! | `ai_attorney_demo_users` | JSON array of `{"username": ...}` |
//!
//! The status starts as [`SessionStatus::Unknown`] and settles on the first
//! call to [`SessionGate::activate`]. Every change is published on a `watch`
//! channel so the route guard can react to it.
//!
//! This is demo authentication: `admin`/`password` always works, and any
//! password is accepted for a registered username.

pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use crate::shell::{Navigator, Notifier, HOME_PATH, LOGIN_PATH};
use crate::types::{Notification, Result, SessionStatus, UserRecord};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Storage key of the persisted login flag.
pub const AUTH_KEY: &str = "isLoggedIn_ai_attorney";
/// Storage key of the registered user list.
pub const USERS_KEY: &str = "ai_attorney_demo_users";
/// Reserved administrator account.
pub const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "password";

/// Why a registration was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterRejection {
    EmptyField,
    ReservedUsername,
    DuplicateUsername,
    StorageFailure,
}

impl RegisterRejection {
    fn message(self) -> &'static str {
        match self {
            RegisterRejection::EmptyField => "Username and password cannot be empty.",
            RegisterRejection::ReservedUsername => "This username is reserved.",
            RegisterRejection::DuplicateUsername => "Username already exists.",
            RegisterRejection::StorageFailure => "Could not save the new account.",
        }
    }
}

/// Login status holder with login, logout and register operations.
pub struct SessionGate {
    store: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    status: watch::Sender<SessionStatus>,
}

impl SessionGate {
    /// Create a gate in the `Unknown` state. Nothing is read until
    /// [`activate`](Self::activate).
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (status, _) = watch::channel(SessionStatus::Unknown);
        Self {
            store,
            navigator,
            notifier,
            status,
        }
    }

    /// Current in-memory status.
    pub fn status(&self) -> SessionStatus {
        *self.status.borrow()
    }

    /// Subscribe to status changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Read the persisted flag once and settle the status.
    ///
    /// Has no effect once the status has left `Unknown`, so a login that
    /// happened first is never overwritten.
    pub fn activate(&self) -> SessionStatus {
        let persisted = match self.store.get(AUTH_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("Failed to read login flag, assuming logged out: {}", e);
                false
            }
        };
        let settled = if persisted {
            SessionStatus::LoggedIn
        } else {
            SessionStatus::LoggedOut
        };

        let changed = self.status.send_if_modified(|current| {
            if *current == SessionStatus::Unknown {
                *current = settled;
                true
            } else {
                false
            }
        });
        if changed {
            debug!(status = %settled, "Session activated");
        }
        self.status()
    }

    /// Attempt a login.
    ///
    /// Succeeds for the exact admin credential pair or for any registered
    /// username (trimmed, case-insensitive, password ignored).
    pub fn login(&self, username: &str, password: &str) -> bool {
        let is_admin = username == ADMIN_USERNAME && password == ADMIN_PASSWORD;
        let username = username.trim();
        let is_registered = !is_admin && self.find_user(username).is_some();

        if is_admin || is_registered {
            self.persist_login();
            self.set_status(SessionStatus::LoggedIn);
            info!(username, "Login succeeded");
            self.navigator.replace(HOME_PATH);
            self.notifier
                .notify(Notification::info("Login Successful", "Welcome back!"));
            true
        } else {
            self.set_status(SessionStatus::LoggedOut);
            info!(username, "Login rejected");
            self.notifier.notify(Notification::destructive(
                "Login Failed",
                "Invalid username or password.",
            ));
            false
        }
    }

    /// Register a demo account and log it in.
    pub fn register(&self, username: &str, password: &str) -> bool {
        match self.try_register(username, password) {
            Ok(record) => {
                self.persist_login();
                self.set_status(SessionStatus::LoggedIn);
                info!(username = %record.username, "Registered demo account");
                self.navigator.replace(HOME_PATH);
                self.notifier.notify(Notification::info(
                    "Registration Successful",
                    format!("Welcome, {}!", record.username),
                ));
                true
            }
            Err(rejection) => {
                info!(?rejection, "Registration rejected");
                self.notifier.notify(Notification::destructive(
                    "Registration Failed",
                    rejection.message(),
                ));
                false
            }
        }
    }

    fn try_register(
        &self,
        username: &str,
        password: &str,
    ) -> std::result::Result<UserRecord, RegisterRejection> {
        let username = username.trim();
        if username.is_empty() || password.trim().is_empty() {
            return Err(RegisterRejection::EmptyField);
        }
        if username.eq_ignore_ascii_case(ADMIN_USERNAME) {
            return Err(RegisterRejection::ReservedUsername);
        }

        let mut users = self.read_users().map_err(|e| {
            error!("Failed to read user list: {}", e);
            RegisterRejection::StorageFailure
        })?;
        if users
            .iter()
            .any(|u| u.username.eq_ignore_ascii_case(username))
        {
            return Err(RegisterRejection::DuplicateUsername);
        }

        let record = UserRecord {
            username: username.to_string(),
        };
        users.push(record.clone());

        let encoded = serde_json::to_string(&users).map_err(|e| {
            error!("Failed to encode user list: {}", e);
            RegisterRejection::StorageFailure
        })?;
        self.store.set(USERS_KEY, &encoded).map_err(|e| {
            error!("Failed to persist user list: {}", e);
            RegisterRejection::StorageFailure
        })?;

        Ok(record)
    }

    /// Clear the login flag and return to the login page.
    pub fn logout(&self) {
        if let Err(e) = self.store.remove(AUTH_KEY) {
            error!("Failed to clear login flag: {}", e);
        }
        self.set_status(SessionStatus::LoggedOut);
        info!("Logged out");

        if self.navigator.current_path() != LOGIN_PATH {
            self.navigator.replace(LOGIN_PATH);
        }
        self.notifier.notify(Notification::info(
            "Logged Out",
            "You have been successfully logged out.",
        ));
    }

    /// Registered demo accounts, in registration order.
    pub fn users(&self) -> Vec<UserRecord> {
        self.load_users()
    }

    /// A callback suitable for the navigation shell's logout button.
    pub fn logout_handle(self: &Arc<Self>) -> LogoutHandle {
        LogoutHandle {
            gate: Arc::clone(self),
        }
    }

    fn find_user(&self, username: &str) -> Option<UserRecord> {
        self.load_users()
            .into_iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
    }

    fn load_users(&self) -> Vec<UserRecord> {
        self.read_users().unwrap_or_else(|e| {
            warn!("Failed to read user list: {}", e);
            Vec::new()
        })
    }

    /// The stored user list. A malformed list reads as empty; a store error
    /// is returned so callers that write the list back never clobber it.
    fn read_users(&self) -> Result<Vec<UserRecord>> {
        let Some(raw) = self.store.get(USERS_KEY)? else {
            return Ok(Vec::new());
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed user list: {}", e);
            Vec::new()
        }))
    }

    fn persist_login(&self) {
        if let Err(e) = self.store.set(AUTH_KEY, "true") {
            error!("Failed to persist login flag: {}", e);
        }
    }

    fn set_status(&self, status: SessionStatus) {
        self.status.send_if_modified(|current| {
            if *current == status {
                false
            } else {
                *current = status;
                true
            }
        });
    }
}

/// The shell's `onLogout` callback.
#[derive(Clone)]
pub struct LogoutHandle {
    gate: Arc<SessionGate>,
}

impl LogoutHandle {
    pub fn invoke(&self) {
        self.gate.logout();
    }
}

impl std::fmt::Debug for LogoutHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogoutHandle")
            .field("status", &self.gate.status())
            .finish()
    }
}
