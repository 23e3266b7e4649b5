//! SessionGate Integration Tests
//!
//! Login, registration and logout against the file-backed store, including
//! state that survives a "reload" (a fresh gate over the same file).

use ai_attorney::session::{FileStore, KeyValueStore, SessionGate, AUTH_KEY, USERS_KEY};
use ai_attorney::shell::{Navigation, Navigator, NotificationLog};
use ai_attorney::types::{AppError, SessionStatus, Severity};
use mockall::mock;
use mockall::predicate::{always, eq};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

struct Tab {
    store: Arc<FileStore>,
    nav: Arc<Navigation>,
    toasts: Arc<NotificationLog>,
    gate: Arc<SessionGate>,
}

/// A fresh page load over the store at `path`.
fn open_tab(path: &Path, page: &str) -> Tab {
    let store = Arc::new(FileStore::open(path).expect("open store"));
    let nav = Arc::new(Navigation::new(page));
    let toasts = Arc::new(NotificationLog::new());
    let gate = Arc::new(SessionGate::new(store.clone(), nav.clone(), toasts.clone()));
    Tab {
        store,
        nav,
        toasts,
        gate,
    }
}

mock! {
    pub Store {}
    impl KeyValueStore for Store {
        fn get(&self, key: &str) -> ai_attorney::types::Result<Option<String>>;
        fn set(&self, key: &str, value: &str) -> ai_attorney::types::Result<()>;
        fn remove(&self, key: &str) -> ai_attorney::types::Result<()>;
    }
}

/// A page load over a scripted store.
fn open_mocked(
    store: MockStore,
    page: &str,
) -> (Arc<Navigation>, Arc<NotificationLog>, SessionGate) {
    let nav = Arc::new(Navigation::new(page));
    let toasts = Arc::new(NotificationLog::new());
    let gate = SessionGate::new(Arc::new(store), nav.clone(), toasts.clone());
    (nav, toasts, gate)
}

fn disk_error() -> AppError {
    AppError::Storage("disk unavailable".to_string())
}

fn store_path(dir: &TempDir) -> std::path::PathBuf {
    dir.path().join("nested").join("session.json")
}

// ============= Login =============

#[test]
fn test_admin_login_persists_across_reload() {
    let dir = TempDir::new().unwrap();
    let tab = open_tab(&store_path(&dir), "/login");
    assert_eq!(tab.gate.activate(), SessionStatus::LoggedOut);

    assert!(tab.gate.login("admin", "password"));
    assert_eq!(tab.gate.status(), SessionStatus::LoggedIn);
    assert_eq!(tab.nav.current_path(), "/");

    let reloaded = open_tab(&store_path(&dir), "/");
    assert_eq!(reloaded.gate.status(), SessionStatus::Unknown);
    assert_eq!(reloaded.gate.activate(), SessionStatus::LoggedIn);
}

#[test]
fn test_failed_login_notifies_and_stays() {
    let dir = TempDir::new().unwrap();
    let tab = open_tab(&store_path(&dir), "/login");

    assert!(!tab.gate.login("admin", "wrong"));
    assert_eq!(tab.gate.status(), SessionStatus::LoggedOut);
    assert_eq!(tab.nav.current_path(), "/login");
    assert_eq!(tab.store.get(AUTH_KEY).unwrap(), None);

    let toasts = tab.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].severity, Severity::Destructive);
    assert_eq!(toasts[0].title, "Login Failed");
    assert_eq!(toasts[0].message, "Invalid username or password.");
}

#[test]
fn test_admin_pair_must_match_exactly() {
    let dir = TempDir::new().unwrap();
    let tab = open_tab(&store_path(&dir), "/login");

    assert!(!tab.gate.login(" admin", "password"));
    assert!(!tab.gate.login("admin ", "password"));
    assert!(!tab.gate.login("Admin", "password"));
    assert!(!tab.gate.login("admin", " password"));
    assert_eq!(tab.store.get(AUTH_KEY).unwrap(), None);
    assert_eq!(tab.nav.current_path(), "/login");
}

#[test]
fn test_registered_username_is_trimmed_on_login() {
    let dir = TempDir::new().unwrap();
    let tab = open_tab(&store_path(&dir), "/register");
    assert!(tab.gate.register("  alice ", "x"));
    assert_eq!(tab.gate.users()[0].username, "alice");
    tab.gate.logout();

    assert!(tab.gate.login(" alice  ", "anything"));
}

// ============= Registration =============

#[test]
fn test_registration_rules() {
    let dir = TempDir::new().unwrap();
    let tab = open_tab(&store_path(&dir), "/register");
    tab.gate.activate();

    assert!(!tab.gate.register("admin", "x"));
    assert_eq!(tab.store.get(USERS_KEY).unwrap(), None);

    assert!(tab.gate.register("alice", "x"));
    assert!(!tab.gate.register("alice", "y"));
    assert!(!tab.gate.register("Alice", "z"));

    let titles: Vec<_> = tab.toasts.drain().into_iter().map(|n| n.title).collect();
    assert_eq!(
        titles,
        vec![
            "Registration Failed",
            "Registration Successful",
            "Registration Failed",
            "Registration Failed"
        ]
    );
}

#[test]
fn test_rejected_registration_does_not_mutate() {
    let dir = TempDir::new().unwrap();
    let tab = open_tab(&store_path(&dir), "/register");
    tab.gate.activate();

    assert!(!tab.gate.register("", "secret"));
    assert!(!tab.gate.register("bob", "   "));
    assert_eq!(tab.gate.status(), SessionStatus::LoggedOut);
    assert_eq!(tab.nav.current_path(), "/register");
    assert!(!store_path(&dir).exists());
}

#[test]
fn test_registered_user_logs_in_after_reload() {
    let dir = TempDir::new().unwrap();
    let tab = open_tab(&store_path(&dir), "/register");
    assert!(tab.gate.register("alice", "x"));
    assert_eq!(tab.gate.status(), SessionStatus::LoggedIn);
    assert_eq!(tab.store.get(AUTH_KEY).unwrap().as_deref(), Some("true"));
    tab.gate.logout();

    let reloaded = open_tab(&store_path(&dir), "/login");
    assert_eq!(reloaded.gate.activate(), SessionStatus::LoggedOut);
    assert!(reloaded.gate.login("alice", "anything"));
    assert_eq!(reloaded.gate.users().len(), 1);
}

// ============= Logout =============

#[test]
fn test_logout_clears_flag() {
    let dir = TempDir::new().unwrap();
    let tab = open_tab(&store_path(&dir), "/login");
    assert!(tab.gate.login("admin", "password"));
    tab.toasts.drain();

    tab.gate.logout();
    assert!(!tab.gate.status().is_logged_in());
    assert_eq!(tab.store.get(AUTH_KEY).unwrap(), None);
    assert_eq!(tab.nav.current_path(), "/login");

    let toasts = tab.toasts.drain();
    assert_eq!(toasts[0].title, "Logged Out");
    assert_eq!(toasts[0].severity, Severity::Info);

    let reloaded = open_tab(&store_path(&dir), "/");
    assert_eq!(reloaded.gate.activate(), SessionStatus::LoggedOut);
}

#[test]
fn test_status_changes_are_published() {
    let dir = TempDir::new().unwrap();
    let tab = open_tab(&store_path(&dir), "/login");
    let mut rx = tab.gate.subscribe();

    tab.gate.activate();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), SessionStatus::LoggedOut);

    // Failed login keeps LoggedOut: no change to publish
    tab.gate.login("nobody", "x");
    assert!(!rx.has_changed().unwrap());

    tab.gate.login("admin", "password");
    assert_eq!(*rx.borrow_and_update(), SessionStatus::LoggedIn);
}

#[test]
fn test_corrupt_store_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(FileStore::open(&path).is_err());
}

// ============= Store Failures =============

#[test]
fn test_unwritable_store_rejects_registration_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();
    let tab = open_tab(&blocker.join("session.json"), "/register");
    tab.gate.activate();

    assert!(!tab.gate.register("alice", "x"));
    assert!(tab.gate.users().is_empty());
    assert_eq!(tab.gate.status(), SessionStatus::LoggedOut);
    assert_eq!(tab.nav.current_path(), "/register");

    // Still a storage failure, not a duplicate
    assert!(!tab.gate.register("alice", "y"));
    let messages: Vec<_> = tab.toasts.drain().into_iter().map(|n| n.message).collect();
    assert_eq!(
        messages,
        vec!["Could not save the new account.", "Could not save the new account."]
    );

    assert!(!tab.gate.login("alice", "z"));
    assert_eq!(tab.gate.status(), SessionStatus::LoggedOut);
}

#[test]
fn test_flag_read_error_counts_as_logged_out() {
    let mut store = MockStore::new();
    store
        .expect_get()
        .with(eq(AUTH_KEY))
        .times(1)
        .returning(|_| Err(disk_error()));

    let (_, _, gate) = open_mocked(store, "/");
    assert_eq!(gate.activate(), SessionStatus::LoggedOut);
    // Settled: no second read
    assert_eq!(gate.activate(), SessionStatus::LoggedOut);
}

#[test]
fn test_user_list_write_error_fails_registration() {
    let mut store = MockStore::new();
    store
        .expect_get()
        .with(eq(USERS_KEY))
        .returning(|_| Ok(Some(r#"[{"username":"bob"}]"#.to_string())));
    store
        .expect_set()
        .with(eq(USERS_KEY), always())
        .times(1)
        .returning(|_, _| Err(disk_error()));

    let (nav, toasts, gate) = open_mocked(store, "/register");
    assert!(!gate.register("alice", "x"));
    assert_eq!(gate.status(), SessionStatus::Unknown);
    assert_eq!(nav.current_path(), "/register");

    let toasts = toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].severity, Severity::Destructive);
    assert_eq!(toasts[0].title, "Registration Failed");
    assert_eq!(toasts[0].message, "Could not save the new account.");
}

#[test]
fn test_user_list_read_error_never_overwrites_the_list() {
    let mut store = MockStore::new();
    store
        .expect_get()
        .with(eq(USERS_KEY))
        .returning(|_| Err(disk_error()));
    store.expect_set().never();

    let (_, toasts, gate) = open_mocked(store, "/register");
    assert!(!gate.register("alice", "x"));
    assert_eq!(toasts.drain()[0].message, "Could not save the new account.");
}

#[test]
fn test_flag_write_error_still_logs_in() {
    let mut store = MockStore::new();
    store
        .expect_set()
        .with(eq(AUTH_KEY), eq("true"))
        .times(1)
        .returning(|_, _| Err(disk_error()));

    let (nav, toasts, gate) = open_mocked(store, "/login");
    assert!(gate.login("admin", "password"));
    assert_eq!(gate.status(), SessionStatus::LoggedIn);
    assert_eq!(nav.current_path(), "/");
    assert_eq!(toasts.drain()[0].title, "Login Successful");
}

#[test]
fn test_flag_remove_error_still_logs_out() {
    let mut store = MockStore::new();
    store
        .expect_set()
        .with(eq(AUTH_KEY), eq("true"))
        .returning(|_, _| Ok(()));
    store
        .expect_remove()
        .with(eq(AUTH_KEY))
        .times(1)
        .returning(|_| Err(disk_error()));

    let (nav, toasts, gate) = open_mocked(store, "/");
    assert!(gate.login("admin", "password"));
    toasts.drain();

    gate.logout();
    assert_eq!(gate.status(), SessionStatus::LoggedOut);
    assert_eq!(nav.current_path(), "/login");
    assert_eq!(toasts.drain()[0].title, "Logged Out");
}
