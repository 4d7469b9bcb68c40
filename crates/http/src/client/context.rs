//! Collaborators the client depends on: persisted session state, the
//! notification surface and page navigation.
//!
//! Browser builds plug in localStorage and `window.location`; native builds and
//! tests use the in-memory versions below.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

/// Storage key holding the bearer credential
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Storage key holding the serialized user profile
pub const USER_PROFILE_KEY: &str = "user_profile";

/// Persistent key-value storage for session state
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Source of the bearer token attached to outgoing requests
pub trait TokenProvider {
    fn token(&self) -> Option<String>;
}

impl<S: SessionStore + ?Sized> TokenProvider for S {
    fn token(&self) -> Option<String> {
        self.get(AUTH_TOKEN_KEY)
    }
}

/// User-visible notification surface. Calls must not block.
pub trait Notifier: Send + Sync {
    fn show_error(&self, message: &str);
}

/// Page location and full-page navigation
pub trait Navigator: Send + Sync {
    /// Path of the page currently displayed, e.g. `/dashboard`
    fn current_path(&self) -> String;

    /// Leave the current page for `path`
    fn navigate(&self, path: &str);
}

/// In-memory session store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with an auth token
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set(AUTH_TOKEN_KEY, &token.into());
        store
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

/// Notifier that only writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show_error(&self, message: &str) {
        tracing::warn!(message, "user notification");
    }
}

/// Navigator for environments without a browser.
///
/// The current path is set explicitly and navigations are recorded instead of
/// performed. The default starts on no page at all (an empty path), which is
/// not a login page, so expired sessions are still torn down.
#[derive(Debug)]
pub struct StaticNavigator {
    path: RwLock<String>,
    visited: Mutex<Vec<String>>,
}

impl StaticNavigator {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: RwLock::new(path.into()),
            visited: Mutex::new(Vec::new()),
        }
    }

    pub fn set_path(&self, path: impl Into<String>) {
        if let Ok(mut current) = self.path.write() {
            *current = path.into();
        }
    }

    /// Every path passed to [`Navigator::navigate`], oldest first
    pub fn navigations(&self) -> Vec<String> {
        self.visited
            .lock()
            .map(|visited| visited.clone())
            .unwrap_or_default()
    }
}

impl Default for StaticNavigator {
    fn default() -> Self {
        Self::new("")
    }
}

impl Navigator for StaticNavigator {
    fn current_path(&self) -> String {
        self.path
            .read()
            .map(|path| path.clone())
            .unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(path.to_string());
        }
        self.set_path(path);
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub Notifier {}

        impl Notifier for Notifier {
            fn show_error(&self, message: &str);
        }
    }

    mock! {
        pub Navigator {}

        impl Navigator for Navigator {
            fn current_path(&self) -> String;
            fn navigate(&self, path: &str);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.set(AUTH_TOKEN_KEY, "abc");
        store.set(USER_PROFILE_KEY, r#"{"name":"Ada"}"#);
        assert_eq!(store.get(AUTH_TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(store.len(), 2);

        store.remove(AUTH_TOKEN_KEY);
        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn token_provider_reads_auth_token_key() {
        let store = MemoryStore::new();
        assert_eq!(store.token(), None);

        store.set(AUTH_TOKEN_KEY, "tok-1");
        assert_eq!(store.token().as_deref(), Some("tok-1"));

        let dyn_store: &dyn SessionStore = &store;
        assert_eq!(dyn_store.token().as_deref(), Some("tok-1"));
    }

    #[test]
    fn default_navigator_is_not_on_a_page() {
        assert_eq!(StaticNavigator::default().current_path(), "");
    }

    #[test]
    fn static_navigator_records_navigation() {
        let navigator = StaticNavigator::new("/dashboard");
        assert_eq!(navigator.current_path(), "/dashboard");

        navigator.navigate("/login");
        assert_eq!(navigator.current_path(), "/login");
        assert_eq!(navigator.navigations(), vec!["/login".to_string()]);
    }
}
