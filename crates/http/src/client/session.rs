//! Session teardown and the redirect guard
//!
//! Several requests can fail with 401 at almost the same moment. Only the
//! first one to win [`SessionManager::try_begin_redirect`] clears the stored
//! session and schedules the trip to the login page; the guard is never reset
//! because the navigation discards the whole page.

use super::config::{DEFAULT_LOGIN_PATH, DEFAULT_REDIRECT_DELAY};
use super::context::{
    AUTH_TOKEN_KEY, LogNotifier, MemoryStore, Navigator, Notifier, SessionStore, StaticNavigator,
    USER_PROFILE_KEY,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Owns the redirect guard and the collaborators used during a forced logout
pub struct SessionManager {
    redirecting: AtomicBool,
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
    redirect_delay: Duration,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            redirecting: AtomicBool::new(false),
            store,
            notifier,
            navigator,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
        }
    }

    /// Override the login page path
    pub fn with_login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }

    /// Override the delay before navigating to the login page
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    /// Atomically claim the redirect. Returns `true` for exactly one caller.
    pub fn try_begin_redirect(&self) -> bool {
        self.redirecting
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn is_redirecting(&self) -> bool {
        self.redirecting.load(Ordering::Acquire)
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn redirect_delay(&self) -> Duration {
        self.redirect_delay
    }

    /// Remove the persisted token and profile
    pub fn force_logout(&self) {
        self.store.remove(AUTH_TOKEN_KEY);
        self.store.remove(USER_PROFILE_KEY);
    }

    /// Navigate to the login page once the redirect delay has passed.
    ///
    /// The navigation is never cancelled once scheduled.
    pub fn schedule_redirect(&self) {
        let navigator = Arc::clone(&self.navigator);
        let path = self.login_path.clone();
        schedule(self.redirect_delay, move || navigator.navigate(&path));
    }
}

/// In-memory store, log-only notifier and a headless navigator that is not on a login page
impl Default for SessionManager {
    fn default() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(LogNotifier),
            Arc::new(StaticNavigator::default()),
        )
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("redirecting", &self.is_redirecting())
            .field("login_path", &self.login_path)
            .field("redirect_delay", &self.redirect_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn schedule(delay: Duration, task: impl FnOnce() + Send + 'static) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(async move {
                tokio::time::sleep(delay).await;
                task();
            });
        }
        Err(_) => {
            tracing::warn!("no async runtime available, navigating without delay");
            task();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn schedule(delay: Duration, task: impl FnOnce() + 'static) {
    let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
    gloo_timers::callback::Timeout::new(millis, task).forget();
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::client::context::mock::MockNavigator;

    fn manager_with(store: Arc<MemoryStore>, navigator: Arc<dyn Navigator>) -> SessionManager {
        SessionManager::new(store, Arc::new(LogNotifier), navigator)
    }

    #[test]
    fn guard_is_claimed_once() {
        let session = SessionManager::default();
        assert!(!session.is_redirecting());

        assert!(session.try_begin_redirect());
        assert!(session.is_redirecting());
        assert!(!session.try_begin_redirect());
        assert!(!session.try_begin_redirect());
    }

    #[test]
    fn guard_is_claimed_once_across_threads() {
        let session = Arc::new(SessionManager::default());

        let winners: usize = (0..16)
            .map(|_| {
                let session = Arc::clone(&session);
                std::thread::spawn(move || session.try_begin_redirect())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|handle| usize::from(handle.join().unwrap()))
            .sum();

        assert_eq!(winners, 1);
    }

    #[test]
    fn force_logout_clears_token_and_profile_only() {
        let store = Arc::new(MemoryStore::with_token("secret"));
        store.set(USER_PROFILE_KEY, "{}");
        store.set("theme", "dark");

        let session = manager_with(store.clone(), Arc::new(StaticNavigator::default()));
        session.force_logout();

        assert_eq!(store.get(AUTH_TOKEN_KEY), None);
        assert_eq!(store.get(USER_PROFILE_KEY), None);
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }

    #[tokio::test(start_paused = true)]
    async fn redirect_waits_for_delay() {
        let navigator = Arc::new(StaticNavigator::new("/courses"));
        let session = manager_with(Arc::new(MemoryStore::new()), navigator.clone());

        session.schedule_redirect();
        tokio::task::yield_now().await;
        assert!(navigator.navigations().is_empty());

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert!(navigator.navigations().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(navigator.navigations(), vec!["/login".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn redirect_uses_configured_path() {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate()
            .withf(|path| path == "/signin")
            .times(1)
            .return_const(());

        let session = manager_with(Arc::new(MemoryStore::new()), Arc::new(navigator))
            .with_login_path("/signin")
            .with_redirect_delay(Duration::from_millis(10));

        session.schedule_redirect();
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    #[test]
    fn redirect_without_runtime_navigates_immediately() {
        let navigator = Arc::new(StaticNavigator::new("/courses"));
        let session = manager_with(Arc::new(MemoryStore::new()), navigator.clone());

        session.schedule_redirect();
        assert_eq!(navigator.navigations(), vec!["/login".to_string()]);
    }
}
