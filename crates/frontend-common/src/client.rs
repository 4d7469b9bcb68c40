//! Shared API client for the browser

use crate::auth::{BrowserStore, ToastNotifier, WindowNavigator};
use once_cell::sync::Lazy;
pub use portal_http::client::ClientError;
use portal_http::client::{ApiClient, ClientConfig, SessionManager};
use std::sync::{Arc, Mutex};

/// Global client instance
static API_CLIENT: Lazy<Mutex<Option<ApiClient>>> = Lazy::new(|| Mutex::new(None));

/// Session manager wired to localStorage, toasts and `window.location`
fn browser_session(config: &ClientConfig) -> SessionManager {
    SessionManager::new(
        Arc::new(BrowserStore),
        Arc::new(ToastNotifier),
        Arc::new(WindowNavigator),
    )
    .with_login_path(config.login_path.clone())
    .with_redirect_delay(config.redirect_delay)
}

/// Get the shared client, creating it on first use.
///
/// Every caller shares one redirect guard, so a burst of 401s from different
/// components still produces a single logout.
pub fn api_client() -> Result<ApiClient, ClientError> {
    let mut client_lock = API_CLIENT
        .lock()
        .map_err(|_| ClientError::Configuration("shared client lock poisoned".into()))?;

    if let Some(client) = client_lock.as_ref() {
        return Ok(client.clone());
    }

    let config = ClientConfig::from_build_env();
    let session = Arc::new(browser_session(&config));
    let client = ApiClient::with_session(config, session)?;
    *client_lock = Some(client.clone());
    Ok(client)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn shared_client_is_reused() {
        let first = api_client().unwrap();
        let second = api_client().unwrap();

        assert!(Arc::ptr_eq(first.session(), second.session()));
        assert_eq!(first.config().login_path, "/login");
    }
}
