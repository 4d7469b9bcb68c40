//! localStorage-backed session store

use gloo::storage::{LocalStorage, Storage};
use portal_http::client::SessionStore;

/// Session store over the browser's `localStorage`.
///
/// Values are kept as raw strings, not JSON, so entries written by other parts
/// of the page are read back unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserStore;

impl SessionStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = LocalStorage::raw().set_item(key, value) {
            tracing::warn!("failed to write {key} to localStorage: {e:?}");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(e) = LocalStorage::raw().remove_item(key) {
            tracing::warn!("failed to remove {key} from localStorage: {e:?}");
        }
    }
}
