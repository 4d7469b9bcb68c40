//! Navigation through `window.location`

use portal_http::client::Navigator;

/// Navigator backed by the page's `window.location`
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowNavigator;

impl Navigator for WindowNavigator {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|window| window.location().pathname().ok())
            .unwrap_or_default()
    }

    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            tracing::error!("no window available, cannot navigate to {path}");
            return;
        };

        if let Err(e) = window.location().set_href(path) {
            tracing::error!("navigation to {path} failed: {e:?}");
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn current_path_is_absolute() {
        assert!(WindowNavigator.current_path().starts_with('/'));
    }
}
