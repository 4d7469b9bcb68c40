pub mod auth;
pub mod client;
pub mod logging;

pub use auth::{BrowserStore, ToastNotifier, WindowNavigator};
pub use client::api_client;
pub use logging::init_logging;
