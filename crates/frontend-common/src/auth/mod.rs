//! Browser-side session collaborators

pub mod navigation;
pub mod storage;
pub mod toast;

// Re-export commonly used items
pub use navigation::WindowNavigator;
pub use storage::BrowserStore;
pub use toast::{clear_toast_callback, set_toast_callback, show_error, ToastNotifier};
