//! Global toast handler
//!
//! The UI registers a callback that renders toasts; the API client reports
//! through [`ToastNotifier`] without knowing which component shows them.

use portal_http::client::Notifier;
use std::cell::RefCell;
use std::rc::Rc;

thread_local! {
    /// Global toast callback
    static TOAST_CALLBACK: RefCell<Option<Rc<dyn Fn(&str)>>> = RefCell::new(None);
}

/// Set the global toast callback
pub fn set_toast_callback(callback: Rc<dyn Fn(&str)>) {
    TOAST_CALLBACK.with(|cb| {
        *cb.borrow_mut() = Some(callback);
    });
}

/// Clear the toast callback
pub fn clear_toast_callback() {
    TOAST_CALLBACK.with(|cb| {
        *cb.borrow_mut() = None;
    });
}

/// Show an error toast, or log it when no UI has registered
pub fn show_error(message: &str) {
    // Clone out of the cell so the callback may re-register itself
    let callback = TOAST_CALLBACK.with(|cb| cb.borrow().clone());
    match callback {
        Some(callback) => callback(message),
        None => tracing::error!("{message}"),
    }
}

/// [`Notifier`] that forwards to the global toast handler
#[derive(Debug, Default, Clone, Copy)]
pub struct ToastNotifier;

impl Notifier for ToastNotifier {
    fn show_error(&self, message: &str) {
        show_error(message);
    }
}
