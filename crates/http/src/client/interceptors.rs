//! Request and response hooks applied by [`super::ApiClient`]
//!
//! Both hooks are plain functions so they can be exercised without a network.

use super::context::TokenProvider;
use super::error::ClientError;
use super::session::SessionManager;
use reqwest::header::{AUTHORIZATION, HeaderValue};

/// Message shown when the server reports the session was superseded
pub const SESSION_INVALIDATED_MESSAGE: &str =
    "Your session has been invalidated because another user logged into this account.";

/// Request path fragment identifying login attempts
const LOGIN_ENDPOINT: &str = "/auth/login";

/// Attach the stored bearer token, if any, to an outgoing request.
///
/// The token is read on every call so a login or logout elsewhere takes effect
/// on the next request.
pub fn on_request<P>(mut request: reqwest::Request, tokens: &P) -> reqwest::Request
where
    P: TokenProvider + ?Sized,
{
    let Some(token) = tokens.token().filter(|token| !token.is_empty()) else {
        return request;
    };

    match HeaderValue::from_str(&format!("Bearer {token}")) {
        Ok(mut value) => {
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        Err(e) => {
            tracing::warn!(error = %e, "stored auth token is not a valid header value, sending without it");
        }
    }

    request
}

/// Whether the page at `path` is part of the login flow.
///
/// `login_path` is the configured redirect target; it always counts as a login
/// page so a 401 there cannot send the browser back to itself.
pub fn is_login_page(path: &str, login_path: &str) -> bool {
    path == login_path || path == "/login" || path == "/"
}

/// Whether `url` targets the login endpoint
pub fn is_login_attempt(url: &str) -> bool {
    url.contains(LOGIN_ENDPOINT)
}

/// Inspect a failed call and tear the session down when it expired.
///
/// The error is always handed back unchanged; callers must still return it as
/// `Err` so their own error handling runs.
pub fn on_response_error(error: ClientError, session: &SessionManager) -> ClientError {
    if !error.is_auth_expired() || session.is_redirecting() {
        return error;
    }

    let current_path = session.navigator().current_path();
    let request_url = error.url().unwrap_or_default();

    if is_login_page(&current_path, session.login_path()) || is_login_attempt(request_url) {
        if error.is_session_invalid() {
            session.notifier().show_error(SESSION_INVALIDATED_MESSAGE);
        }
        tracing::debug!(
            path = %current_path,
            url = request_url,
            "401 during login flow, leaving session untouched"
        );
        return error;
    }

    // Guard first: at most one notification per redirect, even across threads.
    if session.try_begin_redirect() {
        if error.is_session_invalid() {
            session.notifier().show_error(SESSION_INVALIDATED_MESSAGE);
        }
        tracing::warn!(
            path = %current_path,
            url = request_url,
            "session expired, clearing stored credentials and redirecting to login"
        );
        session.force_logout();
        session.schedule_redirect();
    }

    error
}
