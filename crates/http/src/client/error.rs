//! Client error types

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Error code the backend sends when a newer login superseded the session
pub const SESSION_INVALID_CODE: &str = "SESSION_INVALID";

/// JSON error payload returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorBody {
    /// Machine-readable error code, e.g. `SESSION_INVALID`
    pub code: Option<String>,

    /// `message`, or `error` when the backend only sends that
    pub message: Option<String>,
}

impl ErrorBody {
    /// Read the known fields out of a response body.
    ///
    /// Each field is picked independently so unexpected or malformed siblings
    /// never hide `code`. Bodies that are not JSON objects yield the default.
    pub fn parse(text: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(text) else {
            return Self::default();
        };

        let field = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);

        Self {
            code: field("code"),
            message: field("message").or_else(|| field("error")),
        }
    }
}

/// A non-success response, kept with enough context to decide on a redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: u16,
    /// URL of the originating request
    pub url: String,
    pub body: ErrorBody,
    /// Raw response text, or the canonical status reason when the body was empty
    pub message: String,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.body.message.as_deref().unwrap_or(&self.message);
        write!(f, "{message} ({})", self.url)
    }
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error status
    #[error("Server error {}: {}", .0.status, .0)]
    ServerError(ApiFailure),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(ApiFailure),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(ApiFailure),

    /// Bad request
    #[error("Bad request: {0}")]
    BadRequest(ApiFailure),

    /// Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(ApiFailure),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Create an error from the parts of a failed response
    pub fn from_response_parts(status: reqwest::StatusCode, url: String, text: String) -> Self {
        let body = ErrorBody::parse(&text);
        let message = if text.is_empty() {
            status.to_string()
        } else {
            text
        };

        let failure = ApiFailure {
            status: status.as_u16(),
            url,
            body,
            message,
        };

        match failure.status {
            400 => Self::BadRequest(failure),
            401 => Self::AuthenticationFailed(failure),
            403 => Self::Forbidden(failure),
            404 => Self::NotFound(failure),
            _ => Self::ServerError(failure),
        }
    }

    /// The failed response, if the server answered at all
    pub fn failure(&self) -> Option<&ApiFailure> {
        match self {
            Self::ServerError(failure)
            | Self::AuthenticationFailed(failure)
            | Self::NotFound(failure)
            | Self::BadRequest(failure)
            | Self::Forbidden(failure) => Some(failure),
            Self::Request(_) | Self::Serialization(_) | Self::Configuration(_) => None,
        }
    }

    /// HTTP status of the failed response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request(err) => err.status().map(|status| status.as_u16()),
            _ => self.failure().map(|failure| failure.status),
        }
    }

    /// Error code from the response payload
    pub fn code(&self) -> Option<&str> {
        self.failure()?.body.code.as_deref()
    }

    /// URL of the request that failed
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Request(err) => err.url().map(reqwest::Url::as_str),
            _ => self.failure().map(|failure| failure.url.as_str()),
        }
    }

    /// Whether the server rejected the credentials (HTTP 401)
    pub fn is_auth_expired(&self) -> bool {
        self.status() == Some(401)
    }

    /// Whether the server reports the session was taken over by another login
    pub fn is_session_invalid(&self) -> bool {
        self.is_auth_expired() && self.code() == Some(SESSION_INVALID_CODE)
    }
}
