//! Portal HTTP client
//!
//! A shared API client that attaches the stored bearer token to every request
//! and tears the session down when the server answers 401 outside the login
//! flow.

pub mod client;

pub use client::{ApiClient, ApiClientBuilder, ClientConfig, ClientError, SessionManager};
