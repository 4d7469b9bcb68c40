//! Portal API client
//!
//! [`ApiClient`] wraps a `reqwest` client bound to one base URL. Every request
//! goes through [`interceptors::on_request`] before it is sent and every
//! failure through [`interceptors::on_response_error`] before it reaches the
//! caller.

pub mod config;
pub mod context;
pub mod error;
pub mod interceptors;
pub mod session;

pub use config::{ClientConfig, resolve_base_url};
pub use context::{Navigator, Notifier, SessionStore, TokenProvider};
pub use error::ClientError;
pub use session::SessionManager;

use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Shared HTTP client for the portal API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    config: Arc<ClientConfig>,
    session: Arc<SessionManager>,
}

impl ApiClient {
    /// Create a client with in-memory session state.
    ///
    /// The headless navigator starts outside any login page, so a 401 still
    /// clears the in-memory session; it just records the redirect.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Self::with_session(config, Arc::new(SessionManager::default()))
    }

    /// Create a client sharing an existing session manager
    pub fn with_session(
        config: ClientConfig,
        session: Arc<SessionManager>,
    ) -> Result<Self, ClientError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_str(&config.content_type)
                .map_err(|e| ClientError::Configuration(format!("invalid content type: {e}")))?,
        );

        let mut client_builder = ClientBuilder::new()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str());

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = config.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        let client = client_builder.build()?;

        tracing::info!(
            base_url = %config.base_url,
            content_type = %config.content_type,
            "API client configured"
        );

        Ok(Self {
            client,
            config: Arc::new(config),
            session,
        })
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Create a request builder for `path` relative to the base URL.
    ///
    /// The bearer token is attached when the request is sent, not here.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        self.client.request(method, url)
    }

    /// Send a request through both interceptors
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        self.dispatch(request)
            .await
            .map_err(|error| interceptors::on_response_error(error, &self.session))
    }

    /// Send a request and decode the JSON body
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = request.build()?;
        let request = interceptors::on_request(request, self.session.store().as_ref());

        tracing::debug!(method = %request.method(), url = %request.url(), "sending request");

        let response = self.client.execute(request).await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let url = response.url().to_string();
            let text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(error = %e, %status, "failed to read error response body");
                    String::new()
                }
            };
            Err(ClientError::from_response_parts(status, url, text))
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::GET, path)).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PATCH, path).json(body)).await
    }

    /// Delete a resource, ignoring any response body
    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("config", &self.config)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    login_path: Option<String>,
    redirect_delay: Option<Duration>,
    store: Option<Arc<dyn SessionStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    navigator: Option<Arc<dyn Navigator>>,
}

impl ApiClientBuilder {
    /// Set the base URL. Unset or blank falls back to the default.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = Some(path.into());
        self
    }

    pub fn redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = Some(delay);
        self
    }

    pub fn store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Resolve the configuration this builder describes
    pub fn config(&self) -> ClientConfig {
        let defaults = ClientConfig::with_base_url(self.base_url.as_deref());
        ClientConfig {
            timeout: self.timeout.or(defaults.timeout),
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
            login_path: self.login_path.clone().unwrap_or(defaults.login_path),
            redirect_delay: self.redirect_delay.unwrap_or(defaults.redirect_delay),
            ..defaults
        }
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let config = self.config();
        let fallback = SessionManager::default();

        let session = SessionManager::new(
            self.store.unwrap_or_else(|| Arc::clone(fallback.store())),
            self.notifier.unwrap_or_else(|| Arc::clone(fallback.notifier())),
            self.navigator.unwrap_or_else(|| Arc::clone(fallback.navigator())),
        )
        .with_login_path(config.login_path.clone())
        .with_redirect_delay(config.redirect_delay);

        ApiClient::with_session(config, Arc::new(session))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let client = ApiClient::builder().build().unwrap();
        assert_eq!(client.base_url(), "http://localhost:3008");
        assert_eq!(client.config().content_type, "application/json");
        assert_eq!(client.session().login_path(), "/login");
        assert_eq!(client.session().redirect_delay(), Duration::from_millis(100));
    }

    #[test]
    fn builder_overrides() {
        let client = ApiClient::builder()
            .base_url("https://portal.example.edu/")
            .login_path("/signin")
            .redirect_delay(Duration::from_millis(5))
            .timeout(Duration::from_secs(3))
            .build()
            .unwrap();

        assert_eq!(client.base_url(), "https://portal.example.edu");
        assert_eq!(client.config().timeout, Some(Duration::from_secs(3)));
        assert_eq!(client.session().login_path(), "/signin");
        assert_eq!(client.session().redirect_delay(), Duration::from_millis(5));
    }

    #[test]
    fn request_joins_base_url() {
        let client = ApiClient::new(ClientConfig::with_base_url(Some("http://api.test"))).unwrap();
        let request = client.request(Method::GET, "/api/me").build().unwrap();
        assert_eq!(request.url().as_str(), "http://api.test/api/me");
    }

    #[test]
    fn invalid_content_type_is_rejected() {
        let config = ClientConfig {
            content_type: "application/json\n".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            ApiClient::new(config),
            Err(ClientError::Configuration(_))
        ));
    }
}
