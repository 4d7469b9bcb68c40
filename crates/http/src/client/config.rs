//! Client configuration
//!
//! The base URL is resolved once, explicit override first and the local
//! development server otherwise, and then frozen into a [`ClientConfig`].

#[cfg(not(target_arch = "wasm32"))]
use super::ClientError;
use std::time::Duration;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "API_URL";

/// Base URL used when nothing overrides it
pub const DEFAULT_API_URL: &str = "http://localhost:3008";

/// Content type sent with every request
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Page the browser is sent to after a forced logout
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Delay between the forced logout and the navigation
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(100);

const DEFAULT_USER_AGENT: &str = "portal-client/0.1.0";

/// Pick the base URL: the explicit override when it is set, otherwise the default.
///
/// Blank overrides count as unset and trailing slashes are dropped so paths can
/// be appended directly.
pub fn resolve_base_url(override_url: Option<&str>) -> String {
    override_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}

/// Immutable settings for [`super::ApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub content_type: String,
    /// Where to send the browser once the session is torn down
    pub login_path: String,
    pub redirect_delay: Duration,
    /// Ignored on wasm32, where the browser owns request timeouts
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: resolve_base_url(None),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at `base_url`, everything else defaulted
    pub fn with_base_url(base_url: Option<&str>) -> Self {
        Self {
            base_url: resolve_base_url(base_url),
            ..Self::default()
        }
    }

    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be read into configuration
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_environment(::config::Environment::default())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn from_environment(source: ::config::Environment) -> Result<Self, ClientError> {
        let settings = ::config::Config::builder()
            .add_source(source)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        let api_url = settings.get_string(&API_URL_ENV.to_lowercase()).ok();

        Ok(Self::with_base_url(api_url.as_deref()))
    }

    /// Configuration baked in at build time, the way bundlers inject `API_URL`
    pub fn from_build_env() -> Self {
        Self::with_base_url(option_env!("API_URL"))
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> ::config::Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ::config::Environment::default().source(Some(map))
    }

    #[test]
    fn override_wins_over_default() {
        assert_eq!(
            resolve_base_url(Some("https://api.example.com")),
            "https://api.example.com"
        );
        assert_eq!(resolve_base_url(None), "http://localhost:3008");
    }

    #[test]
    fn blank_override_falls_back() {
        assert_eq!(resolve_base_url(Some("")), DEFAULT_API_URL);
        assert_eq!(resolve_base_url(Some("   ")), DEFAULT_API_URL);
    }

    #[test]
    fn trailing_slash_trimmed() {
        assert_eq!(
            resolve_base_url(Some("https://api.example.com/v2/")),
            "https://api.example.com/v2"
        );
    }

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3008");
        assert_eq!(config.content_type, "application/json");
        assert_eq!(config.login_path, "/login");
        assert_eq!(config.redirect_delay, Duration::from_millis(100));
    }

    #[test]
    fn reads_api_url_from_environment() {
        let config =
            ClientConfig::from_environment(env(&[("API_URL", "http://10.0.0.5:3009")])).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:3009");
    }

    #[test]
    fn missing_api_url_uses_default() {
        let config = ClientConfig::from_environment(env(&[("OTHER", "x")])).unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
    }
}
