//! Client configuration

use std::time::Duration;

/// Default gateway base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default gateway path
pub const DEFAULT_API_PATH: &str = "api";

/// Client configuration for connecting to the store gateway
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CAFE_API_URL | http://localhost:8080 | Gateway base URL |
/// | CAFE_API_PATH | api | Dispatch path under the base URL |
/// | CAFE_API_TIMEOUT_SECS | 30 | Request timeout |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://script.example.com/macros/s/XYZ")
    pub base_url: String,

    /// Dispatch path appended to the base URL
    pub api_path: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: DEFAULT_API_PATH.to_string(),
            timeout: 30,
        }
    }

    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let base_url = std::env::var("CAFE_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let mut config = Self::new(base_url);
        if let Ok(path) = std::env::var("CAFE_API_PATH") {
            config.api_path = path;
        }
        if let Some(timeout) = std::env::var("CAFE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = timeout;
        }
        config
    }

    /// Set the dispatch path
    pub fn with_api_path(mut self, path: impl Into<String>) -> Self {
        self.api_path = path.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Request timeout as a `Duration`
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// Full dispatch endpoint, e.g. `http://localhost:8080/api`
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.api_path.trim_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Create a network gateway from this configuration
    pub fn build_gateway(&self) -> crate::ClientResult<crate::NetworkGateway> {
        crate::NetworkGateway::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_path() {
        let config = ClientConfig::new("http://store.local/");
        assert_eq!(config.endpoint(), "http://store.local/api");

        let config = ClientConfig::new("https://script.example.com/exec").with_api_path("");
        assert_eq!(config.endpoint(), "https://script.example.com/exec");

        let config = ClientConfig::new("http://h").with_api_path("/v1/api/");
        assert_eq!(config.endpoint(), "http://h/v1/api");
    }

    #[test]
    fn test_builder_timeout() {
        let config = ClientConfig::default().with_timeout(5);
        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }
}
