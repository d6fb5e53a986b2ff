//! Client configuration

use crate::error::{ClientError, Result};
use crate::token::REFRESH_THRESHOLD;
use std::time::Duration;

/// Environment variable overriding the API host. `/api` is appended to it.
pub const BASE_URL_ENV: &str = "TOUR_ADMIN_API_BASE_URL";

/// Production API used when no override is configured
pub const DEFAULT_BASE_URL: &str = "https://nataliakuiava.com/api";

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every request path is appended to (e.g. `https://host/api`)
    pub base_url: String,

    /// Refresh the access token when it has this much validity left.
    /// Default: 5 minutes
    pub refresh_threshold: Duration,

    /// Upper bound on a refresh call. Hitting it counts as a failed refresh.
    /// Default: 10 seconds
    pub refresh_timeout: Duration,

    /// Timeout applied to every other request.
    /// Default: 30 seconds
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            refresh_threshold: REFRESH_THRESHOLD,
            refresh_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Resolve the base URL from [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`]
    pub fn from_env() -> Self {
        Self::from_override(std::env::var(BASE_URL_ENV).ok().as_deref())
    }

    fn from_override(host: Option<&str>) -> Self {
        match host.map(str::trim).filter(|h| !h.is_empty()) {
            Some(host) => Self::new(format!("{}/api", host.trim_end_matches('/'))),
            None => Self::new(DEFAULT_BASE_URL),
        }
    }

    pub fn with_refresh_threshold(mut self, threshold: Duration) -> Self {
        self.refresh_threshold = threshold;
        self
    }

    pub fn with_refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL for an API path such as `/places/1`
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.base_url)
            .map(|_| ())
            .map_err(|e| ClientError::Configuration(format!("invalid base URL '{}': {e}", self.base_url)))
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
    fn test_override_appends_api_prefix() {
        let config = ClientConfig::from_override(Some("http://localhost:8080/"));
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.url("/places/7"), "http://localhost:8080/api/places/7");
    }

    #[test]
    fn test_missing_or_blank_override_uses_production() {
        assert_eq!(ClientConfig::from_override(None).base_url, DEFAULT_BASE_URL);
        assert_eq!(ClientConfig::from_override(Some("  ")).base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.refresh_threshold, Duration::from_secs(300));
        assert!(config.validate().is_ok());
        assert!(ClientConfig::new("not a url").validate().is_err());
    }
}
