//! song.link client configuration.

use std::time::Duration;

use redomi_core::{Error, Result};
use serde::Deserialize;
use tracing::warn;

/// Public song.link API.
pub const DEFAULT_API_URL: &str = "https://api.song.link/v1-alpha.1";

/// Settings for [`crate::SongLinkClient`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SongLinkConfig {
    /// API base URL, without the `/links` suffix.
    pub api_url: String,
    /// Two-letter country code the service resolves links for.
    pub user_country: Option<String>,
    /// API key; anonymous callers are limited to a few requests per minute.
    pub api_key: Option<String>,
    /// Request and connect timeout; must be non-zero.
    pub timeout_ms: u64,
    /// Extra attempts after a retryable failure.
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    /// In-memory cache lifetime, 0 disables caching.
    pub cache_ttl_secs: u64,
}

impl Default for SongLinkConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_country: None,
            api_key: None,
            timeout_ms: 10_000,
            max_retries: 2,
            retry_base_delay_ms: 500,
            cache_ttl_secs: 300,
        }
    }
}

impl SongLinkConfig {
    /// Defaults overlaid with `REDOMI_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().merge_env(|name| std::env::var(name).ok())
    }

    fn merge_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = var("REDOMI_API_URL") {
            self.api_url = url;
        }
        if let Some(country) = var("REDOMI_USER_COUNTRY") {
            self.user_country = Some(country);
        }
        if let Some(key) = var("REDOMI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(raw) = var("REDOMI_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => self.timeout_ms = secs.saturating_mul(1000),
                Err(_) => warn!("Ignoring invalid REDOMI_TIMEOUT_SECS value '{raw}'"),
            }
        }
        self
    }

    /// Parse a JSON configuration document, filling gaps with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::InvalidArgument(format!("Invalid song.link config: {e}")))
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    #[must_use]
    pub fn with_user_country(mut self, country: impl Into<String>) -> Self {
        self.user_country = Some(country.into());
        self
    }

    /// Millisecond precision; anything finer is truncated.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = ttl.as_secs();
        self
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub const fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }

    pub const fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SongLinkConfig::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_env_overlay() {
        let config = SongLinkConfig::default().merge_env(|name| match name {
            "REDOMI_USER_COUNTRY" => Some("IT".to_string()),
            "REDOMI_TIMEOUT_SECS" => Some("3".to_string()),
            _ => None,
        });
        assert_eq!(config.user_country.as_deref(), Some("IT"));
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_invalid_env_timeout_ignored() {
        let config = SongLinkConfig::default()
            .merge_env(|name| (name == "REDOMI_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_json() {
        let config = SongLinkConfig::from_json(r#"{"user_country": "DE", "max_retries": 0}"#)
            .unwrap();
        assert_eq!(config.user_country.as_deref(), Some("DE"));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.timeout_ms, 10_000);
    }

    #[test]
    fn test_sub_second_timeout_kept() {
        let config = SongLinkConfig::default().with_timeout(Duration::from_millis(500));
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.timeout(), Duration::from_millis(500));

        let config = SongLinkConfig::default().with_timeout(Duration::from_millis(1500));
        assert_eq!(config.timeout(), Duration::from_millis(1500));
    }
}
