//! song.link API client implementation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use redomi_core::{Error, HttpError, Resolution, Result, SongResolver};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::SongLinkConfig;
use crate::parser::parse_links_response;
use crate::types::{RawErrorResponse, RawLinksResponse};

const USER_AGENT: &str = concat!("redomi/", env!("CARGO_PKG_VERSION"));

/// Block applied after a 429 without a usable `Retry-After`.
const DEFAULT_RATE_LIMIT_BLOCK: Duration = Duration::from_secs(60);

/// Cache entry with expiration.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Default)]
struct RateLimitState {
    /// Time when we can make requests again (if rate limited).
    blocked_until: Option<Instant>,
}

impl RateLimitState {
    fn remaining(&self) -> Option<Duration> {
        self.blocked_until
            .and_then(|until| until.checked_duration_since(Instant::now()))
            .filter(|left| !left.is_zero())
    }

    fn block_for(&mut self, duration: Duration) {
        self.blocked_until = Some(Instant::now() + duration);
    }
}

/// Client for the song.link `/links` endpoint.
#[derive(Clone)]
pub struct SongLinkClient {
    http: reqwest::Client,
    endpoint: Url,
    config: Arc<SongLinkConfig>,
    /// Resolutions by input URL, kept only for this process.
    cache: Arc<DashMap<String, CacheEntry<Resolution>>>,
    rate_limit_state: Arc<RwLock<RateLimitState>>,
}

impl SongLinkClient {
    /// Create a client against the public API with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(SongLinkConfig::default())
    }

    pub fn with_config(config: SongLinkConfig) -> Result<Self> {
        if config.timeout().is_zero() {
            return Err(Error::InvalidArgument(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        let endpoint = Url::parse(&format!("{}/links", config.api_url.trim_end_matches('/')))
            .map_err(|e| Error::InvalidArgument(format!("Invalid API URL '{}': {e}", config.api_url)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            config: Arc::new(config),
            cache: Arc::new(DashMap::new()),
            rate_limit_state: Arc::new(RwLock::new(RateLimitState::default())),
        })
    }

    pub fn config(&self) -> &SongLinkConfig {
        &self.config
    }

    /// Resolve `input_url` into its canonical entity and per-platform links.
    pub async fn resolve(&self, input_url: &str) -> Result<Resolution> {
        let input = validate_input(input_url)?;

        if let Some(cached) = self.get_cached(input.as_str()) {
            debug!("Cache hit for {input}");
            return Ok(cached);
        }

        let blocked = self.rate_limit_state.read().remaining();
        if let Some(left) = blocked {
            return Err(Error::RateLimited {
                retry_after_secs: Some(left.as_secs()),
            });
        }

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = self.retry_delay(attempt);
                tokio::time::sleep(delay).await;
                debug!("Retry attempt {attempt} for {input} after {delay:?}");
            }

            match self.do_request(&input).await {
                Ok(body) => {
                    let raw: RawLinksResponse = serde_json::from_slice(&body)
                        .map_err(|e| Error::Decode(format!("Failed to parse response: {e}")))?;
                    let resolution = parse_links_response(input_url, raw)?;

                    info!(
                        "Resolved {input} to '{}' by '{}' with {} links",
                        resolution.entity.title,
                        resolution.entity.artist_name,
                        resolution.links.len()
                    );
                    self.set_cached(input.to_string(), resolution.clone());
                    return Ok(resolution);
                }
                Err(e) => {
                    warn!("Request for {input} failed (attempt {attempt}): {e}");

                    if let Error::RateLimited { retry_after_secs } = &e {
                        let block = retry_after_secs
                            .map_or(DEFAULT_RATE_LIMIT_BLOCK, Duration::from_secs);
                        self.rate_limit_state.write().block_for(block);
                        return Err(e);
                    }

                    if !e.is_retryable() {
                        return Err(e);
                    }

                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Network("Request failed".to_string())))
    }

    async fn do_request(&self, input: &Url) -> Result<Vec<u8>> {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("url", input.as_str());
            if let Some(country) = &self.config.user_country {
                query.append_pair("userCountry", country);
            }
            if let Some(key) = &self.config.api_key {
                query.append_pair("key", key);
            }
        }

        let response = self.http.get(url).send().await.map_err(transport_error)?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());

            return Err(Error::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<RawErrorResponse>(&body)
                .ok()
                .and_then(|e| e.reason().map(String::from))
                .unwrap_or(body);

            return Err(match status {
                reqwest::StatusCode::BAD_REQUEST => {
                    Error::MalformedInput(format!("{input}: {reason}"))
                }
                reqwest::StatusCode::NOT_FOUND => Error::NotFound(input.to_string()),
                _ => Error::Http(HttpError::StatusError {
                    status: status.as_u16(),
                    message: reason,
                }),
            });
        }

        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| Error::Network(format!("Failed to read response body: {e}")))
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        self.config.retry_base_delay() * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    fn get_cached(&self, key: &str) -> Option<Resolution> {
        let entry = self.cache.get(key)?;
        if entry.is_expired() {
            drop(entry);
            self.cache.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    fn set_cached(&self, key: String, value: Resolution) {
        let ttl = self.config.cache_ttl();
        if ttl.is_zero() {
            return;
        }
        self.cache.insert(key, CacheEntry::new(value, ttl));

        // Cleanup expired entries occasionally
        if self.cache.len() > 100 {
            self.cache.retain(|_, entry| !entry.is_expired());
        }
    }

    /// Clear the cache.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Get the number of cached entries.
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl SongResolver for SongLinkClient {
    async fn resolve(&self, input_url: &str) -> Result<Resolution> {
        Self::resolve(self, input_url).await
    }
}

/// Accept only absolute http(s) links with a host.
fn validate_input(input_url: &str) -> Result<Url> {
    let trimmed = input_url.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| Error::MalformedInput(format!("'{trimmed}' is not a URL: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(Error::MalformedInput(format!(
            "'{trimmed}' is not a web link"
        )));
    }
    Ok(url)
}

fn transport_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Http(HttpError::Timeout)
    } else if e.is_connect() {
        Error::Http(HttpError::ConnectionFailed(e.to_string()))
    } else {
        Error::Network(e.to_string())
    }
}
