//! Stats API REST client with rate limiting.
//!
//! Every request waits on a `governor` limiter before it is sent and carries
//! browser-like headers, without which the stats endpoints tend to stall.
//!
//! # Example
//!
//! ```ignore
//! use hoops_stats_api::{LineupQuery, StatsClient, StatsClientConfig};
//!
//! let client = StatsClient::new(StatsClientConfig::default())?;
//! let query = LineupQuery::new("2024-25", date, 1610612750);
//! let table = client.league_dash_lineups(&query).await?;
//! ```

use crate::error::{Result, StatsApiError};
use crate::lineups::LineupQuery;
use crate::result_set::{ResultSet, StatsResponse};
use governor::{Quota, RateLimiter};
use hoops_core::StatsApiConfig;
use nonzero_ext::nonzero;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Constants
// =============================================================================

/// Production stats API base URL.
pub const STATS_API_URL: &str = "https://stats.nba.com/stats";

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the stats client.
#[derive(Debug, Clone)]
pub struct StatsClientConfig {
    /// Base URL for the API.
    pub base_url: String,

    /// Requests per minute limit.
    pub requests_per_minute: NonZeroU32,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for StatsClientConfig {
    fn default() -> Self {
        Self {
            base_url: STATS_API_URL.to_string(),
            requests_per_minute: nonzero!(30u32),
            timeout_secs: 30,
        }
    }
}

impl From<&StatsApiConfig> for StatsClientConfig {
    fn from(config: &StatsApiConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            requests_per_minute: NonZeroU32::new(config.requests_per_minute)
                .unwrap_or(nonzero!(30u32)),
            timeout_secs: config.timeout_secs,
        }
    }
}

impl StatsClientConfig {
    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, requests_per_minute: NonZeroU32) -> Self {
        self.requests_per_minute = requests_per_minute;
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// =============================================================================
// StatsClient
// =============================================================================

/// Read-only client for the stats API.
pub struct StatsClient {
    config: StatsClientConfig,
    http: Client,
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl std::fmt::Debug for StatsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsClient")
            .field("base_url", &self.config.base_url)
            .field("requests_per_minute", &self.config.requests_per_minute)
            .finish_non_exhaustive()
    }
}

impl StatsClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: StatsClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers())
            .build()
            .map_err(|e| StatsApiError::Configuration(format!("failed to build HTTP client: {e}")))?;

        let quota = Quota::per_minute(config.requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            config,
            http,
            rate_limiter,
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fetches lineup totals for one team on one date.
    ///
    /// Returns the primary result set, or an empty one if the response had none.
    ///
    /// # Errors
    /// Returns error if the request fails or the body cannot be decoded.
    pub async fn league_dash_lineups(&self, query: &LineupQuery) -> Result<ResultSet> {
        let response = self.get("/leaguedashlineups", &query.params()).await?;
        Ok(response.into_primary().unwrap_or_default())
    }

    /// Fetches every team-game row of a regular season.
    ///
    /// # Errors
    /// Returns error if the request fails or the body cannot be decoded.
    pub async fn league_game_finder(&self, season: &str) -> Result<ResultSet> {
        let params = [
            ("PlayerOrTeam", "T".to_string()),
            ("Season", season.to_string()),
            ("LeagueID", "00".to_string()),
            ("SeasonType", "Regular Season".to_string()),
        ];
        let response = self.get("/leaguegamefinder", &params).await?;
        Ok(response.into_primary().unwrap_or_default())
    }

    /// Waits for the rate limiter and makes a GET request.
    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<StatsResponse> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!("GET {} ({} params)", url, params.len());

        let response = self.http.get(&url).query(params).send().await?;
        Self::handle_response(response).await
    }

    /// Handles API response, converting errors appropriately.
    async fn handle_response(response: reqwest::Response) -> Result<StatsResponse> {
        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(StatsApiError::rate_limit(retry_after));
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StatsApiError::api(status.as_u16(), text));
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<StatsResponse>(&body)?;
        Ok(parsed)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(
        HeaderName::from_static("x-nba-stats-origin"),
        HeaderValue::from_static("stats"),
    );
    headers.insert(
        HeaderName::from_static("x-nba-stats-token"),
        HeaderValue::from_static("true"),
    );
    headers
}
