//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::rate_limiter::TmdbRateLimiter;
use super::types::{
    AppendToResponse, SearchMovieParams, SearchTvParams, TmdbErrorResponse, TmdbMovieDetails,
    TmdbSearchMovieResponse, TmdbSearchTvResponse, TmdbTvDetails, TmdbTvSeason,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Maximum number of retries for HTTP 429 responses.
const MAX_RETRIES: u32 = 3;

/// Backoff duration between retries.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Rate limiter.
    rate_limiter: Arc<Mutex<TmdbRateLimiter>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let rate_limiter = self
            .min_interval
            .map_or_else(TmdbRateLimiter::default_interval, TmdbRateLimiter::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            rate_limiter: Arc::new(Mutex::new(rate_limiter)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Fetches a resource that must exist; 404 is an error here.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let found = self.get_json_opt(path, query).await?;
        found.with_context(|| format!("TMDB API error (HTTP 404 Not Found): {path}"))
    }

    /// Fetches a resource that may be missing; 404 yields `Ok(None)`.
    #[instrument(skip_all, fields(path = %path))]
    async fn get_json_opt<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;
        let response = self.send_throttled(url, query).await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            tracing::debug!(path, "TMDB resource not found");
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        serde_json::from_str(&body)
            .map(Some)
            .with_context(|| format!("failed to decode JSON response: {path}"))
    }

    /// Sends one GET through the throttle, re-sending on HTTP 429 with a
    /// linear backoff until `MAX_RETRIES` is exhausted.
    async fn send_throttled(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response> {
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                tracing::warn!(
                    attempt,
                    max_retries = MAX_RETRIES,
                    "TMDB rate limited, backing off"
                );
                tokio::time::sleep(RETRY_BACKOFF.saturating_mul(attempt)).await;
            }
            self.rate_limiter.lock().await.wait().await;

            tracing::debug!(%url, "TMDB API request");
            let response = self
                .http_client
                .get(url.clone())
                .bearer_auth(&self.api_token)
                .query(query)
                .send()
                .await
                .with_context(|| format!("request failed: {}", url.path()))?;

            if response.status() != reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }
        }
        bail!(
            "TMDB API rate limit exceeded after {MAX_RETRIES} retries: {}",
            url.path()
        )
    }
}

/// Turns a non-success response into an error, preferring TMDB's own
/// `status_code`/`status_message` body when it parses.
fn api_error(status: reqwest::StatusCode, body: &str) -> anyhow::Error {
    serde_json::from_str::<TmdbErrorResponse>(body).map_or_else(
        |_| anyhow!("TMDB API error (HTTP {status}): {body}"),
        |err| {
            anyhow!(
                "TMDB API error (HTTP {status}): code={}, message={}",
                err.status_code,
                err.status_message,
            )
        },
    )
}

/// Builds the `language` + optional `append_to_response` query pairs.
fn details_query(language: &str, append: &[AppendToResponse]) -> Vec<(&'static str, String)> {
    let mut query = vec![("language", String::from(language))];
    if !append.is_empty() {
        query.push(("append_to_response", AppendToResponse::join(append)));
    }
    query
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn search_tv(&self, params: &SearchTvParams) -> Result<TmdbSearchTvResponse> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        if let Some(year) = params.first_air_date_year {
            query.push(("first_air_date_year", year.to_string()));
        }

        self.get_json("search/tv", &query).await
    }

    #[instrument(skip_all)]
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<TmdbSearchMovieResponse> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", params.query.clone()),
            ("language", params.language.clone()),
            ("page", params.page.to_string()),
            ("include_adult", params.include_adult.to_string()),
        ];
        if let Some(year) = params.year {
            query.push(("year", year.to_string()));
        }

        self.get_json("search/movie", &query).await
    }

    #[instrument(skip_all)]
    async fn tv_details(
        &self,
        series_id: u64,
        language: &str,
        append: &[AppendToResponse],
    ) -> Result<Option<TmdbTvDetails>> {
        let path = format!("tv/{series_id}");
        self.get_json_opt(&path, &details_query(language, append))
            .await
    }

    #[instrument(skip_all)]
    async fn movie_details(
        &self,
        movie_id: u64,
        language: &str,
        append: &[AppendToResponse],
    ) -> Result<Option<TmdbMovieDetails>> {
        let path = format!("movie/{movie_id}");
        self.get_json_opt(&path, &details_query(language, append))
            .await
    }

    #[instrument(skip_all)]
    async fn tv_season(
        &self,
        series_id: u64,
        season_number: u32,
        language: &str,
    ) -> Result<Option<TmdbTvSeason>> {
        let path = format!("tv/{series_id}/season/{season_number}");
        let query = [("language", String::from(language))];
        self.get_json_opt(&path, &query).await
    }
}
