//! TMDB (The Movie Database) API client
//!
//! Provides the paged discover catalog and per-movie detail, reviews and
//! videos. API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::{MovieService, NetworkError};
use crate::config::Config;
use crate::models::{MovieDetail, MovieResponse, ReviewResponse, VideoResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: u32 = 3;

/// TMDB API client
#[derive(Debug, Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: build_http_client(DEFAULT_TIMEOUT),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Build a client from resolved configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self {
            api_key,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            client: build_http_client(config.timeout()),
            max_retries: config.max_retries(),
        })
    }

    /// Override how many times a rate-limited request is attempted
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET an endpoint with the API key attached, retrying on rate limits
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, NetworkError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut retries = 0;

        loop {
            debug!(%url, ?query, attempt = retries + 1, "tmdb request");

            let response = self
                .client
                .get(&url)
                .query(&[("api_key", self.api_key.as_str())])
                .query(query)
                .header("Accept", "application/json")
                .send()
                .await?;

            match response.status() {
                status if status.is_success() => {
                    let body = response.text().await?;
                    return serde_json::from_str(&body).map_err(|e| {
                        NetworkError::DecodingError(format!("JSON parse error: {}", e))
                    });
                }
                StatusCode::NOT_FOUND => {
                    return Err(NetworkError::NotFound);
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(NetworkError::RateLimited);
                    }

                    // Honour Retry-After, else exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    warn!(%url, retries, wait_secs, "rate limited by tmdb, backing off");
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                }
                status => {
                    return Err(NetworkError::InvalidResponse(status.as_u16()));
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl MovieService for TmdbClient {
    async fn fetch_movies(&self, page: u32) -> Result<MovieResponse> {
        let response = self
            .get("/discover/movie", &[("page", page.to_string())])
            .await?;
        Ok(response)
    }

    async fn fetch_movie_details(&self, id: u64) -> Result<MovieDetail> {
        let endpoint = format!("/movie/{}", id);
        Ok(self.get(&endpoint, &[]).await?)
    }

    async fn fetch_movie_reviews(&self, id: u64) -> Result<ReviewResponse> {
        let endpoint = format!("/movie/{}/reviews", id);
        Ok(self.get(&endpoint, &[]).await?)
    }

    async fn fetch_movie_videos(&self, id: u64) -> Result<VideoResponse> {
        let endpoint = format!("/movie/{}/videos", id);
        Ok(self.get(&endpoint, &[]).await?)
    }
}

fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = TmdbClient::with_base_url("key", "http://localhost:1234/");
        assert_eq!(client.base_url(), "http://localhost:1234");
    }

    #[test]
    fn test_default_base_url() {
        let client = TmdbClient::new("key");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_max_retries_at_least_one() {
        let client = TmdbClient::new("key").with_max_retries(0);
        assert_eq!(client.max_retries, 1);
    }
}
