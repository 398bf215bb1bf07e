use anyhow::Result;

use crate::models::{MovieDetail, MovieResponse, ReviewResponse, VideoResponse};

/// Read-only movie metadata source consumed by the loaders.
///
/// Implementations must be safe to call concurrently; one instance is
/// normally shared by every loader through an `Arc<dyn MovieService>`.
/// Failures should carry a [`NetworkError`](super::NetworkError) somewhere
/// in the error chain; anything else is treated as an unknown failure.
#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Fetch one page (1-based) of the movie catalog
    async fn fetch_movies(&self, page: u32) -> Result<MovieResponse>;

    async fn fetch_movie_details(&self, id: u64) -> Result<MovieDetail>;

    async fn fetch_movie_reviews(&self, id: u64) -> Result<ReviewResponse>;

    async fn fetch_movie_videos(&self, id: u64) -> Result<VideoResponse>;
}
