//! Movie detail aggregator
//!
//! Fans out the detail, reviews and videos requests for one movie, waits for
//! all three, then commits them together or not at all.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{MovieService, NetworkError};
use crate::models::{MovieDetail, Review, ReviewResponse, Video, VideoResponse};

/// Observable detail screen state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieDetailState {
    /// Movie requested by the most recent load
    pub movie_id: Option<u64>,
    pub detail: Option<MovieDetail>,
    pub reviews: Vec<Review>,
    pub videos: Vec<Video>,
    pub is_loading: bool,
    pub error: Option<NetworkError>,
}

impl MovieDetailState {
    /// First YouTube trailer, in the order TMDB returned the videos
    pub fn primary_trailer(&self) -> Option<&Video> {
        self.videos.iter().find(|v| v.is_youtube_trailer())
    }
}

/// What a call to [`MovieDetailLoader::load_details`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOutcome {
    /// All three results were committed
    Loaded,
    /// At least one request failed; `error` was set and nothing else committed
    Failed,
    /// A newer load started before this one settled; its results were dropped
    Superseded,
}

pub struct MovieDetailLoader {
    service: Arc<dyn MovieService>,
    state: watch::Sender<MovieDetailState>,
    generation: AtomicU64,
}

impl fmt::Debug for MovieDetailLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MovieDetailLoader")
            .field("movie_id", &state.movie_id)
            .field("is_loading", &state.is_loading)
            .field("generation", &self.generation.load(Ordering::Relaxed))
            .finish()
    }
}

impl MovieDetailLoader {
    pub fn new(service: Arc<dyn MovieService>) -> Self {
        let (state, _) = watch::channel(MovieDetailState::default());
        Self {
            service,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> MovieDetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MovieDetailState> {
        self.state.subscribe()
    }

    /// Load detail, reviews and videos for `movie_id` concurrently.
    ///
    /// Result fields are cleared up front. When all three requests succeed
    /// they are published in one update; if any fails, `error` is set to the
    /// first failure in detail, reviews, videos order and the result fields
    /// stay empty.
    pub async fn load_details(&self, movie_id: u64) -> DetailOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| {
            state.movie_id = Some(movie_id);
            state.detail = None;
            state.reviews.clear();
            state.videos.clear();
            state.is_loading = true;
            state.error = None;
        });
        debug!(movie_id, generation, "loading movie details");

        let (detail, reviews, videos) = tokio::join!(
            self.service.fetch_movie_details(movie_id),
            self.service.fetch_movie_reviews(movie_id),
            self.service.fetch_movie_videos(movie_id),
        );
        let joined = join_all(detail, reviews, videos);

        let mut outcome = DetailOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            state.is_loading = false;
            match joined {
                Ok((detail, reviews, videos)) => {
                    state.detail = Some(detail);
                    state.reviews = reviews;
                    state.videos = videos;
                    outcome = DetailOutcome::Loaded;
                }
                Err(error) => {
                    state.error = Some(error);
                    outcome = DetailOutcome::Failed;
                }
            }
            true
        });

        match outcome {
            DetailOutcome::Loaded => info!(movie_id, "movie details loaded"),
            DetailOutcome::Failed => warn!(movie_id, "movie details failed"),
            DetailOutcome::Superseded => debug!(movie_id, generation, "stale detail load dropped"),
        }
        outcome
    }

    /// Re-run the most recent load, if there was one
    pub async fn retry(&self) -> Option<DetailOutcome> {
        let movie_id = self.state.borrow().movie_id;
        match movie_id {
            Some(id) => Some(self.load_details(id).await),
            None => None,
        }
    }
}

/// Combine the three settled requests; the first failure in argument order wins
fn join_all(
    detail: Result<MovieDetail>,
    reviews: Result<ReviewResponse>,
    videos: Result<VideoResponse>,
) -> Result<(MovieDetail, Vec<Review>, Vec<Video>), NetworkError> {
    let detail = detail.map_err(|e| failed("detail", e))?;
    let reviews = reviews.map_err(|e| failed("reviews", e))?;
    let videos = videos.map_err(|e| failed("videos", e))?;
    Ok((detail, reviews.results, videos.results))
}

fn failed(request: &str, err: anyhow::Error) -> NetworkError {
    warn!(request, error = %err, "movie detail request failed");
    NetworkError::classify(err)
}
