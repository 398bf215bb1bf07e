//! Paged catalog loader
//!
//! Owns the infinite-scroll state for the movie catalog. At most one page
//! request is outstanding at a time; every state change is committed as a
//! single update on a `watch` channel so subscribers never observe a
//! half-applied page.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{MovieService, NetworkError};
use crate::models::Movie;

/// Distance from the end of the loaded list at which the next page is requested
pub const PREFETCH_THRESHOLD: usize = 5;

/// Observable catalog state
#[derive(Debug, Clone, PartialEq)]
pub struct MovieListState {
    /// Loaded movies in server page order
    pub movies: Vec<Movie>,
    /// Next page to request (1-based)
    pub current_page: u32,
    /// False once `current_page` has passed the server's page count
    pub has_more_data: bool,
    /// A page request is in flight
    pub is_loading: bool,
    /// Failure of the most recent request
    pub error: Option<NetworkError>,
}

impl Default for MovieListState {
    fn default() -> Self {
        Self {
            movies: Vec::new(),
            current_page: 1,
            has_more_data: true,
            is_loading: false,
            error: None,
        }
    }
}

/// What a call to [`MovieListLoader::fetch_movies`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Another page request was in flight; nothing changed
    AlreadyLoading,
    /// Every page has been loaded; nothing changed
    Exhausted,
    /// A page was committed
    Loaded { page: u32, count: usize },
    /// The request failed and `error` was set
    Failed,
}

/// Paged movie catalog loader
pub struct MovieListLoader {
    service: Arc<dyn MovieService>,
    state: watch::Sender<MovieListState>,
}

impl fmt::Debug for MovieListLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MovieListLoader")
            .field("movies", &state.movies.len())
            .field("current_page", &state.current_page)
            .field("has_more_data", &state.has_more_data)
            .field("is_loading", &state.is_loading)
            .finish()
    }
}

impl MovieListLoader {
    pub fn new(service: Arc<dyn MovieService>) -> Self {
        let (state, _) = watch::channel(MovieListState::default());
        Self { service, state }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> MovieListState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every committed state change
    pub fn subscribe(&self) -> watch::Receiver<MovieListState> {
        self.state.subscribe()
    }

    /// Load the next page, or page 1 when `refreshing`.
    ///
    /// A no-op while another request is in flight, and (unless refreshing)
    /// once every page has been loaded. On success the page is appended, or
    /// replaces the list when refreshing. On failure only `error` and
    /// `is_loading` change.
    pub async fn fetch_movies(&self, refreshing: bool) -> FetchOutcome {
        let mut request = Err(FetchOutcome::AlreadyLoading);
        self.state.send_if_modified(|state| {
            if state.is_loading {
                return false;
            }
            if refreshing {
                state.current_page = 1;
                state.has_more_data = true;
            }
            if !state.has_more_data {
                request = Err(FetchOutcome::Exhausted);
                return false;
            }
            state.is_loading = true;
            state.error = None;
            request = Ok(state.current_page);
            true
        });

        let page = match request {
            Ok(page) => page,
            Err(skipped) => {
                debug!(?skipped, refreshing, "movie page fetch skipped");
                return skipped;
            }
        };

        let in_flight = InFlight::new(&self.state);
        debug!(page, refreshing, "fetching movie page");

        match self.service.fetch_movies(page).await {
            Ok(response) => {
                let count = response.results.len();
                let total_pages = response.total_pages;
                in_flight.settle(|state| {
                    if refreshing {
                        state.movies = response.results;
                    } else {
                        state.movies.extend(response.results);
                    }
                    state.current_page += 1;
                    state.has_more_data = state.current_page <= total_pages;
                    state.is_loading = false;
                });
                info!(page, count, total_pages, "movie page loaded");
                FetchOutcome::Loaded { page, count }
            }
            Err(err) => {
                let error = NetworkError::find(&err)
                    .unwrap_or_else(|| NetworkError::DecodingError("Unknown error".into()));
                warn!(page, error = %err, "movie page fetch failed");
                in_flight.settle(|state| {
                    state.is_loading = false;
                    state.error = Some(error);
                });
                FetchOutcome::Failed
            }
        }
    }

    /// Infinite-scroll trigger.
    ///
    /// Fetches the next page when no item is given (empty list bootstrap), or
    /// when `current_item` sits exactly [`PREFETCH_THRESHOLD`] + 1 places from
    /// the end of the loaded list. Returns `None` when nothing was triggered.
    pub async fn load_more_if_needed(&self, current_item: Option<&Movie>) -> Option<FetchOutcome> {
        let trigger = match current_item {
            None => true,
            Some(item) => {
                let state = self.state.borrow();
                should_prefetch(&state.movies, item.id)
            }
        };

        if !trigger {
            return None;
        }
        Some(self.fetch_movies(false).await)
    }
}

/// Whether the movie with `item_id` sits at the prefetch position
pub fn should_prefetch(movies: &[Movie], item_id: u64) -> bool {
    let Some(threshold_index) = movies.len().checked_sub(PREFETCH_THRESHOLD + 1) else {
        return false;
    };
    movies.iter().position(|m| m.id == item_id) == Some(threshold_index)
}

/// Clears `is_loading` if a fetch is dropped before it settles
struct InFlight<'a> {
    state: &'a watch::Sender<MovieListState>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(state: &'a watch::Sender<MovieListState>) -> Self {
        Self {
            state,
            settled: false,
        }
    }

    fn settle(mut self, commit: impl FnOnce(&mut MovieListState)) {
        self.settled = true;
        self.state.send_modify(commit);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("movie page fetch abandoned before completion");
            self.state.send_modify(|state| state.is_loading = false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies(ids: impl IntoIterator<Item = u64>) -> Vec<Movie> {
        ids.into_iter()
            .map(|id| Movie {
                id,
                title: format!("Movie {}", id),
                overview: String::new(),
                poster_path: None,
                backdrop_path: None,
                vote_average: 0.0,
                release_date: None,
            })
            .collect()
    }

    #[test]
    fn test_default_state() {
        let state = MovieListState::default();
        assert!(state.movies.is_empty());
        assert_eq!(state.current_page, 1);
        assert!(state.has_more_data);
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_should_prefetch_only_at_threshold() {
        let list = movies(1..=20);
        // index 14 == 20 - 6
        assert!(should_prefetch(&list, 15));
        for id in (1..=20).filter(|&id| id != 15) {
            assert!(!should_prefetch(&list, id), "id {} should not trigger", id);
        }
    }

    #[test]
    fn test_should_prefetch_exactly_six_items() {
        let list = movies(1..=6);
        assert!(should_prefetch(&list, 1));
        assert!(!should_prefetch(&list, 6));
    }

    #[test]
    fn test_should_prefetch_short_list_never_triggers() {
        let list = movies(1..=5);
        for id in 1..=5 {
            assert!(!should_prefetch(&list, id));
        }
        assert!(!should_prefetch(&[], 1));
    }

    #[test]
    fn test_should_prefetch_unknown_id() {
        let list = movies(1..=10);
        assert!(!should_prefetch(&list, 999));
    }
}
