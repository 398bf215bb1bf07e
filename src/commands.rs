//! CLI Command Handlers
//!
//! Each handler builds a TMDB client from config, drives a loader the way a
//! view would, and reports through `Output`.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Serialize;

use crate::api::{NetworkError, TmdbClient};
use crate::cli::{DetailCmd, DiscoverCmd, ExitCode, Output};
use crate::config::Config;
use crate::loader::{
    DetailOutcome, FetchOutcome, MovieDetailLoader, MovieDetailState, MovieListLoader,
    PREFETCH_THRESHOLD,
};
use crate::models::{Movie, Review};

fn exit_code_for(error: &NetworkError) -> ExitCode {
    match error {
        NetworkError::NotFound => ExitCode::NotFound,
        _ => ExitCode::NetworkError,
    }
}

fn client_from(config: &Config, output: &Output) -> Result<TmdbClient, ExitCode> {
    TmdbClient::from_config(config).map_err(|e| output.error(format!("{:#}", e), ExitCode::InvalidArgs))
}

// =============================================================================
// Discover Command
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub release_date: String,
    pub rating: String,
    pub poster_url: Option<String>,
}

impl MovieSummary {
    fn new(movie: &Movie, image_base_url: &str) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            release_date: movie.formatted_release_date(),
            rating: movie.rating_text(),
            poster_url: movie.poster_url(image_base_url),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiscoverReport {
    pub pages_loaded: u32,
    pub has_more_data: bool,
    pub movies: Vec<MovieSummary>,
}

pub async fn discover_cmd(cmd: DiscoverCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match client_from(config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let loader = MovieListLoader::new(Arc::new(client));

    output.info("Fetching movies...");

    // Empty list bootstrap, then scroll to the prefetch position for each page
    let mut pages_loaded = 0;
    let mut outcome = loader.load_more_if_needed(None).await;
    loop {
        match outcome {
            Some(FetchOutcome::Loaded { page, count }) => {
                pages_loaded += 1;
                output.info(format!("Loaded page {} ({} movies)", page, count));
            }
            Some(FetchOutcome::Failed) => {
                let error = loader
                    .state()
                    .error
                    .unwrap_or_else(|| NetworkError::Unknown("fetch failed".into()));
                return output.error(format!("Discover failed: {}", error), exit_code_for(&error));
            }
            _ => break,
        }

        if pages_loaded >= cmd.pages {
            break;
        }

        let state = loader.state();
        if !state.has_more_data {
            break;
        }
        let frontier = state
            .movies
            .len()
            .checked_sub(PREFETCH_THRESHOLD + 1)
            .and_then(|i| state.movies.get(i));
        outcome = match frontier {
            Some(movie) => loader.load_more_if_needed(Some(movie)).await,
            // Short page: nothing to scroll past, ask for the next page directly
            None => Some(loader.fetch_movies(false).await),
        };
    }

    let state = loader.state();
    let limit = cmd.limit.unwrap_or(usize::MAX);
    let movies: Vec<MovieSummary> = state
        .movies
        .iter()
        .take(limit)
        .map(|m| MovieSummary::new(m, config.image_base_url()))
        .collect();

    let mut text = String::new();
    for movie in state.movies.iter().take(limit) {
        let _ = writeln!(text, "{:>8}  {}", movie.id, movie);
    }
    if text.is_empty() {
        text.push_str("No movies found");
    }

    let report = DiscoverReport {
        pages_loaded,
        has_more_data: state.has_more_data,
        movies,
    };
    if let Err(e) = output.print(&report, text.trim_end()) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}

// =============================================================================
// Detail Command
// =============================================================================

#[derive(Debug, Serialize)]
pub struct DetailReport<'a> {
    pub id: u64,
    pub title: &'a str,
    pub tagline: Option<&'a str>,
    pub overview: &'a str,
    pub release_date: String,
    pub runtime: Option<String>,
    pub rating: String,
    pub genres: Vec<&'a str>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub trailer_url: Option<String>,
    pub video_count: usize,
    pub review_count: usize,
    pub reviews: Vec<&'a Review>,
}

impl<'a> DetailReport<'a> {
    fn build(state: &'a MovieDetailState, max_reviews: usize, image_base_url: &str) -> Option<Self> {
        let detail = state.detail.as_ref()?;
        Some(Self {
            id: detail.id,
            title: &detail.title,
            tagline: detail.tagline.as_deref().filter(|t| !t.is_empty()),
            overview: &detail.overview,
            release_date: detail.formatted_release_date(),
            runtime: detail.runtime_text(),
            rating: detail.rating_text(),
            genres: detail.genre_names(),
            poster_url: detail.poster_url(image_base_url),
            backdrop_url: detail.backdrop_url(image_base_url),
            trailer_url: state.primary_trailer().and_then(|v| v.youtube_url()),
            video_count: state.videos.len(),
            review_count: state.reviews.len(),
            reviews: state.reviews.iter().take(max_reviews).collect(),
        })
    }

    fn text(&self, state: &MovieDetailState) -> String {
        let mut text = String::new();
        if let Some(detail) = &state.detail {
            let _ = writeln!(text, "{}", detail);
        }
        if let Some(tagline) = self.tagline {
            let _ = writeln!(text, "\"{}\"", tagline);
        }
        if !self.genres.is_empty() {
            let _ = writeln!(text, "Genres: {}", self.genres.join(", "));
        }
        if !self.overview.is_empty() {
            let _ = writeln!(text, "\n{}", self.overview);
        }
        match &self.trailer_url {
            Some(url) => {
                let _ = writeln!(text, "\nTrailer: {}", url);
            }
            None => {
                let _ = writeln!(text, "\nNo trailer available");
            }
        }
        let _ = writeln!(text, "\nReviews ({}):", self.review_count);
        for review in &self.reviews {
            let excerpt: String = review.content.chars().take(200).collect();
            let _ = writeln!(text, "  {}: {}", review.author, excerpt.replace('\n', " "));
        }
        text
    }
}

pub async fn detail_cmd(cmd: DetailCmd, config: &Config, output: &Output) -> ExitCode {
    let client = match client_from(config, output) {
        Ok(client) => client,
        Err(code) => return code,
    };
    let loader = MovieDetailLoader::new(Arc::new(client));

    output.info(format!("Getting details for movie {}", cmd.id));

    match loader.load_details(cmd.id).await {
        DetailOutcome::Loaded => {}
        DetailOutcome::Failed | DetailOutcome::Superseded => {
            let error = loader
                .state()
                .error
                .unwrap_or_else(|| NetworkError::Unknown("detail load failed".into()));
            return output.error(
                format!("Detail for movie {} failed: {}", cmd.id, error),
                exit_code_for(&error),
            );
        }
    }

    let state = loader.state();
    let Some(report) = DetailReport::build(&state, cmd.reviews, config.image_base_url()) else {
        return output.error("Detail missing after load", ExitCode::Error);
    };
    let text = report.text(&state);
    if let Err(e) = output.print(&report, text.trim_end()) {
        return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
    }
    ExitCode::Success
}
