//! moviedb - paginated movie catalog and detail loading for TMDB
//!
//! The interesting part is the data-fetch orchestration: a paged catalog
//! loader with an in-flight guard and scroll prefetch, and a detail loader
//! that joins three concurrent requests into one atomic update.
//!
//! # Modules
//!
//! - `models` - Movie, detail, review and video records
//! - `api` - `MovieService` contract and the TMDB client
//! - `loader` - Catalog and detail state machines
//! - `config` - Config file and API key resolution
//! - `cli` / `commands` - Scriptable command line front end

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod loader;
pub mod models;

// Re-export commonly used types
pub use models::{Genre, Movie, MovieDetail, MovieResponse, Review, ReviewResponse, Video, VideoResponse};

pub use api::{MovieService, NetworkError, TmdbClient};
pub use loader::{
    DetailOutcome, FetchOutcome, MovieDetailLoader, MovieDetailState, MovieListLoader,
    MovieListState,
};
