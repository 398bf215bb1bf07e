//! API clients for external services
//!
//! - `MovieService`: the read-only contract the loaders consume
//! - TMDB: the production implementation over the TMDB v3 REST API

pub mod error;
pub mod service;
pub mod tmdb;

pub use error::NetworkError;
pub use service::MovieService;
pub use tmdb::TmdbClient;
