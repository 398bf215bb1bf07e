//! Data-fetch orchestration for the catalog and detail screens
//!
//! - `list`: paged catalog with in-flight guard and scroll prefetch
//! - `detail`: three-way fan-out joined into one atomic commit
//!
//! Both loaders publish their state through `tokio::sync::watch`; call
//! `subscribe()` to be notified of changes instead of polling.

pub mod detail;
pub mod list;

pub use detail::{DetailOutcome, MovieDetailLoader, MovieDetailState};
pub use list::{FetchOutcome, MovieListLoader, MovieListState, PREFETCH_THRESHOLD};
