//! Integration tests for moviedb
//!
//! Tests are organized by component:
//! - tmdb_test: TMDB API client tests
//! - list_loader_test: Catalog loader (paging, in-flight guard, prefetch)
//! - detail_loader_test: Detail fan-out and atomic commit
//! - cli_test: Argument parsing and command handlers
//! - e2e_test: Loaders over the TMDB client against a mock server

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
