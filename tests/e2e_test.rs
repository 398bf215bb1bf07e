//! End-to-end flow tests
//!
//! Loaders driven over a real `TmdbClient` talking to a mock TMDB server:
//! Catalog bootstrap -> scroll prefetch -> exhaustion, and the detail
//! fan-out with one failing endpoint.

use std::sync::Arc;

use mockito::{Matcher, Mock, Server, ServerGuard};
use moviedb::api::{MovieService, NetworkError, TmdbClient};
use moviedb::loader::{
    DetailOutcome, FetchOutcome, MovieDetailLoader, MovieListLoader, PREFETCH_THRESHOLD,
};

fn page_body(page: u32, ids: std::ops::RangeInclusive<u64>, total_pages: u32) -> String {
    let results: Vec<serde_json::Value> = ids
        .map(|id| {
            serde_json::json!({
                "id": id,
                "title": format!("Movie {}", id),
                "overview": format!("Overview {}", id),
                "poster_path": format!("/poster{}.jpg", id),
                "backdrop_path": null,
                "vote_average": 6.5,
                "release_date": "2023-01-01"
            })
        })
        .collect();
    serde_json::json!({
        "page": page,
        "results": results,
        "total_pages": total_pages,
        "total_results": 25
    })
    .to_string()
}

async fn mock_page(server: &mut ServerGuard, page: u32, body: String) -> Mock {
    server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::UrlEncoded("page".into(), page.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}

fn client(server: &ServerGuard) -> Arc<dyn MovieService> {
    Arc::new(TmdbClient::with_base_url("test_key", server.url()))
}

// =============================================================================
// Catalog Flow
// =============================================================================

#[tokio::test]
async fn test_catalog_scroll_to_end() {
    let mut server = Server::new_async().await;
    let page1 = mock_page(&mut server, 1, page_body(1, 1..=20, 2)).await;
    let page2 = mock_page(&mut server, 2, page_body(2, 21..=25, 2)).await;

    let loader = MovieListLoader::new(client(&server));

    // View appears with an empty list
    let outcome = loader.load_more_if_needed(None).await;
    assert_eq!(outcome, Some(FetchOutcome::Loaded { page: 1, count: 20 }));
    let state = loader.state();
    assert_eq!(state.current_page, 2);
    assert!(state.has_more_data);
    assert_eq!(state.movies.len(), 20);

    // Scroll: cells appear one by one; only threshold cells fetch. Once page 2
    // lands the threshold moves to index 19, which finds the catalog exhausted.
    let movies = state.movies;
    let mut triggered = Vec::new();
    for (index, movie) in movies.iter().enumerate() {
        if let Some(outcome) = loader.load_more_if_needed(Some(movie)).await {
            triggered.push((index, outcome));
        }
    }
    assert_eq!(
        triggered,
        vec![
            (
                movies.len() - 1 - PREFETCH_THRESHOLD,
                FetchOutcome::Loaded { page: 2, count: 5 }
            ),
            (25 - 1 - PREFETCH_THRESHOLD, FetchOutcome::Exhausted),
        ]
    );

    let state = loader.state();
    assert_eq!(state.movies.len(), 25);
    assert_eq!(state.current_page, 3);
    assert!(!state.has_more_data);
    assert_eq!(state.movies.last().map(|m| m.id), Some(25));

    page1.assert_async().await;
    page2.assert_async().await;
}

#[tokio::test]
async fn test_catalog_pull_to_refresh() {
    let mut server = Server::new_async().await;
    let page1 = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(page_body(1, 1..=3, 1))
        .expect(2)
        .create_async()
        .await;

    let loader = MovieListLoader::new(client(&server));
    loader.fetch_movies(false).await;
    assert_eq!(loader.fetch_movies(false).await, FetchOutcome::Exhausted);

    let outcome = loader.fetch_movies(true).await;
    assert_eq!(outcome, FetchOutcome::Loaded { page: 1, count: 3 });
    assert_eq!(loader.state().movies.len(), 3);

    page1.assert_async().await;
}

#[tokio::test]
async fn test_catalog_server_error_then_manual_retry() {
    let mut server = Server::new_async().await;
    let failing = server
        .mock("GET", "/discover/movie")
        .match_query(Matcher::Any)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let loader = MovieListLoader::new(client(&server));
    assert_eq!(loader.fetch_movies(false).await, FetchOutcome::Failed);
    assert_eq!(loader.state().error, Some(NetworkError::InvalidResponse(500)));
    failing.assert_async().await;
    failing.remove_async().await;

    let page1 = mock_page(&mut server, 1, page_body(1, 1..=2, 1)).await;
    assert_eq!(
        loader.fetch_movies(false).await,
        FetchOutcome::Loaded { page: 1, count: 2 }
    );
    assert!(loader.state().error.is_none());
    page1.assert_async().await;
}

// =============================================================================
// Detail Flow
// =============================================================================

#[tokio::test]
async fn test_detail_loads_all_three() {
    let mut server = Server::new_async().await;
    let detail = server
        .mock("GET", "/movie/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": 42, "title": "Answer", "runtime": 42, "genres": []}"#)
        .create_async()
        .await;
    let reviews = server
        .mock("GET", "/movie/42/reviews")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": [{"id": "r1", "author": "a", "content": "ok"}]}"#)
        .create_async()
        .await;
    let videos = server
        .mock("GET", "/movie/42/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"{"results": [{"id": "v1", "key": "k1", "name": "T", "site": "YouTube", "type": "Trailer"}]}"#,
        )
        .create_async()
        .await;

    let loader = MovieDetailLoader::new(client(&server));
    assert_eq!(loader.load_details(42).await, DetailOutcome::Loaded);

    let state = loader.state();
    assert_eq!(state.detail.as_ref().map(|d| d.title.as_str()), Some("Answer"));
    assert_eq!(state.reviews.len(), 1);
    assert_eq!(state.primary_trailer().map(|v| v.key.as_str()), Some("k1"));

    detail.assert_async().await;
    reviews.assert_async().await;
    videos.assert_async().await;
}

#[tokio::test]
async fn test_detail_reviews_failure_publishes_nothing() {
    let mut server = Server::new_async().await;
    let detail = server
        .mock("GET", "/movie/42")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"id": 42, "title": "Answer"}"#)
        .create_async()
        .await;
    let reviews = server
        .mock("GET", "/movie/42/reviews")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let videos = server
        .mock("GET", "/movie/42/videos")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": []}"#)
        .create_async()
        .await;

    let loader = MovieDetailLoader::new(client(&server));
    assert_eq!(loader.load_details(42).await, DetailOutcome::Failed);

    let state = loader.state();
    assert!(state.detail.is_none());
    assert!(state.reviews.is_empty());
    assert!(state.videos.is_empty());
    assert!(!state.is_loading);
    assert_eq!(state.error, Some(NetworkError::InvalidResponse(500)));

    // All three were still issued
    detail.assert_async().await;
    reviews.assert_async().await;
    videos.assert_async().await;
}
