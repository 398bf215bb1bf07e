//! Data structures for the movie catalog
//!
//! Mirrors the TMDB wire format closely enough to deserialize directly:
//! - **Catalog**: `Movie` and the paged `MovieResponse` envelope
//! - **Detail**: `MovieDetail` with genres and runtime
//! - **Extras**: `Review` and `Video` lists for the detail screen

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Video site that hosts playable trailers
pub const YOUTUBE_SITE: &str = "YouTube";

/// Video type used for trailer selection
pub const TRAILER_TYPE: &str = "Trailer";

// =============================================================================
// Catalog Models
// =============================================================================

/// A movie as it appears in the paged catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub release_date: Option<String>,
}

impl Movie {
    /// Full poster URL, if the movie has a poster
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        image_url(image_base_url, self.poster_path.as_deref())
    }

    /// Full backdrop URL, if the movie has a backdrop
    pub fn backdrop_url(&self, image_base_url: &str) -> Option<String> {
        image_url(image_base_url, self.backdrop_path.as_deref())
    }

    /// Vote average with one decimal, e.g. "7.5"
    pub fn rating_text(&self) -> String {
        format!("{:.1}", self.vote_average)
    }

    /// Release date formatted for display, e.g. "Jan 1, 2023"
    pub fn formatted_release_date(&self) -> String {
        format_release_date(self.release_date.as_deref())
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self.formatted_release_date();
        if date.is_empty() {
            write!(f, "{} - ⭐ {}", self.title, self.rating_text())
        } else {
            write!(f, "{} ({}) - ⭐ {}", self.title, date, self.rating_text())
        }
    }
}

/// One page of the movie catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieResponse {
    pub page: u32,
    pub results: Vec<Movie>,
    pub total_pages: u32,
    pub total_results: u32,
}

// =============================================================================
// Detail Models
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Full movie information for the detail screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
}

impl MovieDetail {
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        image_url(image_base_url, self.poster_path.as_deref())
    }

    pub fn backdrop_url(&self, image_base_url: &str) -> Option<String> {
        image_url(image_base_url, self.backdrop_path.as_deref())
    }

    pub fn rating_text(&self) -> String {
        format!("{:.1}", self.vote_average)
    }

    pub fn formatted_release_date(&self) -> String {
        format_release_date(self.release_date.as_deref())
    }

    /// Runtime as "2h 28m", or None when TMDB has no runtime
    pub fn runtime_text(&self) -> Option<String> {
        match self.runtime {
            Some(0) | None => None,
            Some(minutes) if minutes < 60 => Some(format!("{}m", minutes)),
            Some(minutes) => Some(format!("{}h {}m", minutes / 60, minutes % 60)),
        }
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        let date = self.formatted_release_date();
        if !date.is_empty() {
            write!(f, " ({})", date)?;
        }
        if let Some(runtime) = self.runtime_text() {
            write!(f, " - {}", runtime)?;
        }
        write!(f, " - ⭐ {}", self.rating_text())
    }
}

// =============================================================================
// Reviews & Videos
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub results: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
}

impl Video {
    /// Whether this video is a YouTube-hosted trailer
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == YOUTUBE_SITE && self.video_type == TRAILER_TYPE
    }

    /// Watch URL for YouTube videos
    pub fn youtube_url(&self) -> Option<String> {
        (self.site == YOUTUBE_SITE).then(|| format!("https://www.youtube.com/watch?v={}", self.key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResponse {
    pub results: Vec<Video>,
}

// =============================================================================
// Helpers
// =============================================================================

fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    match path {
        Some(path) if !path.is_empty() => Some(format!("{}{}", base.trim_end_matches('/'), path)),
        _ => None,
    }
}

/// Format an ISO date ("2023-01-01") as "Jan 1, 2023"
fn format_release_date(date: Option<&str>) -> String {
    match date {
        None => String::new(),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie() -> Movie {
        Movie {
            id: 1,
            title: "Movie 1".into(),
            overview: "Overview 1".into(),
            poster_path: Some("/poster1.jpg".into()),
            backdrop_path: None,
            vote_average: 8.0,
            release_date: Some("2023-01-01".into()),
        }
    }

    #[test]
    fn test_rating_text() {
        let mut m = movie();
        assert_eq!(m.rating_text(), "8.0");
        m.vote_average = 7.46;
        assert_eq!(m.rating_text(), "7.5");
    }

    #[test]
    fn test_formatted_release_date() {
        let mut m = movie();
        assert_eq!(m.formatted_release_date(), "Jan 1, 2023");
        m.release_date = Some("2014-11-05".into());
        assert_eq!(m.formatted_release_date(), "Nov 5, 2014");
        m.release_date = Some("soon".into());
        assert_eq!(m.formatted_release_date(), "soon");
        m.release_date = None;
        assert_eq!(m.formatted_release_date(), "");
    }

    #[test]
    fn test_image_urls() {
        let m = movie();
        assert_eq!(
            m.poster_url("https://image.tmdb.org/t/p/w500/").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster1.jpg")
        );
        assert_eq!(m.backdrop_url("https://image.tmdb.org/t/p/w500"), None);
    }

    #[test]
    fn test_runtime_text() {
        let json = r#"{"id": 1, "title": "T", "runtime": 148}"#;
        let mut detail: MovieDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.runtime_text().as_deref(), Some("2h 28m"));
        detail.runtime = Some(45);
        assert_eq!(detail.runtime_text().as_deref(), Some("45m"));
        detail.runtime = Some(0);
        assert_eq!(detail.runtime_text(), None);
    }

    #[test]
    fn test_movie_decodes_sparse_fields() {
        let json = r#"{"id": 7, "title": "Sparse", "poster_path": null}"#;
        let m: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(m.id, 7);
        assert_eq!(m.overview, "");
        assert_eq!(m.vote_average, 0.0);
        assert!(m.release_date.is_none());
    }

    #[test]
    fn test_video_trailer_detection() {
        let json = r#"{"id": "v1", "key": "abc", "name": "Official Trailer", "site": "YouTube", "type": "Trailer"}"#;
        let video: Video = serde_json::from_str(json).unwrap();
        assert!(video.is_youtube_trailer());
        assert_eq!(
            video.youtube_url().as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );

        let vimeo = Video {
            site: "Vimeo".into(),
            ..video
        };
        assert!(!vimeo.is_youtube_trailer());
        assert_eq!(vimeo.youtube_url(), None);
    }
}
