//! YouTube Data API v3 Data Transfer Objects
//!
//! These types match EXACTLY what the API returns for `videos.list` and
//! `search.list`. Convert to [`crate::providers::TrackRecord`] via the
//! adapter; never use them outside this module.
//!
//! API Reference: https://developers.google.com/youtube/v3/docs

use serde::Deserialize;

/// `GET /videos?part=snippet` response.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub id: String,
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub title: String,
    /// For music uploads this is usually "Artist - Topic".
    pub channel_title: String,
}

/// `GET /search?part=snippet` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    pub id: SearchResultId,
    pub snippet: Snippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultId {
    /// Present only when the result is a video.
    pub video_id: Option<String>,
}

// Contract tests: verify the DTOs parse what the real API returns.
