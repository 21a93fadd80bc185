//! Spotify Web API Data Transfer Objects
//!
//! These types match EXACTLY what the Spotify API returns - do not add
//! fields that aren't in the response, and do not use them outside this
//! module; convert to [`crate::providers::TrackRecord`] via the adapter.
//!
//! API Reference: https://developer.spotify.com/documentation/web-api

use serde::Deserialize;

/// Response from the client-credentials token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// A full track object (`GET /v1/tracks/{id}` and search items).
#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistObject>,
    #[serde(default)]
    pub external_ids: ExternalIds,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistObject {
    pub name: String,
}

/// Cross-catalog identifiers; Spotify carries the ISRC here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalIds {
    pub isrc: Option<String>,
}

/// `GET /v1/search?type=track` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub items: Vec<TrackObject>,
}

/// Error envelope (`{"error": {"status": 404, "message": "..."}}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

// Contract tests: verify the DTOs parse what the real API returns.
