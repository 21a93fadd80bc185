//! Apple Music API Data Transfer Objects
//!
//! These types match EXACTLY what the Apple Music catalog API returns.
//! Convert to [`crate::providers::TrackRecord`] via the adapter; never use
//! them outside this module.
//!
//! API Reference: https://developer.apple.com/documentation/applemusicapi

use serde::Deserialize;

/// Envelope for song endpoints (`/v1/catalog/{storefront}/songs/...`).
#[derive(Debug, Clone, Deserialize)]
pub struct SongsResponse {
    #[serde(default)]
    pub data: Vec<SongData>,
}

/// One catalog song resource.
#[derive(Debug, Clone, Deserialize)]
pub struct SongData {
    pub id: String,
    pub attributes: Option<SongAttributes>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    pub name: String,
    pub artist_name: String,
    pub isrc: Option<String>,
    /// Canonical web URL; the album id is its last path segment before
    /// the `?i=` query.
    pub url: String,
}

/// `/v1/catalog/{storefront}/search` response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub results: SearchResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    pub songs: Option<SongsResponse>,
}

/// Error envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorsResponse {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub status: String,
    pub detail: Option<String>,
}

// Contract tests: verify the DTOs parse what the real API returns.

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_song() {
        let json = r#"{
            "data": [{
                "id": "1440857786",
                "type": "songs",
                "attributes": {
                    "name": "Hey Jude",
                    "artistName": "The Beatles",
                    "isrc": "GBAYE6800310",
                    "albumName": "Hey Jude",
                    "url": "https://music.apple.com/us/album/hey-jude/1440857781?i=1440857786"
                }
            }]
        }"#;

        let response: SongsResponse = serde_json::from_str(json).expect("should parse");
        let song = &response.data[0];
        let attrs = song.attributes.as_ref().unwrap();
        assert_eq!(song.id, "1440857786");
        assert_eq!(attrs.artist_name, "The Beatles");
        assert_eq!(attrs.isrc.as_deref(), Some("GBAYE6800310"));
    }

    #[test]
    fn test_parse_empty_data() {
        let response: SongsResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(response.data.is_empty());
    }

    #[test]
    fn test_parse_search_without_song_results() {
        let json = r#"{"results": {"artists": {"data": []}}}"#;
        let response: SearchResponse = serde_json::from_str(json).expect("should parse");
        assert!(response.results.songs.is_none());
    }

    #[test]
    fn test_parse_error_envelope() {
        let json = r#"{"errors": [{"id": "x", "status": "404", "detail": "Resource not found"}]}"#;
        let errors: ErrorsResponse = serde_json::from_str(json).expect("should parse");
        assert_eq!(errors.errors[0].status, "404");
    }
}
