//! Internal domain models for the provider layer.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All provider responses get converted into these via the per-service
//! adapters.

/// A track as a remote provider reports it, reduced to what resolution
/// needs: a native id, an ISRC when the provider carries one, a title,
/// and the credited artists in order.
#[derive(Debug, Clone)]
pub struct TrackRecord {
    /// Native id on the provider (Spotify track id, Apple song id,
    /// YouTube video id).
    pub id: String,
    /// Album id, Apple Music only (part of its composite key).
    pub album_id: Option<String>,
    /// ISRC as reported; not every provider carries one.
    pub isrc: Option<String>,
    /// Display title.
    pub title: String,
    /// Credited artists, primary first.
    pub artists: Vec<String>,
    /// Raw provider payload, passed through on the resulting identity.
    pub raw: Option<serde_json::Value>,
}

impl TrackRecord {
    /// The primary credited artist; empty when the provider credited nobody.
    pub fn first_artist(&self) -> &str {
        self.artists.first().map(String::as_str).unwrap_or("")
    }
}

/// Errors from remote provider calls.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limited - try again later")]
    RateLimited,
}
