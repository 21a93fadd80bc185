//! Musicfetch API Data Transfer Objects
//!
//! Matches the `POST /url` lookup response. Only the ISRC is of interest;
//! the service returns a lot more (links on other platforms, artwork)
//! that we ignore.

use serde::Deserialize;

/// Response from the URL lookup endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlLookupResponse {
    pub result: Option<TrackResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackResult {
    pub isrc: Option<String>,
}
