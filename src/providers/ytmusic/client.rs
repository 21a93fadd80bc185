//! YouTube Data API v3 HTTP client
//!
//! Key-authenticated, no OAuth. Search is restricted to the Music
//! category (categoryId 10) so a song query doesn't surface vlogs.

use super::{adapter, dto};
use crate::providers::USER_AGENT;
use crate::providers::domain::{ProviderError, TrackRecord};

/// YouTube's category id for music videos.
const MUSIC_CATEGORY_ID: &str = "10";

/// YouTube Data API client.
pub struct YtMusicClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
}

impl YtMusicClient {
    /// Create a new client with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            api_key: api_key.into(),
            api_base: "https://www.googleapis.com/youtube/v3".to_string(),
        }
    }

    /// Create a client for testing with a custom base URL.
    #[cfg(test)]
    pub fn with_base_url(api_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            api_base: api_base.into(),
        }
    }

    /// Fetch a video by id. Returns `None` for an unknown id (the API
    /// answers 200 with an empty item list, not 404).
    pub async fn fetch_video(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError> {
        let url = format!("{}/videos", self.api_base);

        let response = self
            .http
            .get(&url)
            .query(&[("part", "snippet"), ("id", id), ("key", &self.api_key)])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        check_status(response.status())?;

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let parsed: dto::VideoListResponse = serde_json::from_value(raw.clone())
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parsed
            .items
            .into_iter()
            .next()
            .map(|video| adapter::to_record(video, Some(raw))))
    }

    /// Free-text search within the music category.
    pub async fn search_by_text(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ProviderError> {
        let url = format!("{}/search", self.api_base);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("videoCategoryId", MUSIC_CATEGORY_ID),
                ("maxResults", &limit.to_string()),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        check_status(response.status())?;

        let parsed: dto::SearchListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(adapter::to_records(parsed))
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), ProviderError> {
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
            Err(ProviderError::Auth("API key rejected".to_string()))
        }
        reqwest::StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited),
        status if !status.is_success() => Err(ProviderError::Api(format!(
            "HTTP {}: {}",
            status,
            status.canonical_reason().unwrap_or("Unknown")
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = YtMusicClient::new("key");
        assert_eq!(client.api_base, "https://www.googleapis.com/youtube/v3");
    }
}
