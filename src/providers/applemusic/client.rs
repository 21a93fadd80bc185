//! Apple Music HTTP client
//!
//! Talks to the catalog API with a pre-issued developer token (a JWT
//! signed with the MusicKit private key; generating it is the operator's
//! problem, we just send it). All requests target one storefront.

use super::{adapter, dto};
use crate::providers::USER_AGENT;
use crate::providers::domain::{ProviderError, TrackRecord};

/// Storefront for catalog lookups; the produced URLs are /us/ links.
const STOREFRONT: &str = "us";

/// Apple Music catalog API client.
pub struct AppleMusicClient {
    http: reqwest::Client,
    developer_token: String,
    api_base: String,
}

impl AppleMusicClient {
    /// Create a new client with a developer token.
    pub fn new(developer_token: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            developer_token: developer_token.into(),
            api_base: "https://api.music.apple.com/v1".to_string(),
        }
    }

    /// Create a client for testing with a custom base URL.
    #[cfg(test)]
    pub fn with_base_url(developer_token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            developer_token: developer_token.into(),
            api_base: api_base.into(),
        }
    }

    /// Fetch a song by catalog id. Returns `None` for an unknown id.
    pub async fn fetch_song(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError> {
        let url = format!("{}/catalog/{}/songs/{}", self.api_base, STOREFRONT, id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.developer_token)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(response.status())?;

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let parsed: dto::SongsResponse = serde_json::from_value(raw.clone())
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parsed
            .data
            .into_iter()
            .next()
            .and_then(|song| adapter::to_record(song, Some(raw))))
    }

    /// Exact ISRC filter. Apple stores ISRCs uppercase.
    pub async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<TrackRecord>, ProviderError> {
        let url = format!("{}/catalog/{}/songs", self.api_base, STOREFRONT);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.developer_token)
            .query(&[("filter[isrc]", isrc.to_ascii_uppercase().as_str())])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        check_status(response.status())?;

        let parsed: dto::SongsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(adapter::to_records(parsed))
    }

    /// Free-text song search.
    pub async fn search_by_text(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ProviderError> {
        let url = format!("{}/catalog/{}/search", self.api_base, STOREFRONT);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.developer_token)
            .query(&[
                ("term", query),
                ("types", "songs"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        check_status(response.status())?;

        let parsed: dto::SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parsed
            .results
            .songs
            .map(adapter::to_records)
            .unwrap_or_default())
    }
}

fn check_status(status: reqwest::StatusCode) -> Result<(), ProviderError> {
    match status {
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => Err(
            ProviderError::Auth("developer token rejected".to_string()),
        ),
        reqwest::StatusCode::TOO_MANY_REQUESTS => Err(ProviderError::RateLimited),
        status if !status.is_success() => Err(ProviderError::Api(format!(
            "HTTP {}: {}",
            status,
            status.canonical_reason().unwrap_or("Unknown")
        ))),
        _ => Ok(()),
    }
}
