//! Spotify HTTP client
//!
//! Uses the client-credentials flow: app credentials are exchanged for a
//! bearer token at accounts.spotify.com, cached until shortly before it
//! expires, and refreshed on demand. No user authorization is involved -
//! catalog lookup and search are app-level endpoints.

use std::time::{Duration, Instant};

use base64::Engine;
use tokio::sync::RwLock;

use super::{adapter, dto};
use crate::providers::USER_AGENT;
use crate::providers::domain::{ProviderError, TrackRecord};

/// Refresh the token this long before Spotify says it expires.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// Spotify Web API client.
pub struct SpotifyClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    token: RwLock<Option<CachedToken>>,
    api_base: String,
    auth_url: String,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl SpotifyClient {
    /// Create a new client with app credentials. No network happens until
    /// the first request.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: RwLock::new(None),
            api_base: "https://api.spotify.com/v1".to_string(),
            auth_url: "https://accounts.spotify.com/api/token".to_string(),
        }
    }

    /// Create a client for testing with custom endpoints.
    #[cfg(test)]
    pub fn with_base_urls(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_base: impl Into<String>,
        auth_url: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token: RwLock::new(None),
            api_base: api_base.into(),
            auth_url: auth_url.into(),
        }
    }

    /// Fetch a track by id. Returns `None` for an unknown id.
    pub async fn fetch_track(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError> {
        let token = self.access_token().await?;
        let url = format!("{}/tracks/{}", self.api_base, id);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::NOT_FOUND | reqwest::StatusCode::BAD_REQUEST => {
                // Spotify answers 400 for malformed ids and 404 for unknown
                // ones; both mean "no such track" to us.
                return Ok(None);
            }
            status => check_status(status, &response)?,
        }

        let raw: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;
        let track: dto::TrackObject = serde_json::from_value(raw.clone())
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(Some(adapter::to_record(track, Some(raw))))
    }

    /// Search by ISRC using the exact-field `isrc:` filter, single result.
    pub async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<TrackRecord>, ProviderError> {
        self.search_by_text(&format!("isrc:{isrc}"), 1).await
    }

    /// Free-text track search.
    pub async fn search_by_text(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ProviderError> {
        let token = self.access_token().await?;
        let url = format!("{}/search", self.api_base);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .query(&[
                ("q", query),
                ("type", "track"),
                ("limit", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        check_status(response.status(), &response)?;

        let parsed: dto::SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(adapter::to_records(parsed))
    }

    /// Get a valid bearer token, fetching or refreshing as needed.
    async fn access_token(&self) -> Result<String, ProviderError> {
        if let Some(token) = self.token.read().await.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let mut guard = self.token.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(token) = guard.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.client_id, self.client_secret));

        let response = self
            .http
            .post(&self.auth_url)
            .header("Authorization", format!("Basic {credentials}"))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProviderError::Auth(format!(
                "token request failed with HTTP {}",
                response.status()
            )));
        }

        let token: dto::TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let expires_at = Instant::now()
            + Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        let value = token.access_token.clone();
        *guard = Some(CachedToken {
            value: token.access_token,
            expires_at,
        });

        tracing::debug!("refreshed spotify access token");
        Ok(value)
    }
}

fn check_status(
    status: reqwest::StatusCode,
    _response: &reqwest::Response,
) -> Result<(), ProviderError> {
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ProviderError::Auth("access token rejected".to_string()));
    }
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }
    if !status.is_success() {
        return Err(ProviderError::Api(format!(
            "HTTP {}: {}",
            status,
            status.canonical_reason().unwrap_or("Unknown")
        )));
    }
    Ok(())
}
