//! Musicfetch HTTP client
//!
//! Single-purpose: hand it a track URL, get back an ISRC when the service
//! can fingerprint the recording. Unknown URLs and tracks without an ISRC
//! both come back as `Ok(None)` - only transport and auth problems are
//! errors.

use super::dto;
use crate::providers::USER_AGENT;
use crate::providers::domain::ProviderError;

/// Musicfetch lookup client.
pub struct MusicfetchClient {
    http: reqwest::Client,
    token: Option<String>,
    api_base: String,
}

impl MusicfetchClient {
    /// Create a new client. The token is optional; without one the
    /// service enforces its anonymous quota.
    pub fn new(token: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            token,
            api_base: "https://api.musicfetch.io".to_string(),
        }
    }

    /// Create a client for testing with a custom base URL.
    #[cfg(test)]
    pub fn with_base_url(token: Option<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            api_base: api_base.into(),
        }
    }

    /// Look up the ISRC for a track URL. `None` when the service doesn't
    /// know the URL or the recording has no ISRC on file.
    pub async fn isrc_for_url(&self, url: &str) -> Result<Option<String>, ProviderError> {
        let endpoint = format!("{}/url", self.api_base);

        let mut request = self
            .http
            .post(&endpoint)
            .json(&serde_json::json!({ "url": url }));
        if let Some(token) = &self.token {
            request = request.header("x-token", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        match response.status() {
            reqwest::StatusCode::NOT_FOUND => return Ok(None),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                return Err(ProviderError::Auth("musicfetch token rejected".to_string()));
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(ProviderError::RateLimited),
            status if !status.is_success() => {
                return Err(ProviderError::Api(format!(
                    "HTTP {}: {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown")
                )));
            }
            _ => {}
        }

        let parsed: dto::UrlLookupResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parsed.result.and_then(|r| r.isrc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MusicfetchClient::new(Some("token".to_string()));
        assert_eq!(client.api_base, "https://api.musicfetch.io");
    }

    #[test]
    fn test_client_without_token() {
        let client = MusicfetchClient::new(None);
        assert!(client.token.is_none());
    }
}
