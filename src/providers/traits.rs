//! Trait definitions for the remote provider clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations; resolver tests
//! substitute the mocks below.

use async_trait::async_trait;

use super::domain::{ProviderError, TrackRecord};

/// Spotify Web API capability set.
#[async_trait]
pub trait SpotifyApi: Send + Sync {
    /// Fetch a track by its Spotify track id. `None` when unknown.
    async fn fetch_track(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError>;

    /// Exact-field search by ISRC (`isrc:` query filter).
    async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<TrackRecord>, ProviderError>;

    /// Free-text track search, bounded result count.
    async fn search_by_text(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ProviderError>;
}

/// Apple Music catalog API capability set.
#[async_trait]
pub trait AppleMusicApi: Send + Sync {
    /// Fetch a song by catalog id. `None` when unknown.
    async fn fetch_song(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError>;

    /// Exact ISRC filter (`filter[isrc]`).
    async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<TrackRecord>, ProviderError>;

    /// Free-text song search, bounded result count.
    async fn search_by_text(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ProviderError>;
}

/// YouTube Music capability set.
///
/// YouTube carries no ISRC in its own payloads; search is free-text only
/// and ISRCs come from the separate [`IsrcLookupApi`] collaborator.
#[async_trait]
pub trait YtMusicApi: Send + Sync {
    /// Fetch a video by its id. `None` when unknown.
    async fn fetch_video(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError>;

    /// Free-text music search, bounded result count.
    async fn search_by_text(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ProviderError>;
}

/// Secondary ISRC fingerprint collaborator, keyed by URL.
///
/// A miss is a legitimate outcome (`Ok(None)`), not an error.
#[async_trait]
pub trait IsrcLookupApi: Send + Sync {
    async fn isrc_for_url(&self, url: &str) -> Result<Option<String>, ProviderError>;
}

// Real client implementations

#[async_trait]
impl SpotifyApi for super::spotify::SpotifyClient {
    async fn fetch_track(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError> {
        self.fetch_track(id).await
    }

    async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<TrackRecord>, ProviderError> {
        self.search_by_isrc(isrc).await
    }

    async fn search_by_text(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ProviderError> {
        self.search_by_text(query, limit).await
    }
}

#[async_trait]
impl AppleMusicApi for super::applemusic::AppleMusicClient {
    async fn fetch_song(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError> {
        self.fetch_song(id).await
    }

    async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<TrackRecord>, ProviderError> {
        self.search_by_isrc(isrc).await
    }

    async fn search_by_text(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ProviderError> {
        self.search_by_text(query, limit).await
    }
}

#[async_trait]
impl YtMusicApi for super::ytmusic::YtMusicClient {
    async fn fetch_video(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError> {
        self.fetch_video(id).await
    }

    async fn search_by_text(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<TrackRecord>, ProviderError> {
        self.search_by_text(query, limit).await
    }
}

#[async_trait]
impl IsrcLookupApi for super::musicfetch::MusicfetchClient {
    async fn isrc_for_url(&self, url: &str) -> Result<Option<String>, ProviderError> {
        self.isrc_for_url(url).await
    }
}

/// Mock providers for resolver tests.
#[cfg(test)]
pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// A scriptable provider covering all three capability shapes.
    ///
    /// Configure it with the records each operation should return; calls
    /// are counted so tests can assert which ladder steps were taken.
    #[derive(Default)]
    pub struct MockProvider {
        /// Records returned by fetch, keyed by native id.
        pub by_id: HashMap<String, TrackRecord>,
        /// Records returned by ISRC search, keyed by lowercase ISRC.
        pub by_isrc: HashMap<String, Vec<TrackRecord>>,
        /// Records returned by any free-text search.
        pub by_text: Vec<TrackRecord>,
        /// Error returned by every call when set.
        pub error: Option<ProviderError>,
        /// Names of operations invoked, in order.
        pub calls: Mutex<Vec<&'static str>>,
    }

    impl MockProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_track(mut self, record: TrackRecord) -> Self {
            self.by_id.insert(record.id.clone(), record);
            self
        }

        pub fn with_isrc_hit(mut self, isrc: &str, records: Vec<TrackRecord>) -> Self {
            self.by_isrc.insert(isrc.to_ascii_lowercase(), records);
            self
        }

        pub fn with_text_hits(mut self, records: Vec<TrackRecord>) -> Self {
            self.by_text = records;
            self
        }

        pub fn with_error(mut self, error: ProviderError) -> Self {
            self.error = Some(error);
            self
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record_call(&self, name: &'static str) -> Result<(), ProviderError> {
            self.calls.lock().unwrap().push(name);
            match &self.error {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl SpotifyApi for MockProvider {
        async fn fetch_track(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError> {
            self.record_call("fetch_track")?;
            Ok(self.by_id.get(id).cloned())
        }

        async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<TrackRecord>, ProviderError> {
            self.record_call("search_by_isrc")?;
            Ok(self
                .by_isrc
                .get(&isrc.to_ascii_lowercase())
                .cloned()
                .unwrap_or_default())
        }

        async fn search_by_text(
            &self,
            _query: &str,
            limit: u32,
        ) -> Result<Vec<TrackRecord>, ProviderError> {
            self.record_call("search_by_text")?;
            Ok(self.by_text.iter().take(limit as usize).cloned().collect())
        }
    }

    #[async_trait]
    impl AppleMusicApi for MockProvider {
        async fn fetch_song(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError> {
            self.record_call("fetch_song")?;
            Ok(self.by_id.get(id).cloned())
        }

        async fn search_by_isrc(&self, isrc: &str) -> Result<Vec<TrackRecord>, ProviderError> {
            self.record_call("search_by_isrc")?;
            Ok(self
                .by_isrc
                .get(&isrc.to_ascii_lowercase())
                .cloned()
                .unwrap_or_default())
        }

        async fn search_by_text(
            &self,
            _query: &str,
            limit: u32,
        ) -> Result<Vec<TrackRecord>, ProviderError> {
            self.record_call("search_by_text")?;
            Ok(self.by_text.iter().take(limit as usize).cloned().collect())
        }
    }

    #[async_trait]
    impl YtMusicApi for MockProvider {
        async fn fetch_video(&self, id: &str) -> Result<Option<TrackRecord>, ProviderError> {
            self.record_call("fetch_video")?;
            Ok(self.by_id.get(id).cloned())
        }

        async fn search_by_text(
            &self,
            _query: &str,
            limit: u32,
        ) -> Result<Vec<TrackRecord>, ProviderError> {
            self.record_call("search_by_text")?;
            Ok(self.by_text.iter().take(limit as usize).cloned().collect())
        }
    }

    /// Mock ISRC fingerprint lookup keyed by URL.
    #[derive(Default)]
    pub struct MockIsrcLookup {
        /// ISRC per exact URL; URLs absent from the map return `None`.
        pub by_url: HashMap<String, String>,
        pub calls: Mutex<Vec<String>>,
    }

    impl MockIsrcLookup {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_isrc(mut self, url: &str, isrc: &str) -> Self {
            self.by_url.insert(url.to_string(), isrc.to_string());
            self
        }

        pub fn lookups(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl IsrcLookupApi for MockIsrcLookup {
        async fn isrc_for_url(&self, url: &str) -> Result<Option<String>, ProviderError> {
            self.calls.lock().unwrap().push(url.to_string());
            Ok(self.by_url.get(url).cloned())
        }
    }
}
