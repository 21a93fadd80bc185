//! Per-service resolvers: the song-identity resolution protocol.
//!
//! Each service implements the same two-way contract behind the
//! [`Resolver`] trait:
//!
//! - `locate`: native reference -> [`Song`] identity. Normalize the
//!   reference, consult the identity cache (authoritative once populated),
//!   fall back to the remote provider, write through to the cache.
//! - `resolve`: [`Song`] identity -> native URL, via a strict decision
//!   ladder: ISRC cache hit, then remote ISRC search, then bounded
//!   free-text search with verified acceptance, then the opt-in
//!   `best_match` fallback, then [`Error::NoMatchFound`].
//!
//! Every successful remote-derived match is persisted before it is
//! returned, so the cache always reflects exactly what has been handed to
//! a caller at least once. Partial progress survives a failed conversion:
//! the source-side identity stays cached even when the target side fails.
//!
//! Provider SDK specifics are injected as dependencies (the capability
//! traits in [`crate::providers::traits`]); the resolvers own the
//! interface.

pub mod applemusic;
pub mod spotify;
pub mod ytmusic;

pub use applemusic::AppleMusicResolver;
pub use spotify::SpotifyResolver;
pub use ytmusic::YtMusicResolver;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::model::{NativeId, Service, Song};
use crate::providers::TrackRecord;

/// Two-way translation between native references and song identities,
/// one implementation per service.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// The service this resolver speaks for.
    fn service(&self) -> Service;

    /// Translate a native reference (URL/URI/ID) into a song identity.
    async fn locate(&self, reference: &str) -> Result<Song>;

    /// Translate a song identity into a native URL on this service.
    ///
    /// With `best_match` the caller opts into accepting the top search
    /// result even without a verified ISRC or similarity match.
    async fn resolve(&self, song: &Song, best_match: bool) -> Result<String>;
}

/// Registry of resolvers, one per service, exposing the single
/// `convert` entry point the command surface calls.
#[derive(Default)]
pub struct ResolverSet {
    resolvers: HashMap<Service, Arc<dyn Resolver>>,
}

impl ResolverSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resolver under its own service.
    pub fn register(&mut self, resolver: Arc<dyn Resolver>) {
        self.resolvers.insert(resolver.service(), resolver);
    }

    /// Look up the resolver for a service.
    pub fn resolver_for(&self, service: Service) -> Result<&dyn Resolver> {
        self.resolvers
            .get(&service)
            .map(Arc::as_ref)
            .ok_or_else(|| Error::NoServiceMatched(service.to_string()))
    }

    /// Convert a native reference on one service into the equivalent URL
    /// on another: locate on the source, resolve on the target.
    pub async fn convert(
        &self,
        from: Service,
        to: Service,
        reference: &str,
        best_match: bool,
    ) -> Result<String> {
        let source = self.resolver_for(from)?;
        let target = self.resolver_for(to)?;

        let song = source.locate(reference).await?;
        tracing::info!(
            %from,
            title = %song.title,
            artist = %song.first_artist,
            isrc = song.isrc.as_deref(),
            "located song identity"
        );

        let url = target.resolve(&song, best_match).await?;
        tracing::info!(%to, url, "resolved target url");
        Ok(url)
    }
}

/// Build a song identity from a provider record on a single-key service.
/// Apple Music builds its own pair-keyed identities.
pub(crate) fn song_from_record(service: Service, record: TrackRecord) -> Song {
    let TrackRecord {
        id,
        isrc,
        title,
        artists,
        raw,
        ..
    } = record;
    let first_artist = artists.into_iter().next().unwrap_or_default();
    let mut song = Song::new(service, NativeId::Single(id), isrc.as_deref(), title, first_artist);
    if let Some(raw) = raw {
        song = song.with_attributes(raw);
    }
    song
}

/// Strict-match acceptance for a text-search candidate: a verified ISRC
/// match when both sides carry one, the similarity heuristic otherwise.
/// Never consulted when the ISRCs disagree - that is a hard reject.
pub(crate) fn candidate_matches(source: &Song, candidate: &TrackRecord) -> bool {
    match (&source.isrc, &candidate.isrc) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => {
            // Identity is irrelevant to is_similar; a throwaway probe with
            // a single key works for every service.
            let probe = Song::new(
                source.source,
                NativeId::single(candidate.id.clone()),
                None,
                candidate.title.clone(),
                candidate.first_artist().to_string(),
            );
            source.is_similar(&probe)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::record;

    struct StubResolver {
        service: Service,
        url: String,
    }

    #[async_trait]
    impl Resolver for StubResolver {
        fn service(&self) -> Service {
            self.service
        }

        async fn locate(&self, reference: &str) -> Result<Song> {
            Ok(Song::new(
                self.service,
                NativeId::single(reference),
                Some("USUM71703861"),
                "Title",
                "Artist",
            ))
        }

        async fn resolve(&self, _song: &Song, _best_match: bool) -> Result<String> {
            Ok(self.url.clone())
        }
    }

    #[tokio::test]
    async fn test_convert_dispatches_locate_then_resolve() {
        let mut set = ResolverSet::new();
        set.register(Arc::new(StubResolver {
            service: Service::Spotify,
            url: "unused".to_string(),
        }));
        set.register(Arc::new(StubResolver {
            service: Service::YtMusic,
            url: "https://music.youtube.com/watch?v=abc".to_string(),
        }));

        let url = set
            .convert(Service::Spotify, Service::YtMusic, "ref", false)
            .await
            .unwrap();
        assert_eq!(url, "https://music.youtube.com/watch?v=abc");
    }

    #[tokio::test]
    async fn test_unregistered_service_is_no_service_matched() {
        let set = ResolverSet::new();
        let err = set
            .convert(Service::Spotify, Service::YtMusic, "ref", false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoServiceMatched(_)));
    }

    #[test]
    fn test_candidate_matches_prefers_isrc() {
        let source = Song::new(
            Service::Spotify,
            NativeId::single("s"),
            Some("USUM71703861"),
            "Completely Different Title",
            "Different Artist",
        );
        // ISRC agreement wins despite unrelated titles.
        assert!(candidate_matches(
            &source,
            &record("c", Some("usum71703861"), "Whatever", "Whoever"),
        ));
        // ISRC disagreement is a hard reject, even with identical titles.
        assert!(!candidate_matches(
            &source,
            &record(
                "c",
                Some("zz9999999999"),
                "Completely Different Title",
                "Different Artist",
            ),
        ));
    }

    #[test]
    fn test_candidate_matches_falls_back_to_similarity() {
        let source = Song::new(
            Service::Spotify,
            NativeId::single("s"),
            None,
            "Song Name",
            "Artist",
        );
        assert!(candidate_matches(
            &source,
            &record("c", None, "Song Name (Official Music Video)", "Artist"),
        ));
        assert!(!candidate_matches(
            &source,
            &record("c", None, "Song Name", "Somebody Else"),
        ));
    }
}
