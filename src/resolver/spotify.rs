//! Spotify resolver.
//!
//! Accepts `spotify:track:{id}` URIs, `open.spotify.com/track/{id}` URLs
//! (with or without query parameters) and bare track ids. Spotify carries
//! the ISRC in its own payloads, so no secondary lookup is involved, and
//! its exact-field search syntax lets the text fallback run with a single
//! candidate.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{Resolver, candidate_matches, song_from_record};
use crate::db;
use crate::error::{Error, Result};
use crate::model::{NativeId, Service, Song, native_url};
use crate::providers::{SpotifyApi, SpotifyClient};

pub struct SpotifyResolver<C = SpotifyClient> {
    pool: SqlitePool,
    client: C,
}

impl<C: SpotifyApi> SpotifyResolver<C> {
    pub fn new(pool: SqlitePool, client: C) -> Self {
        Self { pool, client }
    }

    /// Write-through helper: persist a provider record, then hand back its
    /// playback URL.
    async fn commit(&self, hit: &crate::providers::TrackRecord) -> Result<String> {
        db::upsert_track(
            &self.pool,
            Service::Spotify,
            &hit.id,
            hit.isrc.as_deref(),
            &hit.title,
            hit.first_artist(),
        )
        .await?;
        Ok(native_url(Service::Spotify, &NativeId::single(hit.id.clone())))
    }
}

/// Strip a Spotify track reference down to the bare track id.
fn native_id_from_reference(reference: &str) -> String {
    if reference.contains("spotify:track:") {
        return reference
            .rsplit(':')
            .next()
            .unwrap_or(reference)
            .to_string();
    }
    if let Some((_, tail)) = reference.rsplit_once("track/") {
        return tail.split('?').next().unwrap_or(tail).to_string();
    }
    // Assume it's already just the id.
    reference.to_string()
}

#[async_trait]
impl<C: SpotifyApi> Resolver for SpotifyResolver<C> {
    fn service(&self) -> Service {
        Service::Spotify
    }

    async fn locate(&self, reference: &str) -> Result<Song> {
        let uid = native_id_from_reference(reference);

        if let Some(row) = db::lookup_track(&self.pool, Service::Spotify, &uid).await? {
            tracing::debug!(uid, "spotify locate: cache hit");
            return Ok(row.into_song(Service::Spotify));
        }

        let Some(record) = self.client.fetch_track(&uid).await? else {
            return Err(Error::NoMatchFound);
        };
        db::upsert_track(
            &self.pool,
            Service::Spotify,
            &record.id,
            record.isrc.as_deref(),
            &record.title,
            record.first_artist(),
        )
        .await?;

        Ok(song_from_record(Service::Spotify, record))
    }

    async fn resolve(&self, song: &Song, best_match: bool) -> Result<String> {
        // Step 1 + 2: ISRC cache, then exact ISRC search.
        if let Some(isrc) = &song.isrc {
            if let Some(uid) = db::uid_for_isrc(&self.pool, Service::Spotify, isrc).await? {
                tracing::debug!(isrc, "spotify resolve: isrc cache hit");
                return Ok(native_url(Service::Spotify, &NativeId::Single(uid)));
            }

            let hits = self.client.search_by_isrc(isrc).await?;
            if let Some(mut hit) = hits.into_iter().next() {
                // The exact-field query guarantees the match; keep the query
                // ISRC if the payload omitted its own.
                hit.isrc.get_or_insert_with(|| isrc.clone());
                return self.commit(&hit).await;
            }
        }

        // Step 3: exact-field text search, single candidate.
        let query = format!("track:{} artist:{}", song.title, song.first_artist);
        let candidates = self.client.search_by_text(&query, 1).await?;
        for hit in &candidates {
            if candidate_matches(song, hit) {
                return self.commit(hit).await;
            }
        }

        // Step 4: opt-in loose fallback.
        if best_match {
            if let Some(hit) = candidates.first() {
                tracing::debug!(uid = %hit.id, "spotify resolve: best-match fallback");
                return self.commit(hit).await;
            }
        }

        Err(Error::NoMatchFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::traits::mocks::MockProvider;
    use crate::test_utils::{record, temp_db};

    fn source_song(isrc: Option<&str>, title: &str, artist: &str) -> Song {
        Song::new(
            Service::YtMusic,
            NativeId::single("src"),
            isrc,
            title,
            artist,
        )
    }

    #[test]
    fn test_native_id_from_reference() {
        assert_eq!(
            native_id_from_reference("spotify:track:4uLU6hMCjMI75M1A2tKUQC"),
            "4uLU6hMCjMI75M1A2tKUQC"
        );
        assert_eq!(
            native_id_from_reference(
                "https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC?si=abc123"
            ),
            "4uLU6hMCjMI75M1A2tKUQC"
        );
        assert_eq!(
            native_id_from_reference("https://open.spotify.com/track/4uLU6hMCjMI75M1A2tKUQC"),
            "4uLU6hMCjMI75M1A2tKUQC"
        );
        assert_eq!(
            native_id_from_reference("4uLU6hMCjMI75M1A2tKUQC"),
            "4uLU6hMCjMI75M1A2tKUQC"
        );
    }

    #[tokio::test]
    async fn test_locate_unseen_url_fetches_and_caches() {
        let (pool, _dir) = temp_db().await;
        let client = MockProvider::new().with_track(record(
            "track1",
            Some("USUM71703861"),
            "Song",
            "Artist",
        ));
        let resolver = SpotifyResolver::new(pool.clone(), client);

        assert_eq!(db::row_count(&pool, Service::Spotify).await.unwrap(), 0);

        let song = resolver
            .locate("https://open.spotify.com/track/track1?si=xyz")
            .await
            .unwrap();

        // Exactly one new row; identity carries the lowercase ISRC.
        assert_eq!(db::row_count(&pool, Service::Spotify).await.unwrap(), 1);
        assert_eq!(song.isrc.as_deref(), Some("usum71703861"));
        assert_eq!(song.source, Service::Spotify);
    }

    #[tokio::test]
    async fn test_locate_cache_hit_skips_provider() {
        let (pool, _dir) = temp_db().await;
        db::upsert_track(&pool, Service::Spotify, "track1", Some("abc"), "Song", "Artist")
            .await
            .unwrap();

        let client = MockProvider::new();
        let resolver = SpotifyResolver::new(pool, client);

        let song = resolver.locate("track1").await.unwrap();
        assert_eq!(song.title, "Song");
        assert!(resolver.client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_locate_unknown_id_is_no_match() {
        let (pool, _dir) = temp_db().await;
        let resolver = SpotifyResolver::new(pool, MockProvider::new());

        let err = resolver.locate("nope").await.unwrap_err();
        assert!(matches!(err, Error::NoMatchFound));
    }

    #[tokio::test]
    async fn test_resolve_isrc_cache_hit_never_reaches_search() {
        let (pool, _dir) = temp_db().await;
        db::upsert_track(
            &pool,
            Service::Spotify,
            "cached",
            Some("usum71703861"),
            "Song",
            "Artist",
        )
        .await
        .unwrap();

        // A looser text match is available, but the ladder must not get there.
        let client = MockProvider::new()
            .with_isrc_hit("usum71703861", vec![record("remote", Some("usum71703861"), "Song", "Artist")])
            .with_text_hits(vec![record("texthit", None, "Song", "Artist")]);
        let resolver = SpotifyResolver::new(pool, client);

        let url = resolver
            .resolve(&source_song(Some("USUM71703861"), "Song", "Artist"), false)
            .await
            .unwrap();

        assert_eq!(url, "https://open.spotify.com/track/cached");
        assert!(resolver.client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_remote_isrc_search() {
        let (pool, _dir) = temp_db().await;
        let client = MockProvider::new().with_isrc_hit(
            "usum71703861",
            vec![record("remote", Some("USUM71703861"), "Song", "Artist")],
        );
        let resolver = SpotifyResolver::new(pool.clone(), client);

        let url = resolver
            .resolve(&source_song(Some("usum71703861"), "Song", "Artist"), false)
            .await
            .unwrap();

        assert_eq!(url, "https://open.spotify.com/track/remote");
        // Write-through: the match is in the cache now.
        let uid = db::uid_for_isrc(&pool, Service::Spotify, "usum71703861")
            .await
            .unwrap();
        assert_eq!(uid.as_deref(), Some("remote"));
    }

    #[tokio::test]
    async fn test_resolve_text_fallback_requires_verified_match() {
        let (pool, _dir) = temp_db().await;
        // Candidate has a different ISRC: must be rejected without best_match.
        let client = MockProvider::new()
            .with_text_hits(vec![record("texthit", Some("zz0000000000"), "Song", "Artist")]);
        let resolver = SpotifyResolver::new(pool.clone(), client);

        let err = resolver
            .resolve(&source_song(Some("usum71703861"), "Song", "Artist"), false)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoMatchFound));
        assert_eq!(db::row_count(&pool, Service::Spotify).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_resolve_text_fallback_accepts_isrc_match() {
        let (pool, _dir) = temp_db().await;
        let client = MockProvider::new()
            .with_text_hits(vec![record("texthit", Some("USUM71703861"), "Song", "Artist")]);
        let resolver = SpotifyResolver::new(pool, client);

        let url = resolver
            .resolve(&source_song(Some("usum71703861"), "Song", "Artist"), false)
            .await
            .unwrap();
        assert_eq!(url, "https://open.spotify.com/track/texthit");
    }

    #[tokio::test]
    async fn test_resolve_similarity_when_no_isrc_available() {
        let (pool, _dir) = temp_db().await;
        let client = MockProvider::new().with_text_hits(vec![record(
            "texthit",
            None,
            "Song Name (Official Music Video)",
            "Artist",
        )]);
        let resolver = SpotifyResolver::new(pool, client);

        let url = resolver
            .resolve(&source_song(None, "Song Name", "Artist"), false)
            .await
            .unwrap();
        assert_eq!(url, "https://open.spotify.com/track/texthit");
    }

    #[tokio::test]
    async fn test_resolve_best_match_accepts_first_candidate() {
        let (pool, _dir) = temp_db().await;
        let client = MockProvider::new()
            .with_text_hits(vec![record("loose", Some("zz0000000000"), "Other", "Artist")]);
        let resolver = SpotifyResolver::new(pool.clone(), client);

        let url = resolver
            .resolve(&source_song(Some("usum71703861"), "Song", "Artist"), true)
            .await
            .unwrap();
        assert_eq!(url, "https://open.spotify.com/track/loose");
        assert_eq!(db::row_count(&pool, Service::Spotify).await.unwrap(), 1);
    }
}
