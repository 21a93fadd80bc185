//! YouTube Music resolver.
//!
//! YouTube's own payloads carry no ISRC, so this resolver leans on the
//! musicfetch collaborator (keyed by watch URL) for everything
//! ISRC-related:
//!
//! - `locate` fingerprints the video after the provider fetch; a miss
//!   writes a NULL-ISRC cache row and is not a failure.
//! - `resolve`'s remote ISRC search is a plain text search with the ISRC
//!   as the query, and every candidate it returns gets its fingerprinted
//!   ISRC re-verified before acceptance - the generic search happily
//!   returns same-artist false friends. A mismatch falls through, it is
//!   not an error.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{Resolver, song_from_record};
use crate::db;
use crate::error::{Error, Result};
use crate::model::{NativeId, Service, Song, native_url};
use crate::providers::{IsrcLookupApi, MusicfetchClient, TrackRecord, YtMusicApi, YtMusicClient};

/// Text-search window: wide enough to get past remasters and re-uploads.
const SEARCH_LIMIT: u32 = 5;

pub struct YtMusicResolver<C = YtMusicClient, F = MusicfetchClient> {
    pool: SqlitePool,
    client: C,
    isrc_lookup: F,
}

impl<C: YtMusicApi, F: IsrcLookupApi> YtMusicResolver<C, F> {
    pub fn new(pool: SqlitePool, client: C, isrc_lookup: F) -> Self {
        Self {
            pool,
            client,
            isrc_lookup,
        }
    }

    async fn commit(&self, hit: &TrackRecord, isrc: Option<&str>) -> Result<String> {
        db::upsert_track(
            &self.pool,
            Service::YtMusic,
            &hit.id,
            isrc,
            &hit.title,
            hit.first_artist(),
        )
        .await?;
        Ok(watch_url(&hit.id))
    }
}

fn watch_url(video_id: &str) -> String {
    native_url(Service::YtMusic, &NativeId::single(video_id))
}

/// Strip a YouTube URL down to the video id.
fn video_id_from_reference(reference: &str) -> String {
    let mut id = reference;
    if let Some((_, tail)) = id.split_once("/watch?v=") {
        id = tail;
    }
    if let Some((head, _)) = id.split_once('&') {
        id = head;
    }
    id.to_string()
}

#[async_trait]
impl<C: YtMusicApi, F: IsrcLookupApi> Resolver for YtMusicResolver<C, F> {
    fn service(&self) -> Service {
        Service::YtMusic
    }

    async fn locate(&self, reference: &str) -> Result<Song> {
        let uid = video_id_from_reference(reference);

        if let Some(row) = db::lookup_track(&self.pool, Service::YtMusic, &uid).await? {
            tracing::debug!(uid, "ytmusic locate: cache hit");
            return Ok(row.into_song(Service::YtMusic));
        }

        let Some(mut record) = self.client.fetch_video(&uid).await? else {
            return Err(Error::NoMatchFound);
        };

        // The fingerprint lookup can legitimately miss; the row is then
        // written with a NULL ISRC and corrected on a later pass.
        record.isrc = self.isrc_lookup.isrc_for_url(&watch_url(&record.id)).await?;
        if record.isrc.is_none() {
            tracing::debug!(uid, "ytmusic locate: no isrc fingerprint for video");
        }

        db::upsert_track(
            &self.pool,
            Service::YtMusic,
            &record.id,
            record.isrc.as_deref(),
            &record.title,
            record.first_artist(),
        )
        .await?;

        Ok(song_from_record(Service::YtMusic, record))
    }

    async fn resolve(&self, song: &Song, best_match: bool) -> Result<String> {
        // Step 1 + 2: ISRC cache, then ISRC-as-query search with
        // fingerprint re-verification.
        if let Some(isrc) = &song.isrc {
            if let Some(uid) = db::uid_for_isrc(&self.pool, Service::YtMusic, isrc).await? {
                tracing::debug!(isrc, "ytmusic resolve: isrc cache hit");
                return Ok(watch_url(&uid));
            }

            let hits = self.client.search_by_text(isrc, 1).await?;
            for hit in &hits {
                let found = self.isrc_lookup.isrc_for_url(&watch_url(&hit.id)).await?;
                match found {
                    Some(found) if found.eq_ignore_ascii_case(isrc) => {
                        return self.commit(hit, Some(&found)).await;
                    }
                    _ => {
                        // False friend or no fingerprint: fall through.
                        tracing::debug!(uid = %hit.id, "ytmusic resolve: isrc search candidate rejected");
                    }
                }
            }
        }

        // Step 3: free-text search by title and artist.
        let query = format!("{} {}", song.title, song.first_artist);
        let candidates = self.client.search_by_text(&query, SEARCH_LIMIT).await?;
        for hit in &candidates {
            if let Some(isrc) = &song.isrc {
                match self.isrc_lookup.isrc_for_url(&watch_url(&hit.id)).await? {
                    Some(found) if found.eq_ignore_ascii_case(isrc) => {
                        return self.commit(hit, Some(&found)).await;
                    }
                    Some(_) => continue, // fingerprint says different recording
                    None => {
                        if similar(song, hit) {
                            return self.commit(hit, None).await;
                        }
                    }
                }
            } else if similar(song, hit) {
                let found = self.isrc_lookup.isrc_for_url(&watch_url(&hit.id)).await?;
                return self.commit(hit, found.as_deref()).await;
            }
        }

        // Step 4: opt-in loose fallback, first candidate of the same
        // search that failed the strict pass.
        if best_match {
            if let Some(hit) = candidates.first() {
                tracing::debug!(uid = %hit.id, "ytmusic resolve: best-match fallback");
                let found = self.isrc_lookup.isrc_for_url(&watch_url(&hit.id)).await?;
                return self.commit(hit, found.as_deref()).await;
            }
        }

        Err(Error::NoMatchFound)
    }
}

fn similar(song: &Song, hit: &TrackRecord) -> bool {
    let probe = Song::new(
        Service::YtMusic,
        NativeId::single(hit.id.clone()),
        None,
        hit.title.clone(),
        hit.first_artist().to_string(),
    );
    song.is_similar(&probe)
}
