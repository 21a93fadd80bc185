//! Apple Music resolver.
//!
//! Apple identifies a playable song by a `(song_id, album_id)` pair; the
//! album id only appears in the URL attribute of the catalog payload, so
//! candidates whose payload lacks one cannot be linked and are skipped.
//!
//! Accepted reference forms:
//! - `music.apple.com/{storefront}/album/{slug}/{album_id}?i={song_id}`
//! - `music.apple.com/{storefront}/song/{slug}/{song_id}`
//! - a bare catalog song id

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::{Resolver, candidate_matches};
use crate::db;
use crate::error::{Error, Result};
use crate::model::{NativeId, Service, Song, native_url};
use crate::providers::{AppleMusicApi, AppleMusicClient, TrackRecord};

const SEARCH_LIMIT: u32 = 5;

pub struct AppleMusicResolver<C = AppleMusicClient> {
    pool: SqlitePool,
    client: C,
}

impl<C: AppleMusicApi> AppleMusicResolver<C> {
    pub fn new(pool: SqlitePool, client: C) -> Self {
        Self { pool, client }
    }

    async fn commit(&self, hit: &TrackRecord, album_id: &str) -> Result<String> {
        db::upsert_apple_song(
            &self.pool,
            &hit.id,
            album_id,
            hit.isrc.as_deref(),
            &hit.title,
            hit.first_artist(),
        )
        .await?;
        Ok(song_url(&hit.id, album_id))
    }
}

fn song_url(song_id: &str, album_id: &str) -> String {
    native_url(Service::AppleMusic, &NativeId::pair(song_id, album_id))
}

/// Parse an Apple Music reference into `(song_id, album_id)`. The album
/// id is only present in the `album/...?i=` form.
fn ids_from_reference(reference: &str) -> (String, Option<String>) {
    if let Some((head, song_id)) = reference.split_once("?i=") {
        let song_id = song_id.split('&').next().unwrap_or(song_id);
        let album_id = head.rsplit('/').next().unwrap_or_default();
        return (song_id.to_string(), Some(album_id.to_string()));
    }
    if let Some((_, tail)) = reference.rsplit_once("/song/") {
        let song_id = tail.rsplit('/').next().unwrap_or(tail);
        let song_id = song_id.split('?').next().unwrap_or(song_id);
        return (song_id.to_string(), None);
    }
    (reference.to_string(), None)
}

fn pair_song(record: &TrackRecord, album_id: &str) -> Song {
    let mut song = Song::new(
        Service::AppleMusic,
        NativeId::pair(record.id.clone(), album_id),
        record.isrc.as_deref(),
        record.title.clone(),
        record.first_artist().to_string(),
    );
    if let Some(raw) = &record.raw {
        song = song.with_attributes(raw.clone());
    }
    song
}

#[async_trait]
impl<C: AppleMusicApi> Resolver for AppleMusicResolver<C> {
    fn service(&self) -> Service {
        Service::AppleMusic
    }

    async fn locate(&self, reference: &str) -> Result<Song> {
        let (song_id, album_id) = ids_from_reference(reference);

        if let Some(album_id) = &album_id {
            if let Some(row) = db::lookup_apple_song(&self.pool, &song_id, album_id).await? {
                tracing::debug!(song_id, album_id, "applemusic locate: cache hit");
                return Ok(row.into_song());
            }
        }

        let Some(record) = self.client.fetch_song(&song_id).await? else {
            return Err(Error::NoMatchFound);
        };
        // The catalog payload is the authority on the album id; the one
        // parsed out of the reference is only a cache probe.
        let Some(album_id) = record.album_id.clone().or(album_id) else {
            tracing::warn!(song_id, "applemusic locate: payload has no album id");
            return Err(Error::NoMatchFound);
        };

        db::upsert_apple_song(
            &self.pool,
            &record.id,
            &album_id,
            record.isrc.as_deref(),
            &record.title,
            record.first_artist(),
        )
        .await?;

        Ok(pair_song(&record, &album_id))
    }

    async fn resolve(&self, song: &Song, best_match: bool) -> Result<String> {
        if let Some(isrc) = &song.isrc {
            if let Some((song_id, album_id)) = db::apple_ids_for_isrc(&self.pool, isrc).await? {
                tracing::debug!(isrc, "applemusic resolve: isrc cache hit");
                return Ok(song_url(&song_id, &album_id));
            }

            let hits = self.client.search_by_isrc(isrc).await?;
            for mut hit in hits {
                let Some(album_id) = hit.album_id.clone() else {
                    continue;
                };
                hit.isrc.get_or_insert_with(|| isrc.clone());
                return self.commit(&hit, &album_id).await;
            }
        }

        let query = format!("{} {}", song.title, song.first_artist);
        let candidates = self.client.search_by_text(&query, SEARCH_LIMIT).await?;
        for hit in &candidates {
            let Some(album_id) = &hit.album_id else {
                continue;
            };
            if candidate_matches(song, hit) {
                return self.commit(hit, album_id).await;
            }
        }

        if best_match {
            let first_linkable = candidates
                .iter()
                .find_map(|hit| hit.album_id.as_deref().map(|album_id| (hit, album_id)));
            if let Some((hit, album_id)) = first_linkable {
                tracing::debug!(song_id = %hit.id, "applemusic resolve: best-match fallback");
                return self.commit(hit, album_id).await;
            }
        }

        Err(Error::NoMatchFound)
    }
}
