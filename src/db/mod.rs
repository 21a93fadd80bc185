//! Identity cache on SQLite.
//!
//! One logical table per service, keyed by the service's native identity:
//! `spotify` and `ytmusic` key on a single `uid`, `applemusic` keys on the
//! composite `(songid, albumid)`. Every row is an upsert target - a row may
//! first be written with a NULL ISRC and corrected later once a secondary
//! ISRC lookup succeeds.
//!
//! Writes commit synchronously before the caller proceeds. Volume is one
//! interactive request at a time, so correctness beats throughput here.
//! Once populated, a row is authoritative: there is no freshness check and
//! no TTL.

use std::path::Path;

use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::model::{NativeId, Service, Song, normalize_isrc};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "trackbridge.db";

/// Build a SQLite database URL from an optional path.
pub fn db_url(path: Option<&Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{DEFAULT_DB_NAME}"),
    }
}

/// Initialize the cache connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool, and runs all pending migrations.
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if !sqlx::Sqlite::database_exists(db_url).await.unwrap_or(false) {
        sqlx::Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// A cached row from one of the single-key tables (`spotify`, `ytmusic`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CachedTrack {
    /// Native id (Spotify track id, YouTube video id)
    pub uid: String,
    /// ISRC, lowercase; NULL when the secondary lookup missed
    pub isrc: Option<String>,
    /// Display title
    pub title: String,
    /// Primary credited artist
    pub first_artist: String,
}

impl CachedTrack {
    /// Rehydrate a song identity from this row.
    pub fn into_song(self, service: Service) -> Song {
        Song::new(
            service,
            NativeId::Single(self.uid),
            self.isrc.as_deref(),
            self.title,
            self.first_artist,
        )
    }
}

/// A cached row from the composite-key `applemusic` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CachedAppleSong {
    pub songid: String,
    pub albumid: String,
    pub isrc: Option<String>,
    pub title: String,
    pub artist: String,
}

impl CachedAppleSong {
    /// Rehydrate a song identity from this row.
    pub fn into_song(self) -> Song {
        Song::new(
            Service::AppleMusic,
            NativeId::pair(self.songid, self.albumid),
            self.isrc.as_deref(),
            self.title,
            self.artist,
        )
    }
}

/// Table name for the single-key services.
fn single_key_table(service: Service) -> &'static str {
    match service {
        Service::Spotify => "spotify",
        Service::YtMusic => "ytmusic",
        Service::AppleMusic => unreachable!("applemusic keys on (songid, albumid)"),
    }
}

/// Look up a cached track by its native id (`spotify`/`ytmusic` tables).
pub async fn lookup_track(
    pool: &SqlitePool,
    service: Service,
    uid: &str,
) -> sqlx::Result<Option<CachedTrack>> {
    let sql = format!(
        "SELECT uid, isrc, title, first_artist FROM {} WHERE uid = ?",
        single_key_table(service)
    );
    sqlx::query_as::<_, CachedTrack>(&sql)
        .bind(uid)
        .fetch_optional(pool)
        .await
}

/// Look up the native id for an ISRC (`spotify`/`ytmusic` tables).
///
/// Returns just the id - enough to build a URL without a full row fetch.
pub async fn uid_for_isrc(
    pool: &SqlitePool,
    service: Service,
    isrc: &str,
) -> sqlx::Result<Option<String>> {
    let sql = format!(
        "SELECT uid FROM {} WHERE isrc = ? LIMIT 1",
        single_key_table(service)
    );
    let row: Option<(String,)> = sqlx::query_as(&sql)
        .bind(isrc.to_ascii_lowercase())
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(uid,)| uid))
}

/// Insert or overwrite a track row (`spotify`/`ytmusic` tables).
///
/// Idempotent: a second write for the same uid overwrites isrc, title and
/// first_artist. Commits before returning.
pub async fn upsert_track(
    pool: &SqlitePool,
    service: Service,
    uid: &str,
    isrc: Option<&str>,
    title: &str,
    first_artist: &str,
) -> sqlx::Result<()> {
    let isrc = normalize_isrc(isrc);
    let sql = format!(
        r#"
        INSERT INTO {} (uid, isrc, title, first_artist)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(uid) DO UPDATE SET
            isrc = excluded.isrc,
            title = excluded.title,
            first_artist = excluded.first_artist
        "#,
        single_key_table(service)
    );
    sqlx::query(&sql)
        .bind(uid)
        .bind(&isrc)
        .bind(title)
        .bind(first_artist)
        .execute(pool)
        .await?;
    tracing::debug!(%service, uid, isrc = isrc.as_deref(), "cached track");
    Ok(())
}

/// Look up a cached Apple Music song by its composite key.
pub async fn lookup_apple_song(
    pool: &SqlitePool,
    song_id: &str,
    album_id: &str,
) -> sqlx::Result<Option<CachedAppleSong>> {
    sqlx::query_as::<_, CachedAppleSong>(
        "SELECT songid, albumid, isrc, title, artist FROM applemusic WHERE songid = ? AND albumid = ?",
    )
    .bind(song_id)
    .bind(album_id)
    .fetch_optional(pool)
    .await
}

/// Look up the `(song_id, album_id)` pair for an ISRC on Apple Music.
pub async fn apple_ids_for_isrc(
    pool: &SqlitePool,
    isrc: &str,
) -> sqlx::Result<Option<(String, String)>> {
    sqlx::query_as::<_, (String, String)>(
        "SELECT songid, albumid FROM applemusic WHERE isrc = ? LIMIT 1",
    )
    .bind(isrc.to_ascii_lowercase())
    .fetch_optional(pool)
    .await
}

/// Insert or overwrite an Apple Music row. Same overwrite semantics as
/// [`upsert_track`].
pub async fn upsert_apple_song(
    pool: &SqlitePool,
    song_id: &str,
    album_id: &str,
    isrc: Option<&str>,
    title: &str,
    artist: &str,
) -> sqlx::Result<()> {
    let isrc = normalize_isrc(isrc);
    sqlx::query(
        r#"
        INSERT INTO applemusic (songid, albumid, isrc, title, artist)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(songid, albumid) DO UPDATE SET
            isrc = excluded.isrc,
            title = excluded.title,
            artist = excluded.artist
        "#,
    )
    .bind(song_id)
    .bind(album_id)
    .bind(&isrc)
    .bind(title)
    .bind(artist)
    .execute(pool)
    .await?;
    tracing::debug!(song_id, album_id, isrc = isrc.as_deref(), "cached applemusic song");
    Ok(())
}

/// Number of rows in a service's cache table.
pub async fn row_count(pool: &SqlitePool, service: Service) -> sqlx::Result<i64> {
    let table = match service {
        Service::AppleMusic => "applemusic",
        other => single_key_table(other),
    };
    let (count,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(count)
}
