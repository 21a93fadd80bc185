//! Shared helpers for unit tests. Compiled only under `cfg(test)`.

use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::db;
use crate::providers::TrackRecord;

/// Fresh migrated SQLite database in a temp directory. The directory
/// guard must stay alive for the lifetime of the pool.
pub async fn temp_db() -> (SqlitePool, TempDir) {
    let dir = TempDir::new().unwrap();
    let url = db::db_url(Some(&dir.path().join("test.db")));
    let pool = db::init_db(&url).await.unwrap();
    (pool, dir)
}

/// Provider record with a single-key id and one artist.
pub fn record(id: &str, isrc: Option<&str>, title: &str, artist: &str) -> TrackRecord {
    TrackRecord {
        id: id.to_string(),
        album_id: None,
        isrc: isrc.map(str::to_string),
        title: title.to_string(),
        artists: vec![artist.to_string()],
        raw: None,
    }
}

/// Provider record shaped like an Apple Music catalog hit.
pub fn apple_record(
    id: &str,
    album_id: Option<&str>,
    isrc: Option<&str>,
    title: &str,
    artist: &str,
) -> TrackRecord {
    TrackRecord {
        album_id: album_id.map(str::to_string),
        ..record(id, isrc, title, artist)
    }
}
