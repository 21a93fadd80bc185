//! Adapter layer: convert Apple Music DTOs to domain records.
//!
//! Apple identifies a song placement by `(song_id, album_id)`; the album
//! id is not a first-class field but the tail of the song's canonical URL,
//! so the extraction lives here, next to the DTO it deciphers.

use super::dto;
use crate::providers::domain::TrackRecord;

/// Convert a song resource. Returns `None` when the resource carries no
/// attributes (Apple omits them for unavailable catalog items).
pub fn to_record(song: dto::SongData, raw: Option<serde_json::Value>) -> Option<TrackRecord> {
    let attrs = song.attributes?;
    let album_id = album_id_from_url(&attrs.url);
    Some(TrackRecord {
        id: song.id,
        album_id,
        isrc: attrs.isrc,
        title: attrs.name,
        artists: vec![attrs.artist_name],
        raw,
    })
}

/// Convert a songs envelope into records, provider order preserved.
pub fn to_records(response: dto::SongsResponse) -> Vec<TrackRecord> {
    response
        .data
        .into_iter()
        .filter_map(|song| to_record(song, None))
        .collect()
}

/// Pull the album id out of a canonical song URL:
/// `https://music.apple.com/us/album/hey-jude/1440857781?i=1440857786`
/// -> `1440857781`.
fn album_id_from_url(url: &str) -> Option<String> {
    let last = url.rsplit('/').next()?;
    let album_id = last.split("?i=").next()?;
    if album_id.is_empty() {
        None
    } else {
        Some(album_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str, url: &str, isrc: Option<&str>) -> dto::SongData {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "attributes": {
                "name": "Hey Jude",
                "artistName": "The Beatles",
                "isrc": isrc,
                "url": url
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_album_id_extraction() {
        let record = to_record(
            song(
                "1440857786",
                "https://music.apple.com/us/album/hey-jude/1440857781?i=1440857786",
                Some("GBAYE6800310"),
            ),
            None,
        )
        .unwrap();
        assert_eq!(record.album_id.as_deref(), Some("1440857781"));
        assert_eq!(record.first_artist(), "The Beatles");
    }

    #[test]
    fn test_song_without_attributes_is_skipped() {
        let bare: dto::SongData = serde_json::from_value(serde_json::json!({"id": "1"})).unwrap();
        assert!(to_record(bare, None).is_none());
    }

    #[test]
    fn test_album_id_from_url_shapes() {
        assert_eq!(
            album_id_from_url("https://music.apple.com/us/album/x/123?i=456"),
            Some("123".to_string())
        );
        assert_eq!(
            album_id_from_url("https://music.apple.com/us/album/x/123"),
            Some("123".to_string())
        );
    }
}
