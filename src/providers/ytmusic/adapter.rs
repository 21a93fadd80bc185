//! Adapter layer: convert YouTube DTOs to domain records.
//!
//! YouTube never reports an ISRC, so every record leaves here with
//! `isrc: None`; the resolver fills it in from the fingerprint
//! collaborator when it can. The artist is derived from the channel
//! title, minus the " - Topic" suffix auto-generated music channels carry.

use super::dto;
use crate::providers::domain::TrackRecord;

/// Convert a `videos.list` item, optionally keeping the raw payload.
pub fn to_record(video: dto::Video, raw: Option<serde_json::Value>) -> TrackRecord {
    TrackRecord {
        id: video.id,
        album_id: None,
        isrc: None,
        title: video.snippet.title,
        artists: vec![artist_from_channel(&video.snippet.channel_title)],
        raw,
    }
}

/// Convert a search response into records, dropping non-video results,
/// provider order preserved.
pub fn to_records(response: dto::SearchListResponse) -> Vec<TrackRecord> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            Some(TrackRecord {
                id: video_id,
                album_id: None,
                isrc: None,
                title: item.snippet.title,
                artists: vec![artist_from_channel(&item.snippet.channel_title)],
                raw: None,
            })
        })
        .collect()
}

fn artist_from_channel(channel_title: &str) -> String {
    channel_title
        .strip_suffix(" - Topic")
        .unwrap_or(channel_title)
        .to_string()
}
