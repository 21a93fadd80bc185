//! Adapter layer: convert Spotify DTOs to domain records.
//!
//! The only place Spotify's response shapes leak into our types. If the
//! API changes, this file and dto.rs change, nothing else.

use super::dto;
use crate::providers::domain::TrackRecord;

/// Convert a track object, optionally keeping the raw payload.
pub fn to_record(track: dto::TrackObject, raw: Option<serde_json::Value>) -> TrackRecord {
    TrackRecord {
        id: track.id,
        album_id: None,
        isrc: track.external_ids.isrc,
        title: track.name,
        artists: track.artists.into_iter().map(|a| a.name).collect(),
        raw,
    }
}

/// Convert a search response into records, provider order preserved.
pub fn to_records(response: dto::SearchResponse) -> Vec<TrackRecord> {
    response
        .tracks
        .items
        .into_iter()
        .map(|t| to_record(t, None))
        .collect()
}
