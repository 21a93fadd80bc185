//! YouTube Music provider: video lookup and music-category search.
//!
//! No ISRC here - that comes from the musicfetch collaborator, keyed by
//! the video URL.

mod adapter;
mod client;
mod dto;

pub use client::YtMusicClient;
