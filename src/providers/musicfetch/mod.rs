//! Musicfetch collaborator: ISRC lookup by track URL.
//!
//! Used for YouTube Music, whose own payloads carry no ISRC. A miss is a
//! legitimate outcome - the cache row is then written with a NULL ISRC
//! and corrected on a later lookup that succeeds.

mod client;
mod dto;

pub use client::MusicfetchClient;
