//! Apple Music provider: catalog lookup, ISRC filter and search.

mod adapter;
mod client;
mod dto;

pub use client::AppleMusicClient;
