//! Spotify provider: catalog lookup and search via the Web API.

mod adapter;
mod client;
mod dto;

pub use client::SpotifyClient;
