//! Remote provider layer - HTTP clients for the streaming services.
//!
//! # Architecture
//!
//! Each service follows the same separation:
//! - **DTOs** (`*/dto.rs`) - exact API response shapes, never used outside
//!   their module
//! - **Adapters** (`*/adapter.rs`) - convert DTOs to [`TrackRecord`]
//! - **Clients** (`*/client.rs`) - HTTP plumbing, auth, status mapping
//!
//! The resolvers depend on the capability traits in [`traits`], never on a
//! concrete client, so tests can substitute mocks and a provider swap stays
//! local to its module.

pub mod applemusic;
pub mod domain;
pub mod musicfetch;
pub mod spotify;
pub mod traits;
pub mod ytmusic;

pub use applemusic::AppleMusicClient;
pub use domain::{ProviderError, TrackRecord};
pub use musicfetch::MusicfetchClient;
pub use spotify::SpotifyClient;
pub use traits::{AppleMusicApi, IsrcLookupApi, SpotifyApi, YtMusicApi};
pub use ytmusic::YtMusicClient;

/// User agent sent to every provider.
pub(crate) const USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
