//! Core data models for song identity resolution.
//!
//! Defines the service-agnostic [`Song`] identity, the [`Service`] enum,
//! and the matching rules used when no ISRC is available.
//!
//! # Identity rules
//!
//! - ISRCs are stored and compared in lowercase, always.
//! - Two songs are equal iff both carry an ISRC and the ISRCs match
//!   case-insensitively. A missing ISRC on either side is a hard false,
//!   even for identical titles.
//! - [`Song::is_similar`] is the fallback heuristic: it strips
//!   "(Official Music Video)"-style noise from titles and then requires
//!   exact title and first-artist equality.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

/// A streaming service we can resolve songs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Spotify,
    AppleMusic,
    YtMusic,
}

impl Service {
    /// All known services, in dispatch order.
    pub const ALL: [Service; 3] = [Service::Spotify, Service::AppleMusic, Service::YtMusic];
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Spotify => "spotify",
            Service::AppleMusic => "applemusic",
            Service::YtMusic => "ytmusic",
        };
        f.write_str(name)
    }
}

impl FromStr for Service {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "spotify" => Ok(Service::Spotify),
            "applemusic" | "apple" => Ok(Service::AppleMusic),
            "ytmusic" | "youtubemusic" | "youtube" => Ok(Service::YtMusic),
            _ => Err(Error::NoServiceMatched(s.to_string())),
        }
    }
}

/// A service-specific primary key.
///
/// Spotify and YouTube Music key on a single id; Apple Music keys on a
/// `(song_id, album_id)` pair because one recording can appear on several
/// album placements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeId {
    Single(String),
    Pair { song_id: String, album_id: String },
}

impl NativeId {
    pub fn single(id: impl Into<String>) -> Self {
        NativeId::Single(id.into())
    }

    pub fn pair(song_id: impl Into<String>, album_id: impl Into<String>) -> Self {
        NativeId::Pair {
            song_id: song_id.into(),
            album_id: album_id.into(),
        }
    }
}

/// Build the canonical playback URL for a native id on a service.
///
/// These formats are load-bearing: callers paste them into chats, so they
/// must match what the services themselves hand out.
pub fn native_url(service: Service, id: &NativeId) -> String {
    match (service, id) {
        (Service::Spotify, NativeId::Single(uid)) => {
            format!("https://open.spotify.com/track/{uid}")
        }
        (Service::YtMusic, NativeId::Single(uid)) => {
            format!("https://music.youtube.com/watch?v={uid}")
        }
        (Service::AppleMusic, NativeId::Pair { song_id, album_id }) => {
            format!("https://music.apple.com/us/album/{album_id}?i={song_id}")
        }
        // A mismatched key shape is a construction bug in the resolver,
        // not recoverable at this point.
        (service, id) => unreachable!("native id {id:?} does not belong to {service}"),
    }
}

/// Lowercase a raw ISRC; `None` passes through unchanged.
pub fn normalize_isrc(raw: Option<&str>) -> Option<String> {
    raw.map(|s| s.to_ascii_lowercase())
}

/// The service-agnostic identity of a track.
///
/// Constructed transiently by a resolver's `locate` and consumed by a
/// `resolve` call on another resolver; only its fields are persisted,
/// per service, in the identity cache.
#[derive(Debug, Clone)]
pub struct Song {
    /// Which service produced this instance.
    pub source: Service,
    /// Service-specific primary key.
    pub native_id: NativeId,
    /// International Standard Recording Code, lowercase. The only
    /// cross-service join key.
    pub isrc: Option<String>,
    /// Display title as the source service reports it.
    pub title: String,
    /// Primary credited artist only; featured artists are dropped.
    pub first_artist: String,
    /// Raw provider payload, carried for caller convenience. Never
    /// consulted by resolution logic.
    pub attributes: Option<serde_json::Value>,
}

/// Title noise we ignore when comparing: optional bracket, optional
/// "official", then "music video" or "lyric video", case-insensitive.
static TITLE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[\(\[]?\s*(official\s*)?(music|lyric)\s*video[\)\]]?")
        .expect("title noise pattern is valid")
});

impl Song {
    /// Create a song identity, normalizing the ISRC to lowercase.
    pub fn new(
        source: Service,
        native_id: NativeId,
        isrc: Option<&str>,
        title: impl Into<String>,
        first_artist: impl Into<String>,
    ) -> Self {
        Self {
            source,
            native_id,
            isrc: normalize_isrc(isrc),
            title: title.into(),
            first_artist: first_artist.into(),
            attributes: None,
        }
    }

    /// Attach the raw provider payload.
    pub fn with_attributes(mut self, attributes: serde_json::Value) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// The canonical URL for this song on its source service.
    pub fn url(&self) -> String {
        native_url(self.source, &self.native_id)
    }

    /// Fuzzy fallback comparison for when no ISRC is available.
    ///
    /// Strips "(official) music/lyric video" noise from both titles, then
    /// requires exact equality of the cleaned titles and of the first
    /// artist. Heuristic only; a verified ISRC always wins over this.
    pub fn is_similar(&self, other: &Song) -> bool {
        clean_title(&self.title) == clean_title(&other.title)
            && self.first_artist == other.first_artist
    }
}

/// ISRC equality is the only identity: no ISRC means not equal, period.
impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        match (&self.isrc, &other.isrc) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }
}

fn clean_title(title: &str) -> String {
    TITLE_NOISE.replace_all(title, "").trim().to_string()
}
