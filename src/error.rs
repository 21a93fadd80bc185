//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while
//! CLI/main uses `anyhow` for convenient error propagation.
//!
//! The two outcomes callers are expected to handle are [`Error::NoMatchFound`]
//! (the decision ladder was exhausted without a match) and
//! [`Error::NoServiceMatched`] (an unrecognized service name, a config or
//! programming error upstream of the core). Storage and provider failures
//! propagate as-is; the core has no degraded mode when the cache is down.

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No identity could be located or resolved for the given reference.
    /// Recoverable; surfaced to the caller as-is.
    #[error("no match found for this song")]
    NoMatchFound,

    /// The caller named a service we don't know about.
    #[error("no service matched {0:?}")]
    NoServiceMatched(String),

    /// Identity cache (SQLite) failure. Fatal to the command.
    #[error("cache error: {0}")]
    Database(#[from] sqlx::Error),

    /// Remote provider failure (network, auth, malformed payload).
    #[error("provider error: {0}")]
    Provider(#[from] crate::providers::ProviderError),

    /// Configuration error (missing credentials, bad paths).
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
