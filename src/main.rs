//! Trackbridge - convert song links between streaming services.
//!
//! Takes a link on Spotify, Apple Music, or YouTube Music, resolves it
//! to a song identity anchored on the recording's ISRC, and produces the
//! matching link on another service. Resolved identities are cached in a
//! local SQLite database so repeat conversions skip the remote APIs.

pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod providers;
pub mod resolver;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("trackbridge=info".parse()?))
        .init();

    cli::run_command(&args)
}
