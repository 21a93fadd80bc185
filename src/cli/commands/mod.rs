//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `convert`: Convert a song link from one service to another
//! - `locate`: Resolve a link to its cached song identity
//! - `config`: Persist credentials and defaults to the config file
//!
//! Credentials resolve in precedence order: command-line flag, then
//! `TRACKBRIDGE_`-prefixed environment variable, then the config file.

mod configure;
mod convert;
mod locate;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use sqlx::SqlitePool;
use tokio::runtime::Runtime;

pub use configure::cmd_config;
pub use convert::cmd_convert;
pub use locate::cmd_locate;

use crate::config::Config;
use crate::db;
use crate::error::{Error, Result};
use crate::model::Service;
use crate::providers::{AppleMusicClient, MusicfetchClient, SpotifyClient, YtMusicClient};
use crate::resolver::{
    AppleMusicResolver, Resolver, ResolverSet, SpotifyResolver, YtMusicResolver,
};

/// Trackbridge CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub credentials: CredentialArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credential overrides, available on every subcommand as a flag or a
/// `TRACKBRIDGE_`-prefixed environment variable.
#[derive(Debug, Clone, Default, Args)]
pub struct CredentialArgs {
    /// Spotify client-credentials application id
    #[arg(long, env = "TRACKBRIDGE_SPOTIFY_CLIENT_ID", global = true)]
    pub spotify_client_id: Option<String>,

    /// Spotify client-credentials application secret
    #[arg(long, env = "TRACKBRIDGE_SPOTIFY_CLIENT_SECRET", global = true)]
    pub spotify_client_secret: Option<String>,

    /// Apple Music developer (JWT) token
    #[arg(long, env = "TRACKBRIDGE_APPLE_MUSIC_TOKEN", global = true)]
    pub apple_music_token: Option<String>,

    /// YouTube Data API v3 key
    #[arg(long, env = "TRACKBRIDGE_YOUTUBE_API_KEY", global = true)]
    pub youtube_api_key: Option<String>,

    /// musicfetch.io token for ISRC lookups
    #[arg(long, env = "TRACKBRIDGE_MUSICFETCH_TOKEN", global = true)]
    pub musicfetch_token: Option<String>,
}

impl CredentialArgs {
    /// Merge flag/env overrides over file-loaded credentials. Values not
    /// given on the command line keep whatever the file had.
    pub fn apply(&self, mut config: Config) -> Config {
        let creds = &mut config.credentials;
        if let Some(v) = &self.spotify_client_id {
            creds.spotify_client_id = Some(v.clone());
        }
        if let Some(v) = &self.spotify_client_secret {
            creds.spotify_client_secret = Some(v.clone());
        }
        if let Some(v) = &self.apple_music_token {
            creds.apple_music_token = Some(v.clone());
        }
        if let Some(v) = &self.youtube_api_key {
            creds.youtube_api_key = Some(v.clone());
        }
        if let Some(v) = &self.musicfetch_token {
            creds.musicfetch_token = Some(v.clone());
        }
        config
    }
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a song link from one streaming service to another
    Convert {
        /// Source service (spotify, applemusic, ytmusic)
        from: Service,
        /// Target service (spotify, applemusic, ytmusic)
        to: Service,
        /// Song link, URI, or native id on the source service
        reference: String,
        /// Accept the closest search result when no verified match exists
        #[arg(long)]
        best_match: bool,
        /// Database path (defaults to the config directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Resolve a link to its song identity without converting it
    Locate {
        /// Service the reference belongs to (spotify, applemusic, ytmusic)
        service: Service,
        /// Song link, URI, or native id
        reference: String,
        /// Database path (defaults to the config directory)
        #[arg(long)]
        db: Option<PathBuf>,
    },
    /// Store credentials and defaults in the config file
    Config {
        /// Database path to persist as the default
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

/// Run the parsed command to completion on a fresh runtime.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;
    let config = cli.credentials.apply(crate::config::load());

    match &cli.command {
        Commands::Convert {
            from,
            to,
            reference,
            best_match,
            db,
        } => cmd_convert(&rt, &config, *from, *to, reference, *best_match, db.as_deref()),
        Commands::Locate {
            service,
            reference,
            db,
        } => cmd_locate(&rt, &config, *service, reference, db.as_deref()),
        Commands::Config { db } => cmd_config(&cli.credentials, db.as_deref()),
    }
}

/// Open (and migrate) the identity cache, honoring `--db` over the
/// configured path over the config-directory default.
pub(super) async fn open_db(config: &Config, db_override: Option<&std::path::Path>) -> Result<SqlitePool> {
    let configured = config.cache.db_path.as_deref();
    let default_path = crate::config::config_dir().map(|dir| dir.join(db::DEFAULT_DB_NAME));
    let path = db_override
        .map(PathBuf::from)
        .or_else(|| configured.map(PathBuf::from))
        .or(default_path);

    if let Some(parent) = path.as_deref().and_then(|p| p.parent()) {
        std::fs::create_dir_all(parent)?;
    }

    let url = db::db_url(path.as_deref());
    Ok(db::init_db(&url).await?)
}

/// Build the resolver for one service, failing early when its
/// credentials are missing from the config.
pub(super) fn build_resolver(
    service: Service,
    config: &Config,
    pool: &SqlitePool,
) -> Result<Arc<dyn Resolver>> {
    let creds = &config.credentials;
    match service {
        Service::Spotify => {
            let id = creds
                .spotify_client_id
                .as_deref()
                .ok_or_else(|| Error::config("spotify_client_id is not configured"))?;
            let secret = creds
                .spotify_client_secret
                .as_deref()
                .ok_or_else(|| Error::config("spotify_client_secret is not configured"))?;
            Ok(Arc::new(SpotifyResolver::new(
                pool.clone(),
                SpotifyClient::new(id, secret),
            )))
        }
        Service::AppleMusic => {
            let token = creds
                .apple_music_token
                .as_deref()
                .ok_or_else(|| Error::config("apple_music_token is not configured"))?;
            Ok(Arc::new(AppleMusicResolver::new(
                pool.clone(),
                AppleMusicClient::new(token),
            )))
        }
        Service::YtMusic => {
            let key = creds
                .youtube_api_key
                .as_deref()
                .ok_or_else(|| Error::config("youtube_api_key is not configured"))?;
            Ok(Arc::new(YtMusicResolver::new(
                pool.clone(),
                YtMusicClient::new(key),
                MusicfetchClient::new(creds.musicfetch_token.clone()),
            )))
        }
    }
}

/// Resolver set holding exactly the services a command needs.
pub(super) fn build_resolver_set(
    services: &[Service],
    config: &Config,
    pool: &SqlitePool,
) -> Result<ResolverSet> {
    let mut set = ResolverSet::new();
    for service in services {
        set.register(build_resolver(*service, config, pool)?);
    }
    Ok(set)
}
