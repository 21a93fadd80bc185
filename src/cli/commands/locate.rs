//! Song identity lookup command.

use std::path::Path;

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::Error;
use crate::model::Service;

use super::{build_resolver, open_db};

/// Resolve a reference on one service to its song identity and print it.
pub fn cmd_locate(
    rt: &Runtime,
    config: &Config,
    service: Service,
    reference: &str,
    db: Option<&Path>,
) -> anyhow::Result<()> {
    rt.block_on(async {
        let pool = open_db(config, db).await?;
        let resolver = build_resolver(service, config, &pool)?;

        match resolver.locate(reference).await {
            Ok(song) => {
                println!("Title:  {}", song.title);
                println!("Artist: {}", song.first_artist);
                match &song.isrc {
                    Some(isrc) => println!("ISRC:   {}", isrc.to_ascii_uppercase()),
                    None => println!("ISRC:   (unknown)"),
                }
                println!("URL:    {}", song.url());
                Ok(())
            }
            Err(Error::NoMatchFound) => {
                eprintln!("No song found on {service} for {reference}");
                std::process::exit(1);
            }
            Err(e) => Err(e.into()),
        }
    })
}
