//! Link conversion command.

use std::path::Path;

use tokio::runtime::Runtime;

use crate::config::Config;
use crate::error::Error;
use crate::model::Service;

use super::{build_resolver_set, open_db};

/// Convert a song link on `from` into the matching link on `to`.
pub fn cmd_convert(
    rt: &Runtime,
    config: &Config,
    from: Service,
    to: Service,
    reference: &str,
    best_match: bool,
    db: Option<&Path>,
) -> anyhow::Result<()> {
    rt.block_on(async {
        if from == to {
            println!("{reference}");
            return Ok(());
        }

        let pool = open_db(config, db).await?;
        let resolvers = build_resolver_set(&[from, to], config, &pool)?;

        match resolvers.convert(from, to, reference, best_match).await {
            Ok(url) => {
                println!("{url}");
                Ok(())
            }
            Err(Error::NoMatchFound) => {
                eprintln!("No match found on {to} for {reference}");
                if !best_match {
                    eprintln!("Hint: retry with --best-match to accept the closest result");
                }
                std::process::exit(1);
            }
            Err(e) => Err(e.into()),
        }
    })
}
