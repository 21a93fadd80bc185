//! Config persistence command.

use std::path::Path;

use crate::config;

use super::CredentialArgs;

/// Merge the given credentials into the stored config and write it back.
/// Running it with no flags writes a template file worth hand-editing.
pub fn cmd_config(credentials: &CredentialArgs, db: Option<&Path>) -> anyhow::Result<()> {
    let mut cfg = credentials.apply(config::load());
    if let Some(path) = db {
        cfg.cache.db_path = Some(path.to_path_buf());
    }

    config::save(&cfg)?;
    if let Some(path) = config::config_path() {
        println!("Saved {}", path.display());
    }
    Ok(())
}
