//! `credvault show`: print a single entry's secret.

use crate::cli::{open_database, open_store, Cli};
use crate::errors::{CredVaultError, Result};
use crate::vault::Session;

/// Execute the `show` command.
pub fn execute(cli: &Cli, db: &str, index: usize) -> Result<()> {
    let store = open_store(cli)?;
    let session = Session::new();
    let opened = open_database(&store, &session, db)?;
    store.close(&session);

    if let Some(entry) = opened.entries.iter().find(|e| e.index == index) {
        // Print to stdout so it can be piped.
        println!("{}", entry.secret.as_str());
        return Ok(());
    }

    match opened.skipped.iter().find(|s| s.index == index) {
        Some(skipped) => Err(CredVaultError::Decrypt(skipped.reason.clone())),
        None => Err(CredVaultError::IndexOutOfRange {
            index,
            len: opened.total(),
        }),
    }
}
