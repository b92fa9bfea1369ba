//! `credvault add`: encrypt and append an entry to a database.

use crate::cli::output;
use crate::cli::{open_database, open_store, read_secret, Cli};
use crate::errors::Result;
use crate::vault::{NewEntry, Session};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    db: &str,
    title: &str,
    username: &str,
    url: &str,
    notes: &str,
) -> Result<()> {
    let secret = read_secret(title)?;

    let store = open_store(cli)?;
    let session = Session::new();
    let opened = open_database(&store, &session, db)?;

    let entry = NewEntry {
        title: title.to_string(),
        secret,
        username: username.to_string(),
        url: url.to_string(),
        notes: notes.to_string(),
    };
    let result = store.add_entry(&session, entry);
    store.close(&session);
    result?;

    output::success(&format!(
        "Entry '{title}' added to {} ({} total)",
        opened.name,
        opened.total() + 1
    ));

    Ok(())
}
