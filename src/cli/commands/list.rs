//! `credvault list`: display the entries of a database in a table.

use crate::cli::output;
use crate::cli::{open_database, open_store, Cli};
use crate::errors::Result;
use crate::vault::Session;

/// Execute the `list` command.
pub fn execute(cli: &Cli, db: &str, reveal: bool) -> Result<()> {
    let store = open_store(cli)?;
    let session = Session::new();
    let opened = open_database(&store, &session, db)?;

    output::info(&format!(
        "{}: {} entr{}",
        opened.name,
        opened.total(),
        if opened.total() == 1 { "y" } else { "ies" }
    ));
    output::print_entries_table(db, &opened.entries, reveal);

    for skipped in &opened.skipped {
        output::warning(&format!(
            "Entry #{} '{}' could not be decrypted: {}",
            skipped.index, skipped.title, skipped.reason
        ));
    }

    store.close(&session);
    Ok(())
}
