//! `credvault databases`: list the database files in the databases folder.

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::Result;

/// Execute the `databases` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = open_store(cli)?;

    if !store.folder().is_dir() {
        output::info(&format!(
            "No databases folder at {}.",
            store.folder().display()
        ));
        output::tip("Run `credvault create <NAME>` to create your first database.");
        return Ok(());
    }

    let databases = store.databases()?;
    if databases.is_empty() {
        output::info("No databases found.");
        output::tip("Run `credvault create <NAME>` to create your first database.");
        return Ok(());
    }

    output::info(&format!(
        "{} database(s) in {}:",
        databases.len(),
        store.folder().display()
    ));
    output::print_databases_table(&databases);

    Ok(())
}
