//! `credvault remove`: delete an entry by index.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_database, open_store, Cli};
use crate::errors::{CredVaultError, Result};
use crate::vault::Session;

/// Execute the `remove` command.
pub fn execute(cli: &Cli, db: &str, index: usize, force: bool) -> Result<()> {
    let store = open_store(cli)?;
    let session = Session::new();
    let opened = open_database(&store, &session, db)?;

    let title = opened
        .entries
        .iter()
        .find(|e| e.index == index)
        .map(|e| e.title.clone())
        .or_else(|| {
            opened
                .skipped
                .iter()
                .find(|s| s.index == index)
                .map(|s| s.title.clone())
        });

    let Some(title) = title else {
        store.close(&session);
        return Err(CredVaultError::IndexOutOfRange {
            index,
            len: opened.total(),
        });
    };

    // Unless --force is set, ask for confirmation before removing.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove entry #{index} '{title}'?"))
            .default(false)
            .interact()
            .map_err(|e| CredVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            store.close(&session);
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let result = store.remove_entry(&session, index);
    store.close(&session);
    let removed = result?;

    output::success(&format!(
        "Removed entry '{}' from {}",
        removed.title, opened.name
    ));
    output::tip("Indices of later entries shifted down by one.");

    Ok(())
}
