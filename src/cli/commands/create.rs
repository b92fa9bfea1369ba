//! `credvault create`: create a new, empty password database.

use std::fs;

use crate::cli::output;
use crate::cli::{open_store, prompt_new_password, Cli};
use crate::errors::{CredVaultError, Result};

/// Execute the `create` command.
pub fn execute(cli: &Cli, name: &str) -> Result<()> {
    let store = open_store(cli)?;

    // 1. Create the databases folder if it doesn't exist.
    let folder = store.folder();
    if !folder.exists() {
        fs::create_dir_all(folder)?;
        output::info(&format!("Created databases folder: {}", folder.display()));
    }

    // 2. Bail out before prompting if the database already exists.
    let path = store.database_path(name);
    if path.exists() {
        output::tip(&format!(
            "Use `credvault add {name} <TITLE>` to add entries to the existing database."
        ));
        return Err(CredVaultError::AlreadyExists(path));
    }

    // 3. Prompt for a new password (with confirmation) and write the file.
    let password = prompt_new_password()?;
    let path = store.create(name, &password)?;

    output::success(&format!(
        "Database '{name}' created at {} ({})",
        path.display(),
        store.options().cipher
    ));
    output::tip(&format!("Run `credvault add {name} <TITLE>` to add an entry."));
    output::tip(&format!("Run `credvault list {name}` to see its entries."));

    Ok(())
}
