//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{CredVaultError, Result};
use crate::vault::{CredentialStore, OpenedDatabase, Session};

/// Passwords shorter than this get a warning at creation time.
const RECOMMENDED_PASSWORD_LEN: usize = 8;

/// Environment variable consulted before prompting for a master password.
pub const PASSWORD_ENV: &str = "CREDVAULT_PASSWORD";

/// credvault CLI: encrypted local password databases.
#[derive(Parser)]
#[command(
    name = "credvault",
    about = "Encrypted local password databases",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/credvault.toml)
    #[arg(long, env = "CREDVAULT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Folder holding database files (overrides `dbs_folder` in the config)
    #[arg(long, global = true)]
    pub dbs_folder: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create a new password database
    Create {
        /// Database name (stored as <name>.json)
        name: String,
    },

    /// List the databases in the databases folder
    Databases,

    /// List the entries of a database
    List {
        /// Database name
        db: String,
        /// Show secrets in clear text instead of masking them
        #[arg(long)]
        reveal: bool,
    },

    /// Print the secret of one entry
    Show {
        /// Database name
        db: String,
        /// Entry index as shown by `list`
        index: usize,
    },

    /// Add an entry (secret is prompted for, or read from piped stdin)
    Add {
        /// Database name
        db: String,
        /// Entry title
        title: String,
        /// Username stored alongside the secret
        #[arg(short, long, default_value = "")]
        username: String,
        /// URL stored alongside the secret
        #[arg(long, default_value = "")]
        url: String,
        /// Free-form notes
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// Remove an entry by index
    Remove {
        /// Database name
        db: String,
        /// Entry index as shown by `list`
        index: usize,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from `--config`, `CREDVAULT_CONFIG`, or the default path.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let path = match &cli.config {
        Some(path) => path.clone(),
        None => Settings::default_path()?,
    };
    Settings::load(&path)
}

/// Build the store from the settings and command-line overrides.
pub fn open_store(cli: &Cli) -> Result<CredentialStore> {
    let settings = load_settings(cli)?;
    let folder = cli
        .dbs_folder
        .clone()
        .unwrap_or_else(|| settings.dbs_folder());
    Ok(CredentialStore::with_options(
        folder,
        settings.store_options()?,
    ))
}

/// Get a database's master password, trying in order:
/// 1. `CREDVAULT_PASSWORD` env var (scripts)
/// 2. Interactive hidden prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(db: &str) -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(format!("Master password for {db}"))
        .interact()
        .map_err(|e| CredVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation (used by `create`).
///
/// Also respects `CREDVAULT_PASSWORD` for scripted usage.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    let password = match password_from_env() {
        Some(pw) => pw,
        None => {
            let pw = dialoguer::Password::new()
                .with_prompt("Choose master password")
                .with_confirmation(
                    "Confirm master password",
                    "Passwords do not match, try again",
                )
                .interact()
                .map_err(|e| CredVaultError::CommandFailed(format!("password prompt: {e}")))?;
            Zeroizing::new(pw)
        }
    };

    if password.chars().count() < RECOMMENDED_PASSWORD_LEN {
        output::warning(&format!(
            "Master password is shorter than {RECOMMENDED_PASSWORD_LEN} characters."
        ));
    }

    Ok(password)
}

fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Read an entry secret from piped stdin or a hidden prompt.
pub fn read_secret(title: &str) -> Result<Zeroizing<String>> {
    if io::stdin().is_terminal() {
        let secret = dialoguer::Password::new()
            .with_prompt(format!("Secret for {title}"))
            .interact()
            .map_err(|e| CredVaultError::CommandFailed(format!("input prompt: {e}")))?;
        return Ok(Zeroizing::new(secret));
    }

    let mut buf = Zeroizing::new(String::new());
    io::stdin().read_to_string(&mut buf)?;
    let trimmed = Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string());
    Ok(trimmed)
}

/// Prompt for the password of `db` and open it into `session`.
pub fn open_database(
    store: &CredentialStore,
    session: &Session,
    db: &str,
) -> Result<OpenedDatabase> {
    let path = store.database_path(db);
    if !path.exists() {
        output::tip("Run `credvault databases` to see the available databases.");
        return Err(CredVaultError::NotFound(path));
    }

    let password = prompt_password(db)?;
    store.open(session, &path, &password)
}
