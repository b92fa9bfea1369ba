use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::{Argon2Params, CipherSuite};
use crate::errors::{CredVaultError, Result};
use crate::vault::StoreOptions;

/// User-level configuration, loaded from `~/.config/credvault.toml`.
///
/// Every field has a sensible default so credvault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Folder holding the database files.  A leading `~` is expanded.
    #[serde(default = "default_dbs_folder")]
    pub dbs_folder: String,

    /// Cipher id for newly created databases ("AES-256" or "AES-256-GCM").
    #[serde(default = "default_cipher")]
    pub cipher: String,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 1).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_dbs_folder() -> String {
    "~/.credvault".to_string()
}

fn default_cipher() -> String {
    CipherSuite::default().id().to_string()
}

fn default_argon2_memory_kib() -> u32 {
    Argon2Params::default().memory_kib
}

fn default_argon2_iterations() -> u32 {
    Argon2Params::default().iterations
}

fn default_argon2_parallelism() -> u32 {
    Argon2Params::default().parallelism
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            dbs_folder: default_dbs_folder(),
            cipher: default_cipher(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file inside `~/.config`.
    const FILE_NAME: &'static str = "credvault.toml";

    /// Default location of the config file: `~/.config/credvault.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            CredVaultError::ConfigError("cannot determine the home directory".into())
        })?;
        Ok(home.join(".config").join(Self::FILE_NAME))
    }

    /// Load settings from `path`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            CredVaultError::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;

        Ok(settings)
    }

    /// The databases folder with `~` expanded to the home directory.
    pub fn dbs_folder(&self) -> PathBuf {
        expand_home(&self.dbs_folder, dirs::home_dir().as_deref())
    }

    /// The configured cipher for new databases.
    pub fn cipher_suite(&self) -> Result<CipherSuite> {
        self.cipher.parse()
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }

    /// Options for databases created under these settings.
    ///
    /// Fails on an unknown cipher or Argon2 params that could not be used
    /// to open the databases they create.
    pub fn store_options(&self) -> Result<StoreOptions> {
        let argon2_params = self.argon2_params();
        argon2_params.validate()?;
        Ok(StoreOptions {
            cipher: self.cipher_suite()?,
            argon2_params,
        })
    }
}

/// Replace a leading `~` in `path` with `home`.
///
/// Only `~` on its own or followed by a separator is expanded; `~user`
/// forms are left untouched.
pub fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };

    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

// ── Tests ────────────────────────────────────────────────────────────
