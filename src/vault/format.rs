//! On-disk JSON document and atomic file I/O.
//!
//! A database file looks like this:
//!
//! ```text
//! {
//!   "header": { "crypto": { "cipher": "AES-256", "compression": "GZip" } },
//!   "database": {
//!     "meta": { "name": "vault.json", "description": "...", "hash": "<hex>", "salt": "<hex>" },
//!     "entries": [ { "id": "...", "title": "...", "password": "<base64>", ... } ]
//!   }
//! }
//! ```
//!
//! Keys are written in struct field order with two-space indentation so
//! the file diffs cleanly.  `compression` is carried for compatibility
//! and never applied.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::entry::Entry;
use crate::crypto::{Argon2Params, CipherSuite, SALT_LEN};
use crate::errors::{CredVaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Value written to `header.crypto.compression`.
pub const COMPRESSION_ID: &str = "GZip";

/// Description given to newly created databases.
pub const DEFAULT_DESCRIPTION: &str = "Personal password database";

/// File extension of database documents.
pub const DATABASE_EXTENSION: &str = "json";

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The full contents of one database file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub header: Header,
    pub database: Database,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub crypto: CryptoHeader,
}

/// Algorithm identifiers and KDF settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoHeader {
    pub cipher: String,

    #[serde(default = "default_compression")]
    pub compression: String,

    /// Argon2 params used at creation.  Missing in older documents, which
    /// were all derived with the defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kdf: Option<StoredArgon2Params>,
}

/// Argon2 parameters as stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArgon2Params {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl From<Argon2Params> for StoredArgon2Params {
    fn from(p: Argon2Params) -> Self {
        Self {
            memory_kib: p.memory_kib,
            iterations: p.iterations,
            parallelism: p.parallelism,
        }
    }
}

impl From<StoredArgon2Params> for Argon2Params {
    fn from(p: StoredArgon2Params) -> Self {
        Self {
            memory_kib: p.memory_kib,
            iterations: p.iterations,
            parallelism: p.parallelism,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Database {
    pub meta: Meta,
    pub entries: Vec<Entry>,
}

/// Database title, password check and KDF salt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Hex verification tag over (name, master password).
    pub hash: String,

    /// Hex-encoded 16-byte salt.
    pub salt: String,
}

fn default_compression() -> String {
    COMPRESSION_ID.to_string()
}

impl Document {
    /// Build an empty document for a new database.
    pub fn new(
        name: &str,
        verification_tag: String,
        salt: &[u8; SALT_LEN],
        cipher: CipherSuite,
        argon2_params: Argon2Params,
    ) -> Self {
        let kdf = (argon2_params != Argon2Params::default()).then(|| argon2_params.into());
        Self {
            header: Header {
                crypto: CryptoHeader {
                    cipher: cipher.id().to_string(),
                    compression: default_compression(),
                    kdf,
                },
            },
            database: Database {
                meta: Meta {
                    name: name.to_string(),
                    description: DEFAULT_DESCRIPTION.to_string(),
                    hash: verification_tag,
                    salt: hex::encode(salt),
                },
                entries: Vec::new(),
            },
        }
    }

    /// The cipher this document's entries are encrypted with.
    pub fn cipher_suite(&self) -> Result<CipherSuite> {
        self.header.crypto.cipher.parse()
    }

    /// The Argon2 params to re-derive this document's key with.
    pub fn argon2_params(&self) -> Argon2Params {
        self.header
            .crypto
            .kdf
            .map_or_else(Argon2Params::default, Argon2Params::from)
    }

    /// Decode `meta.salt` into the raw 16 salt bytes.
    pub fn salt(&self) -> Result<[u8; SALT_LEN]> {
        let bytes = hex::decode(&self.database.meta.salt)
            .map_err(|e| CredVaultError::Format(format!("meta.salt is not valid hex: {e}")))?;
        bytes.as_slice().try_into().map_err(|_| {
            CredVaultError::Format(format!(
                "meta.salt must be {SALT_LEN} bytes, got {}",
                bytes.len()
            ))
        })
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Read and parse a database document.
pub fn read_document(path: &Path) -> Result<Document> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CredVaultError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&data)
        .map_err(|e| CredVaultError::Format(format!("{}: {e}", path.display())))
}

/// Write a brand-new database document, failing if `path` exists.
///
/// Uses an exclusive create so two concurrent creates cannot both win and
/// an existing database is never overwritten.
pub fn create_document(path: &Path, document: &Document) -> Result<()> {
    let bytes = serialize(document)?;

    let file = match owner_only(OpenOptions::new().write(true).create_new(true)).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(CredVaultError::AlreadyExists(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    fill_new_file(path, file, &bytes)
}

/// Replace a database document on disk **atomically**.
///
/// 1. Serialize the document to pretty JSON.
/// 2. Write it to a temp file in the same directory (owner-only).
/// 3. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file.
pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    let bytes = serialize(document)?;

    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));

    let result = write_synced(&tmp_path, &bytes).and_then(|()| Ok(fs::rename(&tmp_path, path)?));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;

    sync_parent(path)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn serialize(document: &Document) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(document)
        .map_err(|e| CredVaultError::SerializationError(format!("document: {e}")))
}

fn write_synced(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file: File = owner_only(OpenOptions::new().write(true).create(true).truncate(true))
        .open(path)?;

    // A stale temp file keeps its old mode, so tighten it explicitly.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    write_and_sync(&mut file, bytes)
}

/// Write `bytes` into the freshly created `file` at `path`.
///
/// A half-written file would block every later create and open, so it is
/// removed when any step fails.
fn fill_new_file(path: &Path, mut file: File, bytes: &[u8]) -> Result<()> {
    let result = write_and_sync(&mut file, bytes).and_then(|()| sync_parent(path));
    if result.is_err() {
        drop(file);
        let _ = fs::remove_file(path);
    }
    result
}

fn write_and_sync(file: &mut File, bytes: &[u8]) -> Result<()> {
    file.write_all(bytes)?;
    file.sync_all()?;
    Ok(())
}

/// Flush the directory entry of `path` so a new or renamed file survives
/// a crash.  Directories cannot be opened for syncing on Windows.
fn sync_parent(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        File::open(parent)?.sync_all()?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// Restrict newly created files to owner read/write on Unix.
fn owner_only(options: &mut OpenOptions) -> &mut OpenOptions {
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}
