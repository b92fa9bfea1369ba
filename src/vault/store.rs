//! High-level database operations used by CLI commands.
//!
//! `CredentialStore` wraps the document format and the crypto layer so the
//! rest of the application can work with calls like
//! `store.add_entry(&session, NewEntry::new("email", "s3cr3t"))`.
//!
//! Every mutation re-reads the document from disk, applies one change and
//! rewrites the whole file.  Nothing is cached between calls, so each
//! operation works against the latest on-disk state.  This assumes a single
//! writer per database file.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::{
    self, derive_key_with_params, generate_salt, verification_tag, verify_tag, Argon2Params,
    CipherSuite, DataKey, SALT_LEN,
};
use crate::errors::{CredVaultError, Result};

use super::catalog::{self, DatabaseInfo};
use super::entry::{DecryptedEntry, Entry, NewEntry, SkippedEntry};
use super::format::{self, Document};
use super::session::Session;

/// Settings applied to databases created by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreOptions {
    pub cipher: CipherSuite,
    pub argon2_params: Argon2Params,
}

/// The decrypted contents of an open database.
#[derive(Debug)]
pub struct OpenedDatabase {
    pub name: String,
    pub description: String,
    pub cipher: CipherSuite,
    pub entries: Vec<DecryptedEntry>,
    /// Entries that failed to decrypt and were left out of `entries`.
    pub skipped: Vec<SkippedEntry>,
}

impl OpenedDatabase {
    /// Total number of entries in the document, including skipped ones.
    pub fn total(&self) -> usize {
        self.entries.len() + self.skipped.len()
    }
}

/// Façade over a folder of database files.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    folder: PathBuf,
    options: StoreOptions,
}

impl CredentialStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// A store over `folder` that creates databases with default options.
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self::with_options(folder, StoreOptions::default())
    }

    pub fn with_options(folder: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            folder: folder.into(),
            options,
        }
    }

    /// The folder holding this store's database files.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Path of the database file called `name` (`vault` or `vault.json`).
    pub fn database_path(&self, name: &str) -> PathBuf {
        catalog::database_path(&self.folder, name)
    }

    /// All database files in the folder.
    pub fn databases(&self) -> Result<Vec<DatabaseInfo>> {
        catalog::list_databases(&self.folder)
    }

    // ------------------------------------------------------------------
    // Database lifecycle
    // ------------------------------------------------------------------

    /// Create a new, empty database called `name` protected by `password`.
    ///
    /// The file is `<folder>/<name>.json` and the verification tag is
    /// computed over that file name.  No key is derived yet: there is
    /// nothing to encrypt until the first entry is added.
    pub fn create(&self, name: &str, password: &str) -> Result<PathBuf> {
        require_non_empty("database name", name)?;
        require_non_empty("master password", password)?;
        if name.contains(['/', '\\']) {
            return Err(CredVaultError::Validation(format!(
                "database name '{name}' must not contain path separators"
            )));
        }
        // Hidden files are not listed by the catalog.
        if name.starts_with('.') {
            return Err(CredVaultError::Validation(format!(
                "database name '{name}' must not start with '.'"
            )));
        }
        self.options.argon2_params.validate()?;

        let file_name = catalog::file_name_for(name);
        let path = self.folder.join(&file_name);

        let salt = generate_salt();
        let tag = verification_tag(&file_name, password.as_bytes())?;
        let document = Document::new(
            &file_name,
            tag,
            &salt,
            self.options.cipher,
            self.options.argon2_params,
        );

        format::create_document(&path, &document)?;
        debug!(path = %path.display(), cipher = %self.options.cipher, "created database");

        Ok(path)
    }

    /// Check `password` against the database at `path` without deriving
    /// the data-encryption key.
    ///
    /// Returns the database salt when the password is correct and `None`
    /// when it is not.
    pub fn is_password_valid(path: &Path, password: &str) -> Result<Option<[u8; SALT_LEN]>> {
        let document = format::read_document(path)?;
        check_password(&document, password)
    }

    /// Authenticate against the database at `path` and decrypt its entries.
    ///
    /// On success the derived key is held in `session`, which is then
    /// `Open`.  On any failure the session ends up `Closed`.
    ///
    /// Entries that fail to decrypt are skipped and reported in
    /// `OpenedDatabase::skipped` so that one damaged entry cannot lock the
    /// user out of the rest of the database.
    pub fn open(&self, session: &Session, path: &Path, password: &str) -> Result<OpenedDatabase> {
        session.begin(path);

        let result = Self::authenticate(path, password).and_then(|(document, key)| {
            let opened = decrypt_document(&document, &key)?;
            session.unlock(key)?;
            Ok(opened)
        });

        match &result {
            Ok(opened) => debug!(
                path = %path.display(),
                entries = opened.entries.len(),
                skipped = opened.skipped.len(),
                "opened database"
            ),
            Err(_) => session.close(),
        }
        result
    }

    /// Read, verify and derive the key for the database at `path`.
    fn authenticate(path: &Path, password: &str) -> Result<(Document, DataKey)> {
        require_non_empty("master password", password)?;

        let document = format::read_document(path)?;
        let cipher = document.cipher_suite()?;

        let salt = check_password(&document, password)?.ok_or(CredVaultError::InvalidPassword)?;

        let mut key_bytes =
            derive_key_with_params(password.as_bytes(), &salt, &document.argon2_params())?;
        let key = DataKey::new(key_bytes);
        key_bytes.zeroize();

        debug!(path = %path.display(), %cipher, "master password accepted");
        Ok((document, key))
    }

    /// Close the session's database and wipe its key.
    pub fn close(&self, session: &Session) {
        session.close();
    }

    // ------------------------------------------------------------------
    // Entry operations (against the session's open database)
    // ------------------------------------------------------------------

    /// Re-read the open database and decrypt its entries.
    pub fn list_entries(&self, session: &Session) -> Result<OpenedDatabase> {
        session.with_open(|path, key| {
            let document = format::read_document(path)?;
            decrypt_document(&document, key)
        })
    }

    /// Encrypt and append an entry to the open database.
    ///
    /// Returns the new entry's id.
    pub fn add_entry(&self, session: &Session, entry: NewEntry) -> Result<String> {
        session.with_open(|path, key| add_entry_at(path, key, entry))
    }

    /// Remove the entry at `index` from the open database.
    ///
    /// Later entries shift down by one, so callers must re-list before
    /// removing by index again.
    pub fn remove_entry(&self, session: &Session, index: usize) -> Result<Entry> {
        let path = session.open_path()?;
        remove_entry_at(&path, index)
    }
}

// ----------------------------------------------------------------------
// Path-based operations for callers that manage the key themselves
// ----------------------------------------------------------------------

/// Append an encrypted entry to the database at `path` using `key`.
pub fn add_entry_at(path: &Path, key: &DataKey, entry: NewEntry) -> Result<String> {
    require_non_empty("entry title", &entry.title)?;
    require_non_empty("entry secret", &entry.secret)?;

    let mut document = format::read_document(path)?;
    let cipher = document.cipher_suite()?;

    let secret_ciphertext = crypto::encrypt(cipher, key.as_bytes(), entry.secret.as_bytes())?;

    let id = Uuid::new_v4().to_string();
    document.database.entries.push(Entry {
        id: id.clone(),
        title: entry.title,
        username: entry.username,
        secret_ciphertext,
        url: entry.url,
        notes: entry.notes,
        created: Some(Utc::now()),
    });

    format::write_document(path, &document)?;
    debug!(
        path = %path.display(),
        %id,
        count = document.database.entries.len(),
        "added entry"
    );

    Ok(id)
}

/// Remove the entry at `index` from the database at `path`.
///
/// An out-of-range index fails before anything is written.
pub fn remove_entry_at(path: &Path, index: usize) -> Result<Entry> {
    let mut document = format::read_document(path)?;

    let len = document.database.entries.len();
    if index >= len {
        return Err(CredVaultError::IndexOutOfRange { index, len });
    }

    let removed = document.database.entries.remove(index);
    format::write_document(path, &document)?;
    debug!(path = %path.display(), index, id = %removed.id, "removed entry");

    Ok(removed)
}

// ----------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------

fn require_non_empty(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(CredVaultError::Validation(format!("{what} cannot be empty")));
    }
    Ok(())
}

/// Verify `password` against the document's tag; returns the salt on a match.
fn check_password(document: &Document, password: &str) -> Result<Option<[u8; SALT_LEN]>> {
    let meta = &document.database.meta;
    if !verify_tag(&meta.name, password.as_bytes(), &meta.hash)? {
        return Ok(None);
    }
    document.salt().map(Some)
}

/// Decrypt every entry, collecting failures instead of aborting.
fn decrypt_document(document: &Document, key: &DataKey) -> Result<OpenedDatabase> {
    let cipher = document.cipher_suite()?;
    let mut entries = Vec::with_capacity(document.database.entries.len());
    let mut skipped = Vec::new();

    for (index, entry) in document.database.entries.iter().enumerate() {
        match decrypt_secret(cipher, key, &entry.secret_ciphertext) {
            Ok(secret) => entries.push(DecryptedEntry::from_stored(index, entry, secret)),
            Err(e) => {
                warn!(index, id = %entry.id, title = %entry.title, error = %e, "skipping entry that failed to decrypt");
                skipped.push(SkippedEntry {
                    index,
                    id: entry.id.clone(),
                    title: entry.title.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(OpenedDatabase {
        name: document.database.meta.name.clone(),
        description: document.database.meta.description.clone(),
        cipher,
        entries,
        skipped,
    })
}

fn decrypt_secret(cipher: CipherSuite, key: &DataKey, blob: &str) -> Result<Zeroizing<String>> {
    let plaintext = crypto::decrypt(cipher, key.as_bytes(), blob)?;

    // On error, zeroize the bytes inside the error before discarding.
    String::from_utf8(plaintext).map(Zeroizing::new).map_err(|e| {
        let mut bad_bytes = e.into_bytes();
        bad_bytes.zeroize();
        CredVaultError::Decrypt("secret is not valid UTF-8".into())
    })
}
