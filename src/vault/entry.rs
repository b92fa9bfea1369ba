//! Entry types: the stored form and the decrypted views handed to callers.
//!
//! Only the `password` field of a stored entry is encrypted.  Titles and
//! the optional metadata are plaintext so a database can be listed
//! without any key material.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// One credential as stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// UUID assigned at creation, never reused.
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub username: String,

    /// The encrypted secret: base64(IV-or-nonce || ciphertext).
    #[serde(rename = "password")]
    pub secret_ciphertext: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

/// Input for adding an entry.  `title` and `secret` are required;
/// the rest are carried through as plaintext metadata.
#[derive(Clone, Default)]
pub struct NewEntry {
    pub title: String,
    pub secret: Zeroizing<String>,
    pub username: String,
    pub url: String,
    pub notes: String,
}

impl NewEntry {
    /// An entry with only the two required fields set.
    pub fn new(title: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            secret: Zeroizing::new(secret.into()),
            ..Self::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// A successfully decrypted entry.
///
/// `index` is the entry's position in the document, which is what
/// `remove_entry` expects, even when earlier entries were skipped.
#[derive(Clone)]
pub struct DecryptedEntry {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub username: String,
    pub url: String,
    pub notes: String,
    pub created: Option<DateTime<Utc>>,
    /// The plaintext secret, wiped from memory on drop.
    pub secret: Zeroizing<String>,
}

impl DecryptedEntry {
    pub(crate) fn from_stored(index: usize, entry: &Entry, secret: Zeroizing<String>) -> Self {
        Self {
            index,
            id: entry.id.clone(),
            title: entry.title.clone(),
            username: entry.username.clone(),
            url: entry.url.clone(),
            notes: entry.notes.clone(),
            created: entry.created,
            secret,
        }
    }
}

// Debug output never includes the plaintext secret.

impl fmt::Debug for NewEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewEntry")
            .field("title", &self.title)
            .field("secret", &"<redacted>")
            .field("username", &self.username)
            .field("url", &self.url)
            .field("notes", &self.notes)
            .finish()
    }
}

impl fmt::Debug for DecryptedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptedEntry")
            .field("index", &self.index)
            .field("id", &self.id)
            .field("title", &self.title)
            .field("username", &self.username)
            .field("url", &self.url)
            .field("notes", &self.notes)
            .field("created", &self.created)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// An entry that could not be decrypted while opening a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub index: usize,
    pub id: String,
    pub title: String,
    pub reason: String,
}
