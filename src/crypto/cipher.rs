//! Per-entry secret encryption, dispatched on the database's cipher id.
//!
//! Entry secrets are stored as text: `base64(IV-or-nonce || ciphertext)`,
//! so every blob carries what it needs to be decrypted and nothing has to
//! be stored next to it.

use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::{ctr_mode, gcm_mode};
use crate::errors::{CredVaultError, Result};

/// Symmetric algorithms this build can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherSuite {
    /// AES-256-CTR with a random 16-byte IV and no authentication tag.
    #[default]
    Aes256Ctr,
    /// AES-256-GCM with a random 12-byte nonce and a 16-byte tag.
    Aes256Gcm,
}

impl CipherSuite {
    /// The id written to `header.crypto.cipher`.
    pub fn id(self) -> &'static str {
        match self {
            Self::Aes256Ctr => "AES-256",
            Self::Aes256Gcm => "AES-256-GCM",
        }
    }

    /// Whether tampering with a blob is detected on decrypt.
    pub fn is_authenticated(self) -> bool {
        matches!(self, Self::Aes256Gcm)
    }
}

impl FromStr for CipherSuite {
    type Err = CredVaultError;

    fn from_str(id: &str) -> Result<Self> {
        match id {
            "AES-256" => Ok(Self::Aes256Ctr),
            "AES-256-GCM" => Ok(Self::Aes256Gcm),
            other => Err(CredVaultError::UnsupportedCipher(other.to_string())),
        }
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Encrypt `plaintext` under `key` and return the base64 blob.
pub fn encrypt(suite: CipherSuite, key: &[u8], plaintext: &[u8]) -> Result<String> {
    let raw = match suite {
        CipherSuite::Aes256Ctr => ctr_mode::encrypt(key, plaintext)?,
        CipherSuite::Aes256Gcm => gcm_mode::encrypt(key, plaintext)?,
    };
    Ok(BASE64.encode(raw))
}

/// Decode a base64 blob and decrypt it under `key`.
///
/// With `Aes256Ctr` this only fails on bad base64 or a blob shorter than
/// the IV; a wrong key yields garbage rather than an error.
pub fn decrypt(suite: CipherSuite, key: &[u8], blob: &str) -> Result<Vec<u8>> {
    let raw = BASE64
        .decode(blob)
        .map_err(|e| CredVaultError::Decrypt(format!("invalid base64: {e}")))?;

    match suite {
        CipherSuite::Aes256Ctr => ctr_mode::decrypt(key, &raw),
        CipherSuite::Aes256Gcm => gcm_mode::decrypt(key, &raw),
    }
}
