use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in credvault.
#[derive(Debug, Error)]
pub enum CredVaultError {
    // --- Input errors ---
    #[error("Invalid input: {0}")]
    Validation(String),

    // --- Crypto errors ---
    #[error("Invalid master password")]
    InvalidPassword,

    #[error("Decryption failed: {0}")]
    Decrypt(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Unsupported cipher '{0}' (this build supports AES-256 and AES-256-GCM)")]
    UnsupportedCipher(String),

    // --- Database errors ---
    #[error("Database not found at {0}")]
    NotFound(PathBuf),

    #[error("Database already exists at {0}")]
    AlreadyExists(PathBuf),

    #[error("Invalid database format: {0}")]
    Format(String),

    #[error("Entry index {index} is out of range (database has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("No database is open in this session")]
    SessionClosed,

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for credvault results.
pub type Result<T> = std::result::Result<T, CredVaultError>;
