//! Vault module: encrypted password databases on disk.
//!
//! This module provides:
//! - `Entry` and its decrypted views (`entry`)
//! - The JSON document format with atomic writes (`format`)
//! - Discovery of database files in a folder (`catalog`)
//! - The caller-owned key holder (`session`)
//! - High-level `CredentialStore` for creating, opening, and editing
//!   databases (`store`)

pub mod catalog;
pub mod entry;
pub mod format;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use catalog::DatabaseInfo;
pub use entry::{DecryptedEntry, Entry, NewEntry, SkippedEntry};
pub use format::Document;
pub use session::{Session, SessionStatus};
pub use store::{CredentialStore, OpenedDatabase, StoreOptions};
