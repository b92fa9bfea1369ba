//! Cryptographic primitives for credvault.
//!
//! This module provides:
//! - Argon2id password-based key derivation (`kdf`)
//! - The master-password verification tag (`verify`)
//! - Per-entry secret encryption keyed by cipher id (`cipher`), backed by
//!   AES-256-CTR (`ctr_mode`) and AES-256-GCM (`gcm_mode`)
//! - A zeroize-on-drop key holder (`keys`)

pub mod cipher;
pub mod ctr_mode;
pub mod gcm_mode;
pub mod kdf;
pub mod keys;
pub mod verify;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{encrypt, decrypt, derive_key, ...};
pub use cipher::{decrypt, encrypt, CipherSuite};
pub use kdf::{derive_key, derive_key_with_params, generate_salt, Argon2Params, KEY_LEN, SALT_LEN};
pub use keys::DataKey;
pub use verify::{verification_tag, verify_tag};
