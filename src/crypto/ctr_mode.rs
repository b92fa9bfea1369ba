//! AES-256 in counter mode, the `"AES-256"` cipher of the database format.
//!
//! Layout of the returned byte buffer:
//!   [ 16-byte IV | ciphertext ]
//!
//! The ciphertext is exactly as long as the plaintext and carries **no
//! authentication tag**.  A flipped bit in a stored blob flips the same bit
//! in the decrypted output and is never reported as an error; the wrong key
//! is indistinguishable from tampering.  Databases that need integrity per
//! entry should use the `"AES-256-GCM"` cipher instead.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use rand::RngCore;

use crate::errors::{CredVaultError, Result};

/// Size of the AES block, and therefore of the CTR initialization vector.
pub const IV_LEN: usize = 16;

/// 128-bit big-endian counter over the whole IV block.
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Encrypt `plaintext` with a 32-byte `key` under a fresh random IV.
///
/// Returns the IV prepended to the ciphertext (IV || ciphertext).
pub fn encrypt(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let mut output = vec![0u8; IV_LEN + plaintext.len()];
    let (iv, body) = output.split_at_mut(IV_LEN);
    rand::rng().fill_bytes(iv);
    body.copy_from_slice(plaintext);

    let mut cipher = Aes256Ctr::new_from_slices(key, iv)
        .map_err(|e| CredVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;
    cipher.apply_keystream(body);

    Ok(output)
}

/// Decrypt data that was produced by `encrypt`.
///
/// Fails only when the input is shorter than one IV.
pub fn decrypt(key: &[u8], iv_and_ciphertext: &[u8]) -> Result<Vec<u8>> {
    if iv_and_ciphertext.len() < IV_LEN {
        return Err(CredVaultError::Decrypt(format!(
            "ciphertext is {} bytes, shorter than the {IV_LEN}-byte IV",
            iv_and_ciphertext.len()
        )));
    }

    let (iv, ciphertext) = iv_and_ciphertext.split_at(IV_LEN);
    let mut plaintext = ciphertext.to_vec();

    let mut cipher = Aes256Ctr::new_from_slices(key, iv)
        .map_err(|e| CredVaultError::Decrypt(format!("invalid key length: {e}")))?;
    cipher.apply_keystream(&mut plaintext);

    Ok(plaintext)
}
