//! Master-password verification tag.
//!
//! The tag is `HMAC-SHA256(key = database name, message = password)`,
//! hex encoded.  It does not depend on the salt, so a supplied password
//! can be rejected before the expensive Argon2id derivation runs.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::errors::{CredVaultError, Result};

type HmacSha256 = Hmac<Sha256>;

fn tag_mac(name: &str, password: &[u8]) -> Result<HmacSha256> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(name.as_bytes())
        .map_err(|e| CredVaultError::KeyDerivationFailed(format!("HMAC init failed: {e}")))?;
    mac.update(password);
    Ok(mac)
}

/// Compute the hex verification tag for (`name`, `password`).
pub fn verification_tag(name: &str, password: &[u8]) -> Result<String> {
    Ok(hex::encode(tag_mac(name, password)?.finalize().into_bytes()))
}

/// Check `password` against a stored hex tag in constant time.
///
/// Returns `Ok(false)` on a mismatch and `Err(Format)` when the stored
/// tag is not valid hex.
pub fn verify_tag(name: &str, password: &[u8], stored_hex: &str) -> Result<bool> {
    let stored = hex::decode(stored_hex)
        .map_err(|e| CredVaultError::Format(format!("meta.hash is not valid hex: {e}")))?;

    Ok(tag_mac(name, password)?.verify_slice(&stored).is_ok())
}
