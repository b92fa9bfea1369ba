//! In-memory holder for a database's data-encryption key.

use std::fmt;

use zeroize::Zeroize;

use super::kdf::KEY_LEN;

/// A wrapper around a 32-byte data-encryption key that automatically
/// zeroes its memory when dropped.
///
/// The key only ever exists inside one of these; it is never written to
/// the database file.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DataKey {
    bytes: [u8; KEY_LEN],
}

impl DataKey {
    /// Create a new `DataKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to pass to a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DataKey(<redacted>)")
    }
}
