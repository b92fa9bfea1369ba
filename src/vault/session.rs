//! Caller-owned session holding the key of the currently open database.
//!
//! A `Session` moves through `Closed -> Authenticating -> Open -> Closed`.
//! There is no locked-but-cached state: closing (or a failed open) drops
//! the `DataKey`, which zeroizes it, and reopening needs the password.
//!
//! The caller creates the session and passes it into every
//! `CredentialStore` operation; nothing about the open database lives in
//! global state.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::crypto::DataKey;
use crate::errors::{CredVaultError, Result};

/// Externally visible state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Closed,
    Authenticating,
    Open,
}

#[derive(Debug)]
enum State {
    Closed,
    Authenticating { path: PathBuf },
    Open { path: PathBuf, key: DataKey },
}

/// Holder for at most one open database and its derived key.
#[derive(Debug)]
pub struct Session {
    state: RwLock<State>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A new, closed session.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::Closed),
        }
    }

    pub fn status(&self) -> SessionStatus {
        match *self.state.read() {
            State::Closed => SessionStatus::Closed,
            State::Authenticating { .. } => SessionStatus::Authenticating,
            State::Open { .. } => SessionStatus::Open,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status() == SessionStatus::Open
    }

    /// Path of the database being opened or held open, if any.
    pub fn path(&self) -> Option<PathBuf> {
        match &*self.state.read() {
            State::Closed => None,
            State::Authenticating { path } | State::Open { path, .. } => Some(path.clone()),
        }
    }

    /// Discard the key and return to `Closed`.
    pub fn close(&self) {
        *self.state.write() = State::Closed;
    }

    /// Enter `Authenticating` for `path`, dropping any previously held key.
    pub(crate) fn begin(&self, path: &Path) {
        *self.state.write() = State::Authenticating {
            path: path.to_path_buf(),
        };
    }

    /// Finish a successful authentication by storing the derived key.
    pub(crate) fn unlock(&self, key: DataKey) -> Result<()> {
        let mut state = self.state.write();
        let path = match &*state {
            State::Authenticating { path } => path.clone(),
            _ => return Err(CredVaultError::SessionClosed),
        };
        *state = State::Open { path, key };
        Ok(())
    }

    /// Run `f` with the open database path and key.
    ///
    /// Holds the read lock for the duration of `f`, so a concurrent
    /// `close` waits until the operation has finished with the key.
    pub(crate) fn with_open<T>(&self, f: impl FnOnce(&Path, &DataKey) -> Result<T>) -> Result<T> {
        match &*self.state.read() {
            State::Open { path, key } => f(path, key),
            _ => Err(CredVaultError::SessionClosed),
        }
    }

    /// Path of the open database, without touching the key.
    pub(crate) fn open_path(&self) -> Result<PathBuf> {
        match &*self.state.read() {
            State::Open { path, .. } => Ok(path.clone()),
            _ => Err(CredVaultError::SessionClosed),
        }
    }
}
