//! Cache file persistence.
//!
//! Holds the in-memory [`PersistentCacheData`] and mirrors it to a single
//! encrypted file. Every operation takes the same lock, so loads, saves and
//! clears never interleave within a process.
//!
//! Two processes sharing one cache file are not coordinated, and writes are
//! a plain overwrite: a crash mid-write leaves a file that the next `load`
//! treats as corrupt and discards.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info};
use zeroize::Zeroizing;

use crate::core::cipher::Protector;
use crate::core::domain::{EntryJson, PersistentCacheData};
use crate::error::{Error, PersistError, Result};

/// Which path `load` took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// No cache file.
    Missing,
    /// File present but blank.
    Empty,
    /// Encrypted file decrypted and parsed.
    Encrypted,
    /// Legacy plaintext file parsed; the next save encrypts it.
    Legacy,
    /// File unreadable or malformed; state left empty.
    Failed,
}

/// The cache file and its in-memory contents.
pub struct CacheFile {
    path: PathBuf,
    protector: Box<dyn Protector>,
    state: Mutex<PersistentCacheData>,
}

impl std::fmt::Debug for CacheFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheFile")
            .field("path", &self.path)
            .field("protector", &self.protector.name())
            .finish()
    }
}

impl CacheFile {
    /// Create a handle with empty state. Nothing is read until [`load`].
    ///
    /// [`load`]: CacheFile::load
    pub fn new(path: impl Into<PathBuf>, protector: Box<dyn Protector>) -> Self {
        Self {
            path: path.into(),
            protector,
            state: Mutex::new(PersistentCacheData::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn protector_name(&self) -> &'static str {
        self.protector.name()
    }

    /// Replace the in-memory state with the file contents.
    ///
    /// Never fails: unreadable or malformed files leave the state empty and
    /// are reported through the log and the returned [`LoadSource`].
    pub fn load(&self) -> LoadSource {
        let mut state = self.lock();
        *state = PersistentCacheData::default();

        match self.read() {
            Ok((data, source)) => {
                *state = data;
                debug!(
                    path = %self.path.display(),
                    ?source,
                    secrets = state.secrets.len(),
                    session = state.session.is_some(),
                    "cache loaded"
                );
                source
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to load cache, starting empty");
                LoadSource::Failed
            }
        }
    }

    /// Write the in-memory state to disk.
    ///
    /// Empty state deletes the file instead of writing an empty document.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` or `CipherError` if serialization, encryption
    /// or the write fails. The in-memory state is unaffected.
    pub fn save(&self) -> Result<()> {
        let state = self.lock();
        self.write(&state)
    }

    /// Write the session together with secrets produced by `snapshot`.
    ///
    /// `snapshot` runs under the file lock, so concurrent callers write one
    /// after another and the last writer holds the newest snapshot. The
    /// secrets are dropped from the in-memory state once written; the
    /// caller remains their owner.
    ///
    /// # Errors
    ///
    /// Same as [`save`](CacheFile::save).
    pub fn save_with_secrets(
        &self,
        snapshot: impl FnOnce() -> BTreeMap<String, EntryJson>,
    ) -> Result<()> {
        let mut state = self.lock();
        state.secrets = snapshot();
        let result = self.write(&state);
        state.secrets.clear();
        result
    }

    /// Empty the in-memory state and delete the file.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Remove` if the file exists but cannot be
    /// deleted. The in-memory state is cleared regardless.
    pub fn clear(&self) -> Result<()> {
        let mut state = self.lock();
        *state = PersistentCacheData::default();
        self.remove_file()
    }

    /// Load and immediately save, upgrading a legacy file to the encrypted
    /// form.
    ///
    /// # Errors
    ///
    /// Returns the save error, if any.
    pub fn migrate(&self) -> Result<LoadSource> {
        let source = self.load();
        if source == LoadSource::Legacy {
            self.save()?;
            info!(path = %self.path.display(), "legacy cache rewritten in encrypted form");
        }
        Ok(source)
    }

    /// Run `f` over the in-memory state under the lock.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut PersistentCacheData) -> R) -> R {
        f(&mut self.lock())
    }

    fn write(&self, state: &PersistentCacheData) -> Result<()> {
        if state.is_empty() {
            return self.remove_file();
        }

        let plaintext =
            Zeroizing::new(serde_json::to_vec(state).map_err(PersistError::Serialize)?);
        let blob = self.protector.encrypt(&plaintext)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(PersistError::Write)?;
        }
        fs::write(&self.path, &blob).map_err(PersistError::Write)?;
        self.protector.harden(&self.path)?;

        debug!(
            path = %self.path.display(),
            secrets = state.secrets.len(),
            bytes = blob.len(),
            "cache saved"
        );
        Ok(())
    }

    fn read(&self) -> Result<(PersistentCacheData, LoadSource)> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok((PersistentCacheData::default(), LoadSource::Missing));
            }
            Err(e) => return Err(PersistError::Read(e).into()),
        };
        let raw = Zeroizing::new(raw);

        let (plaintext, source) = match self.protector.decrypt(&raw) {
            Ok(plaintext) => (plaintext, LoadSource::Encrypted),
            Err(Error::Cipher(e)) => {
                info!(
                    path = %self.path.display(),
                    reason = %e,
                    "cache is not encrypted, reading legacy plaintext"
                );
                (raw, LoadSource::Legacy)
            }
            Err(e) => return Err(e),
        };

        let text = std::str::from_utf8(&plaintext).map_err(|_| PersistError::NotUtf8)?;
        if text.trim().is_empty() {
            return Ok((PersistentCacheData::default(), LoadSource::Empty));
        }

        let data = serde_json::from_str(text).map_err(PersistError::Parse)?;
        Ok((data, source))
    }

    fn remove_file(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "cache file deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistError::Remove(e).into()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PersistentCacheData> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
