//! The cache handle.
//!
//! Owns the cache file, the secrets and the session for one process. Opening
//! loads the file; dropping the handle performs a final save.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::core::cipher::{self, Protector};
use crate::core::config::Config;
use crate::core::persist::{CacheFile, LoadSource};
use crate::core::secrets::Secrets;
use crate::core::session::Session;
use crate::error::Result;

/// Process-wide secrets and session cache.
///
/// # Example
///
/// ```no_run
/// use sealcache::{Cache, CacheKey, Config, SecretsCache, Ttl};
///
/// # fn main() -> sealcache::error::Result<()> {
/// let cache = Cache::open(&Config::resolve(None)?);
/// let key = CacheKey::new("svc", "user1", "token");
/// cache.secrets().set(key.clone(), b"material", 0, Ttl::Infinite);
/// let len = cache.secrets().try_use(&key, (), |_, bytes, _| bytes.len());
/// assert_eq!(len, Some(8));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Cache {
    file: Arc<CacheFile>,
    secrets: Secrets,
    session: Session,
    load_source: LoadSource,
}

impl Cache {
    /// Open the cache described by `config` with the platform protector.
    pub fn open(config: &Config) -> Self {
        let protector = cipher::default_protector(&config.app_name);
        Self::open_with(config, protector)
    }

    /// Open the cache with an explicit protector.
    pub fn open_with(config: &Config, protector: Box<dyn Protector>) -> Self {
        let file = Arc::new(CacheFile::new(config.cache_path(), protector));
        let load_source = file.load();

        // Secret bytes live in the store only; the file state holds them
        // just for the duration of a save.
        let secrets =
            file.with_state(|state| Secrets::from_snapshot(&std::mem::take(&mut state.secrets)));
        let session = Session::new(Arc::clone(&file));
        debug!(
            path = %file.path().display(),
            protector = file.protector_name(),
            ?load_source,
            "cache opened"
        );

        Self {
            file,
            secrets,
            session,
            load_source,
        }
    }

    pub fn secrets(&self) -> &Secrets {
        &self.secrets
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn file(&self) -> &CacheFile {
        &self.file
    }

    /// How the cache file was read when the handle was opened.
    pub fn load_source(&self) -> LoadSource {
        self.load_source
    }

    /// Persist the live secrets and the session.
    ///
    /// # Errors
    ///
    /// Returns the persistence error. The in-memory cache stays intact and
    /// authoritative for this process.
    pub fn save(&self) -> Result<()> {
        self.file.save_with_secrets(|| self.secrets.snapshot())
    }

    /// Forget everything, in memory and on disk.
    ///
    /// # Errors
    ///
    /// Returns `PersistError::Remove` if the file cannot be deleted.
    pub fn clear(&self) -> Result<()> {
        self.secrets.clear();
        self.file.clear()
    }
}

impl Drop for Cache {
    fn drop(&mut self) {
        if self.load_source == LoadSource::Failed {
            warn!(
                path = %self.file.path().display(),
                "replacing unreadable cache file with current state"
            );
        }
        if let Err(e) = self.save() {
            error!(path = %self.file.path().display(), error = %e, "failed to save cache on exit");
        } else if self.load_source == LoadSource::Legacy {
            info!("legacy cache file upgraded to encrypted form");
        }
    }
}
