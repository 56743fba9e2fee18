//! Session facade.
//!
//! Reads and replaces the single session record kept in the cache file.

use std::sync::Arc;

use tracing::debug;

use crate::core::domain::SessionRecord;
use crate::core::persist::CacheFile;

/// Access to the persisted session.
#[derive(Debug, Clone)]
pub struct Session {
    file: Arc<CacheFile>,
}

impl Session {
    pub fn new(file: Arc<CacheFile>) -> Self {
        Self { file }
    }

    /// Current session, if any.
    pub fn get(&self) -> Option<SessionRecord> {
        self.file.with_state(|state| state.session.clone())
    }

    /// Replace the current session.
    pub fn set(&self, record: SessionRecord) {
        debug!(session = %record.id, user = %record.username, "session stored");
        self.file.with_state(|state| state.session = Some(record));
    }

    /// Remove and return the current session.
    pub fn take(&self) -> Option<SessionRecord> {
        let taken = self.file.with_state(|state| state.session.take());
        if taken.is_some() {
            debug!("session removed");
        }
        taken
    }

    pub fn is_present(&self) -> bool {
        self.file.with_state(|state| state.session.is_some())
    }
}
