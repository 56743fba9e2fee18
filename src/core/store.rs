//! In-memory expiring store.
//!
//! A map from [`CacheKey`] to a secret or group payload with an optional
//! absolute expiry. Expiry is checked lazily on every access; the map is
//! enumerable, so no separate key index is kept.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use zeroize::Zeroizing;

use crate::core::domain::CacheKey;

/// Lifetime of a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Never expires.
    Infinite,
    /// Expires this long after insertion.
    For(Duration),
}

impl Ttl {
    /// Absolute expiry for an insertion at `now`; `None` means never.
    pub fn expires_at(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Ttl::Infinite => None,
            // Durations past chrono's range are as good as infinite.
            Ttl::For(duration) => TimeDelta::from_std(duration)
                .ok()
                .and_then(|delta| now.checked_add_signed(delta)),
        }
    }
}

/// Secret bytes and flags. Bytes are zeroed when the entry is dropped.
pub(crate) struct SecretEntry {
    pub(crate) bytes: Zeroizing<Vec<u8>>,
    pub(crate) flags: u8,
}

pub(crate) enum Payload {
    Secret(SecretEntry),
    Group(Vec<CacheKey>),
}

/// Kind of a stored entry, without its contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Secret,
    Group,
}

pub(crate) struct Entry {
    pub(crate) payload: Payload,
    pub(crate) expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }

    pub(crate) fn kind(&self) -> EntryKind {
        match self.payload {
            Payload::Secret(_) => EntryKind::Secret,
            Payload::Group(_) => EntryKind::Group,
        }
    }
}

#[derive(Default)]
pub(crate) struct ExpiringStore {
    entries: HashMap<CacheKey, Entry>,
}

impl ExpiringStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a secret. The previous bytes, if any, are zeroed.
    pub(crate) fn insert_secret(
        &mut self,
        key: CacheKey,
        bytes: &[u8],
        flags: u8,
        expires_at: Option<DateTime<Utc>>,
    ) {
        let entry = Entry {
            payload: Payload::Secret(SecretEntry {
                bytes: Zeroizing::new(bytes.to_vec()),
                flags,
            }),
            expires_at,
        };
        self.entries.insert(key, entry);
    }

    /// Insert or overwrite a group. Groups never expire.
    pub(crate) fn insert_group(&mut self, key: CacheKey, members: Vec<CacheKey>) {
        let entry = Entry {
            payload: Payload::Group(members),
            expires_at: None,
        };
        self.entries.insert(key, entry);
    }

    /// Live entry for `key`, evicting it first if it has expired.
    pub(crate) fn get(&mut self, key: &CacheKey, now: DateTime<Utc>) -> Option<&Entry> {
        let expired = self.entries.get(key).is_some_and(|e| !e.is_live(now));
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key)
    }

    pub(crate) fn remove(&mut self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every expired entry, returning how many were removed.
    pub(crate) fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        before - self.entries.len()
    }

    /// Entries still live at `now`. Expired ones are skipped, not removed.
    pub(crate) fn live(&self, now: DateTime<Utc>) -> impl Iterator<Item = (&CacheKey, &Entry)> {
        self.entries.iter().filter(move |(_, e)| e.is_live(now))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
