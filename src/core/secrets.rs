//! Secrets facade.
//!
//! Exposes the five cache operations over the [`ExpiringStore`]. Secret
//! bytes never leave the store as owned values: callers read them through a
//! transform that receives a borrowed view.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::core::domain::{CacheKey, EntryJson, SecretJson};
use crate::core::store::{Entry, EntryKind, ExpiringStore, Payload, Ttl};

/// Secrets cache capability offered to the authentication layer.
pub trait SecretsCache {
    /// Insert or overwrite a secret.
    fn set(&self, key: CacheKey, bytes: &[u8], flags: u8, ttl: Ttl);

    /// Store an ordered member list under `group`. Groups never expire.
    fn include_in_group(&self, group: CacheKey, members: Vec<CacheKey>);

    /// Run `transform` over a live secret.
    ///
    /// Returns `None` when the key is absent, expired, or names a group.
    fn try_use<S, R, F>(&self, key: &CacheKey, state: S, transform: F) -> Option<R>
    where
        F: FnOnce(S, &[u8], u8) -> R;

    /// Run `transform` over every live member of a group, in order.
    ///
    /// Missing or expired members are skipped. Returns `None` only when the
    /// group itself is absent.
    fn try_use_group<S, R, F>(&self, group: &CacheKey, state: &S, transform: F) -> Option<Vec<R>>
    where
        F: FnMut(&S, &[u8], u8) -> R;

    /// Evict one entry. Removing a group leaves its members in place.
    fn remove(&self, key: &CacheKey);
}

/// Metadata of a stored entry, without its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub key: CacheKey,
    pub kind: EntryKind,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Thread-safe secrets cache backed by an [`ExpiringStore`].
///
/// Transforms run while the store lock is held; they must not call back
/// into the same cache.
#[derive(Default)]
pub struct Secrets {
    store: Mutex<ExpiringStore>,
}

impl Secrets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cache from persisted entries.
    ///
    /// Entries with unparseable keys and secrets that already expired are
    /// skipped.
    pub fn from_snapshot(entries: &BTreeMap<String, EntryJson>) -> Self {
        let now = Utc::now();
        let mut store = ExpiringStore::new();

        for (raw_key, entry) in entries {
            let key: CacheKey = match raw_key.parse() {
                Ok(key) => key,
                Err(e) => {
                    warn!(key = %raw_key, error = %e, "skipping cache entry with invalid key");
                    continue;
                }
            };

            match entry {
                EntryJson::Secret(secret) => {
                    if secret.expires_at.is_some_and(|at| at <= now) {
                        debug!(key = %key, "dropping expired secret");
                        continue;
                    }
                    store.insert_secret(key, &secret.bytes, secret.flags, secret.expires_at);
                }
                EntryJson::Group(members) => {
                    let members = members
                        .iter()
                        .filter_map(|m| match m.parse() {
                            Ok(member) => Some(member),
                            Err(e) => {
                                warn!(group = %key, member = %m, error = %e, "skipping invalid group member");
                                None
                            }
                        })
                        .collect();
                    store.insert_group(key, members);
                }
            }
        }

        debug!(entries = store.len(), "secrets restored");
        Self {
            store: Mutex::new(store),
        }
    }

    /// Persistable form of every live entry, keyed by canonical key string.
    pub fn snapshot(&self) -> BTreeMap<String, EntryJson> {
        let now = Utc::now();
        let mut store = self.lock();
        store.purge_expired(now);

        store
            .live(now)
            .map(|(key, entry)| {
                let json = match &entry.payload {
                    Payload::Secret(secret) => EntryJson::Secret(SecretJson {
                        bytes: secret.bytes.to_vec(),
                        flags: secret.flags,
                        expires_at: entry.expires_at,
                    }),
                    Payload::Group(members) => {
                        EntryJson::Group(members.iter().map(CacheKey::to_string).collect())
                    }
                };
                (key.to_string(), json)
            })
            .collect()
    }

    /// Eagerly drop expired secrets, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.lock().purge_expired(Utc::now())
    }

    /// Live entries, sorted by canonical key.
    pub fn entries(&self) -> Vec<EntryInfo> {
        let now = Utc::now();
        let store = self.lock();
        let mut entries: Vec<EntryInfo> = store
            .live(now)
            .map(|(key, entry)| EntryInfo {
                key: key.clone(),
                kind: entry.kind(),
                expires_at: entry.expires_at,
            })
            .collect();
        entries.sort_by_key(|info| info.key.to_string());
        entries
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Utc::now();
        self.lock().live(now).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, ExpiringStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets").field("entries", &self.len()).finish()
    }
}

impl SecretsCache for Secrets {
    fn set(&self, key: CacheKey, bytes: &[u8], flags: u8, ttl: Ttl) {
        let expires_at = ttl.expires_at(Utc::now());
        debug!(key = %key, flags, ?expires_at, "caching secret");
        self.lock().insert_secret(key, bytes, flags, expires_at);
    }

    fn include_in_group(&self, group: CacheKey, members: Vec<CacheKey>) {
        debug!(group = %group, members = members.len(), "caching group");
        self.lock().insert_group(group, members);
    }

    fn try_use<S, R, F>(&self, key: &CacheKey, state: S, transform: F) -> Option<R>
    where
        F: FnOnce(S, &[u8], u8) -> R,
    {
        let mut store = self.lock();
        match &store.get(key, Utc::now())?.payload {
            Payload::Secret(secret) => {
                Some(transform(state, secret.bytes.as_slice(), secret.flags))
            }
            Payload::Group(_) => None,
        }
    }

    fn try_use_group<S, R, F>(
        &self,
        group: &CacheKey,
        state: &S,
        mut transform: F,
    ) -> Option<Vec<R>>
    where
        F: FnMut(&S, &[u8], u8) -> R,
    {
        let now = Utc::now();
        let mut store = self.lock();
        let members = match &store.get(group, now)?.payload {
            Payload::Group(members) => members.clone(),
            Payload::Secret(_) => return None,
        };

        let mut results = Vec::with_capacity(members.len());
        for member in &members {
            if let Some(Entry {
                payload: Payload::Secret(secret),
                ..
            }) = store.get(member, now)
            {
                results.push(transform(state, secret.bytes.as_slice(), secret.flags));
            }
        }
        Some(results)
    }

    fn remove(&self, key: &CacheKey) {
        if self.lock().remove(key) {
            debug!(key = %key, "evicted cache entry");
        }
    }
}
