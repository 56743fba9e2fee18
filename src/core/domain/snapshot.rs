//! Persisted cache snapshot.
//!
//! The JSON document written to the cache file:
//!
//! ```text
//! {
//!   "session": { ... } | null,
//!   "secrets": {
//!     "svc:user1:token": { "bytes": "<base64>", "flags": 0 },
//!     "svc:user1:group": [ "svc:user1:token", ... ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::SessionRecord;

/// Everything stored in the cache file.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistentCacheData {
    #[serde(default)]
    pub session: Option<SessionRecord>,
    #[serde(default)]
    pub secrets: BTreeMap<String, EntryJson>,
}

impl PersistentCacheData {
    /// True when there is nothing worth writing to disk.
    pub fn is_empty(&self) -> bool {
        self.session.is_none() && self.secrets.is_empty()
    }
}

/// A persisted entry, discriminated by JSON shape: object or array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryJson {
    Secret(SecretJson),
    Group(Vec<String>),
}

/// A persisted secret.
#[derive(Clone, PartialEq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretJson {
    #[serde(with = "base64_bytes")]
    pub bytes: Vec<u8>,
    pub flags: u8,
    /// Absent for secrets that never expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[zeroize(skip)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for SecretJson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretJson")
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .field("flags", &self.flags)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};
    use zeroize::Zeroizing;

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = Zeroizing::new(STANDARD.encode(bytes));
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = Zeroizing::new(String::deserialize(deserializer)?);
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
