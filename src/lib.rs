//! sealcache - an encrypted, persistent secrets-and-session cache.
//!
//! Keeps short-lived secret material (derived keys, passphrases) and the
//! current session of a CLI client in memory, and mirrors them to a single
//! file encrypted with a key bound to the machine and the OS user.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Host binary: inspect and maintain a cache file
//! └── core/             # Library
//!     ├── domain/       # CacheKey, SessionRecord, persisted snapshot
//!     ├── store         # In-memory map with lazy TTL expiry
//!     ├── secrets       # SecretsCache trait and facade
//!     ├── session       # Session record facade
//!     ├── cipher/       # Blob protectors (AES-GCM + PBKDF2, DPAPI)
//!     ├── persist       # Encrypted cache file, legacy migration
//!     ├── cache         # Handle owning all of the above
//!     └── config        # Data directory and file naming
//! ```
//!
//! Secret bytes are only reachable through [`SecretsCache::try_use`] and
//! [`SecretsCache::try_use_group`], which lend a borrowed view to a
//! caller-supplied transform.

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::cache::Cache;
pub use crate::core::cipher::{default_protector, DerivedKey, HostEntropy, Protector};
pub use crate::core::config::Config;
pub use crate::core::domain::{CacheKey, PersistentCacheData, SessionRecord};
pub use crate::core::persist::{CacheFile, LoadSource};
pub use crate::core::secrets::{EntryInfo, Secrets, SecretsCache};
pub use crate::core::session::Session;
pub use crate::core::store::{EntryKind, Ttl};
