//! Domain types.

mod key;
mod session;
mod snapshot;

pub use key::CacheKey;
pub use session::SessionRecord;
pub use snapshot::{EntryJson, PersistentCacheData, SecretJson};
