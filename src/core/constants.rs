//! Constants used throughout sealcache.
//!
//! Centralizes file names, environment variables and cryptographic parameters.

/// Application name, used for the default data directory and key entropy.
pub const APP_NAME: &str = "sealcache";

/// Cache file name inside the data directory.
pub const CACHE_FILE: &str = "cache.bin";

/// Optional configuration file inside the data directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SEALCACHE_DATA_DIR";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SEALCACHE_LOG";

/// Separator of the canonical cache key encoding.
pub const KEY_SEPARATOR: char = ':';

/// PBKDF2 iteration count for the derived file key.
pub const KDF_ITERATIONS: u32 = 100_000;

/// Fixed, non-secret domain-separation salt for the derived file key.
pub const KDF_SALT: &[u8; 16] = b"sealcache.v1.kdf";

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Files containing a stable OS machine identifier, in lookup order.
pub const MACHINE_ID_FILES: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];
