use thiserror::Error;

/// Top-level error type for sealcache.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Malformed cache key strings.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    #[error("cache key is empty")]
    Empty,

    #[error("invalid cache key '{input}': expected 3 or 5 ':'-separated parts, got {parts}")]
    InvalidFormat { input: String, parts: usize },
}

/// Failures of the blob protector.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("ciphertext truncated: {0} bytes is shorter than nonce and tag")]
    Truncated(usize),

    #[error("authentication failed: wrong key or corrupted data")]
    AuthenticationFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("platform data protection failed: {0}")]
    Platform(String),
}

/// Failures reading or writing the cache file.
#[derive(Error, Debug)]
pub enum PersistError {
    #[error("failed to read cache file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write cache file: {0}")]
    Write(#[source] std::io::Error),

    #[error("failed to remove cache file: {0}")]
    Remove(#[source] std::io::Error),

    #[error("cache file is not valid UTF-8")]
    NotUtf8,

    #[error("malformed cache contents: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("failed to serialize cache: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Configuration resolution failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to determine a data directory; pass --dir or set SEALCACHE_DATA_DIR")]
    NoDataDir,

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
