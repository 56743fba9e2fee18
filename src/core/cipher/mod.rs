//! Blob protection for the cache file.
//!
//! Encrypts the serialized cache before it touches the disk. One backend is
//! picked per platform at startup:
//!
//! - **DerivedKey** (Linux, macOS, others): AES-256-GCM with a key derived
//!   from the application name, the machine id and the OS user name.
//! - **Dpapi** (Windows): user-scoped `CryptProtectData`.
//!
//! Callers only see the [`Protector`] trait and never branch on platform.

use std::path::Path;

use zeroize::Zeroizing;

use crate::error::Result;

mod derived;
#[cfg(windows)]
mod dpapi;
mod entropy;

pub use derived::DerivedKey;
#[cfg(windows)]
pub use dpapi::Dpapi;
pub use entropy::HostEntropy;

/// Symmetric at-rest protection for a serialized blob.
pub trait Protector: Send + Sync {
    /// Encrypt `plaintext` into a self-contained blob.
    ///
    /// # Errors
    ///
    /// Returns `CipherError` if the backend fails to encrypt.
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt a blob produced by [`Protector::encrypt`].
    ///
    /// # Errors
    ///
    /// Returns `CipherError` when the blob is truncated, was produced under
    /// a different key, or has been tampered with.
    fn decrypt(&self, blob: &[u8]) -> Result<Zeroizing<Vec<u8>>>;

    /// Restrict access to a freshly written file.
    ///
    /// # Errors
    ///
    /// Returns `Io` if permissions cannot be changed.
    fn harden(&self, path: &Path) -> Result<()>;

    /// Backend name for logs and status output.
    fn name(&self) -> &'static str;
}

/// Protector for the current platform.
#[cfg(not(windows))]
pub fn default_protector(app_name: &str) -> Box<dyn Protector> {
    Box::new(DerivedKey::new(HostEntropy::detect(app_name)))
}

/// Protector for the current platform.
#[cfg(windows)]
pub fn default_protector(_app_name: &str) -> Box<dyn Protector> {
    Box::new(Dpapi)
}

/// Limit a file to owner read/write.
#[cfg(unix)]
pub(crate) fn restrict_to_owner(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn restrict_to_owner(_path: &Path) -> Result<()> {
    Ok(())
}
