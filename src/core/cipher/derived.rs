//! AES-256-GCM backend with a host-derived key.
//!
//! Blob layout: `[nonce (12) | tag (16) | ciphertext]`. The key is derived
//! with PBKDF2-HMAC-SHA256 on every call and wiped right after use.

use std::path::Path;

use aes_gcm::aead::{AeadCore, AeadInPlace, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce, Tag};
use sha2::Sha256;
use tracing::trace;
use zeroize::Zeroizing;

use super::{HostEntropy, Protector};
use crate::core::constants::{KDF_ITERATIONS, KDF_SALT, KEY_LEN, NONCE_LEN, TAG_LEN};
use crate::error::{CipherError, Result};

/// Password-less protector keyed to the current machine and user.
#[derive(Debug, Clone)]
pub struct DerivedKey {
    entropy: HostEntropy,
}

impl DerivedKey {
    pub fn new(entropy: HostEntropy) -> Self {
        Self { entropy }
    }

    fn cipher(&self) -> Result<Aes256Gcm> {
        let material = self.entropy.material();
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2::pbkdf2_hmac::<Sha256>(&material, KDF_SALT, KDF_ITERATIONS, key.as_mut_slice());

        Aes256Gcm::new_from_slice(key.as_slice())
            .map_err(|e| CipherError::KeyDerivation(e.to_string()).into())
    }
}

impl Protector for DerivedKey {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        trace!(plaintext_len = plaintext.len(), "encrypting");

        let cipher = self.cipher()?;
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let mut buffer = plaintext.to_vec();
        let tag = cipher
            .encrypt_in_place_detached(&nonce, b"", &mut buffer)
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + TAG_LEN + buffer.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&tag);
        blob.extend_from_slice(&buffer);

        trace!(blob_len = blob.len(), "encrypted");
        Ok(blob)
    }

    fn decrypt(&self, blob: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        trace!(blob_len = blob.len(), "decrypting");

        if blob.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Truncated(blob.len()).into());
        }
        let (nonce, rest) = blob.split_at(NONCE_LEN);
        let (tag, ciphertext) = rest.split_at(TAG_LEN);

        let cipher = self.cipher()?;
        let mut buffer = Zeroizing::new(ciphertext.to_vec());
        cipher
            .decrypt_in_place_detached(
                Nonce::from_slice(nonce),
                b"",
                buffer.as_mut_slice(),
                Tag::from_slice(tag),
            )
            .map_err(|_| CipherError::AuthenticationFailed)?;

        trace!(plaintext_len = buffer.len(), "decrypted");
        Ok(buffer)
    }

    fn harden(&self, path: &Path) -> Result<()> {
        super::restrict_to_owner(path)
    }

    fn name(&self) -> &'static str {
        "aes-256-gcm"
    }
}
