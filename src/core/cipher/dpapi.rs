//! Windows Data Protection API backend.
//!
//! The OS scopes the key to the current user, so no key derivation or
//! permission hardening is needed.

#![cfg(windows)]

use std::path::Path;
use std::ptr;

use tracing::trace;
use windows_sys::Win32::Foundation::LocalFree;
use windows_sys::Win32::Security::Cryptography::{
    CryptProtectData, CryptUnprotectData, CRYPTPROTECT_UI_FORBIDDEN, CRYPT_INTEGER_BLOB,
};
use zeroize::{Zeroize, Zeroizing};

use super::Protector;
use crate::error::{CipherError, Result};

/// User-scoped DPAPI protector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dpapi;

fn input_blob(data: &[u8]) -> Result<CRYPT_INTEGER_BLOB> {
    let len = u32::try_from(data.len())
        .map_err(|_| CipherError::Platform("blob larger than 4 GiB".to_string()))?;
    Ok(CRYPT_INTEGER_BLOB {
        cbData: len,
        pbData: data.as_ptr() as *mut u8,
    })
}

/// Copy a DPAPI-allocated output blob into a Vec and release it.
///
/// # Safety
///
/// `blob` must have been filled by a successful DPAPI call.
unsafe fn take_output(blob: CRYPT_INTEGER_BLOB) -> Vec<u8> {
    let slice = std::slice::from_raw_parts_mut(blob.pbData, blob.cbData as usize);
    let out = slice.to_vec();
    slice.zeroize();
    LocalFree(blob.pbData as _);
    out
}

impl Protector for Dpapi {
    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        trace!(plaintext_len = plaintext.len(), "protecting");

        let input = input_blob(plaintext)?;
        let mut output = CRYPT_INTEGER_BLOB {
            cbData: 0,
            pbData: ptr::null_mut(),
        };

        // SAFETY: input points at live memory for the duration of the call;
        // output is allocated by DPAPI and released in take_output.
        let ok = unsafe {
            CryptProtectData(
                &input,
                ptr::null(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
                CRYPTPROTECT_UI_FORBIDDEN,
                &mut output,
            )
        };
        if ok == 0 {
            let err = std::io::Error::last_os_error();
            return Err(CipherError::Platform(err.to_string()).into());
        }

        Ok(unsafe { take_output(output) })
    }

    fn decrypt(&self, blob: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
        trace!(blob_len = blob.len(), "unprotecting");

        let input = input_blob(blob)?;
        let mut output = CRYPT_INTEGER_BLOB {
            cbData: 0,
            pbData: ptr::null_mut(),
        };

        // SAFETY: as in encrypt.
        let ok = unsafe {
            CryptUnprotectData(
                &input,
                ptr::null_mut(),
                ptr::null(),
                ptr::null(),
                ptr::null(),
                CRYPTPROTECT_UI_FORBIDDEN,
                &mut output,
            )
        };
        if ok == 0 {
            return Err(CipherError::AuthenticationFailed.into());
        }

        Ok(Zeroizing::new(unsafe { take_output(output) }))
    }

    fn harden(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "dpapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let blob = Dpapi.encrypt(b"hello").unwrap();
        assert_eq!(Dpapi.decrypt(&blob).unwrap().as_slice(), b"hello");
    }

    #[test]
    fn test_garbage_fails() {
        assert!(Dpapi.decrypt(b"{\"session\":null}").is_err());
    }
}
