//! Host entropy for the derived file key.
//!
//! The key material is `"<app-name>|<machine-id>|<os-username>"`, so a cache
//! file only decrypts for the same user on the same machine.

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::constants::MACHINE_ID_FILES;

/// Inputs to the file key derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEntropy {
    app_name: String,
    machine_id: String,
    username: String,
}

impl HostEntropy {
    /// Build entropy from explicit parts.
    pub fn new(
        app_name: impl Into<String>,
        machine_id: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            machine_id: machine_id.into(),
            username: username.into(),
        }
    }

    /// Detect the machine id and OS user for the running process.
    pub fn detect(app_name: &str) -> Self {
        Self::new(app_name, machine_id(), whoami::username())
    }

    pub fn machine_id(&self) -> &str {
        &self.machine_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password bytes fed to the KDF.
    pub(crate) fn material(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(
            format!("{}|{}|{}", self.app_name, self.machine_id, self.username).into_bytes(),
        )
    }
}

/// Stable machine identifier.
///
/// Tries the OS machine-id files, then the hardware UUID (macOS), then the
/// hostname. The hostname is a weaker identifier but keeps the cache usable.
fn machine_id() -> String {
    if let Some(id) = MACHINE_ID_FILES.iter().find_map(|path| read_id_file(path)) {
        return id;
    }

    if let Some(id) = hardware_uuid() {
        return id;
    }

    match whoami::fallible::hostname() {
        Ok(host) => {
            debug!("no machine id available, falling back to hostname");
            host
        }
        Err(e) => {
            warn!(error = %e, "unable to determine machine identity");
            "unknown-host".to_string()
        }
    }
}

fn read_id_file(path: &str) -> Option<String> {
    let contents = std::fs::read_to_string(path).ok()?;
    let id = contents.trim();
    if id.is_empty() {
        return None;
    }
    debug!(path, "using machine id file");
    Some(id.to_string())
}

#[cfg(target_os = "macos")]
fn hardware_uuid() -> Option<String> {
    let output = std::process::Command::new("ioreg")
        .args(["-rd1", "-c", "IOPlatformExpertDevice"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout);
    parse_platform_uuid(&text)
}

#[cfg(not(target_os = "macos"))]
fn hardware_uuid() -> Option<String> {
    None
}

/// Extract `IOPlatformUUID` from `ioreg` output.
#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn parse_platform_uuid(ioreg: &str) -> Option<String> {
    ioreg
        .lines()
        .find(|line| line.contains("\"IOPlatformUUID\""))
        .and_then(|line| line.split('=').nth(1))
        .map(|value| value.trim().trim_matches('"').to_string())
        .filter(|uuid| !uuid.is_empty())
}
