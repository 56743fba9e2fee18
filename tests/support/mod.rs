//! Test support utilities for sealcache integration tests.
//!
//! Provides an isolated data directory per test and helpers to drive both
//! the library and the binary against it.

#![allow(dead_code)]

pub mod assertions;

#[allow(unused_imports)]
pub use assertions::*;

use assert_cmd::Command;
use sealcache::{Cache, Config, DerivedKey, HostEntropy, Protector, SessionRecord};
use std::path::PathBuf;
use tempfile::TempDir;

/// Test environment with an isolated data directory.
///
/// Child processes receive the directory through `SEALCACHE_DATA_DIR`, so
/// tests can run in parallel without touching the real cache.
pub struct Test {
    pub dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    pub fn config(&self) -> Config {
        Config::new(self.dir.path())
    }

    pub fn cache_path(&self) -> PathBuf {
        self.config().cache_path()
    }

    /// Open the cache with the same protector the binary uses.
    pub fn cache(&self) -> Cache {
        Cache::open(&self.config())
    }

    /// Open the cache with a fixed host identity.
    pub fn cache_as(&self, machine_id: &str, username: &str) -> Cache {
        Cache::open_with(&self.config(), protector(machine_id, username))
    }

    /// Write a plaintext cache file, as older clients did.
    pub fn write_legacy(&self, json: &str) {
        std::fs::write(self.cache_path(), json).expect("failed to write legacy cache");
    }

    /// A sealcache command pointed at this environment.
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("sealcache").expect("failed to find sealcache binary");
        cmd.env("SEALCACHE_DATA_DIR", self.dir.path());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("SEALCACHE_LOG");
        cmd
    }
}

pub fn protector(machine_id: &str, username: &str) -> Box<dyn Protector> {
    Box::new(DerivedKey::new(HostEntropy::new(
        "sealcache",
        machine_id,
        username,
    )))
}

pub fn session(id: &str) -> SessionRecord {
    SessionRecord {
        id: id.to_string(),
        access_token: "access-token-value".to_string(),
        refresh_token: "refresh-token-value".to_string(),
        user_id: "u-42".to_string(),
        username: "alice".to_string(),
        email: Some("alice@example.com".to_string()),
    }
}
