//! Tests for `migrate` and `clear`.

use crate::support::*;
use predicates::prelude::*;
use sealcache::LoadSource;

const LEGACY: &str = r#"{"secrets":{"svc:user1:token":{"bytes":"AQID","flags":0}}}"#;

#[test]
fn test_migrate_encrypts_legacy_file() {
    let t = Test::new();
    t.write_legacy(LEGACY);

    t.cmd()
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("encrypted legacy cache"));

    let raw = std::fs::read(t.cache_path()).unwrap();
    assert!(serde_json::from_slice::<serde_json::Value>(&raw).is_err());

    let cache = t.cache();
    assert_eq!(cache.load_source(), LoadSource::Encrypted);
    assert_eq!(cache.secrets().len(), 1);
}

#[test]
fn test_migrate_is_noop_when_encrypted() {
    let t = Test::new();
    {
        let cache = t.cache();
        cache.session().set(session("s-1"));
    }
    let before = std::fs::read(t.cache_path()).unwrap();

    t.cmd()
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to migrate (encrypted)"));

    assert_eq!(std::fs::read(t.cache_path()).unwrap(), before);
}

#[test]
fn test_migrate_without_file() {
    let t = Test::new();

    t.cmd()
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to migrate"));
    assert!(!t.cache_path().exists());
}

#[test]
fn test_clear_removes_file() {
    let t = Test::new();
    {
        let cache = t.cache();
        cache.session().set(session("s-1"));
    }
    assert!(t.cache_path().exists());

    t.cmd()
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("removed"));
    assert!(!t.cache_path().exists());
}

#[test]
fn test_clear_removes_corrupt_file() {
    let t = Test::new();
    std::fs::write(t.cache_path(), b"not a cache").unwrap();

    t.cmd().arg("clear").assert().success();
    assert!(!t.cache_path().exists());
}

#[test]
fn test_clear_without_file() {
    let t = Test::new();

    t.cmd()
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("no cache file to remove"));
}
