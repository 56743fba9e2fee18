//! Tests for `path`, `status` and `list`.

use crate::support::*;
use predicates::prelude::*;
use sealcache::{CacheKey, SecretsCache, Ttl};
use std::time::Duration;

fn populate(t: &Test) {
    let cache = t.cache();
    let token = CacheKey::new("svc", "user1", "token");
    cache
        .secrets()
        .set(token.clone(), b"super-secret-bytes", 0, Ttl::Infinite);
    cache.secrets().set(
        CacheKey::new("svc", "user1", "otp"),
        b"123456",
        1,
        Ttl::For(Duration::from_secs(3600)),
    );
    cache
        .secrets()
        .include_in_group(CacheKey::new("svc", "user1", "all"), vec![token]);
    cache.session().set(session("s-1"));
}

#[test]
fn test_path_honors_dir() {
    let t = Test::new();

    let output = t.cmd().arg("path").output().unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), t.cache_path().display().to_string());
}

#[test]
fn test_path_flag_overrides_env() {
    let t = Test::new();
    let other = tempfile::TempDir::new().unwrap();

    t.cmd()
        .args(["--dir", other.path().to_str().unwrap(), "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            other.path().join("cache.bin").display().to_string(),
        ));
}

#[test]
fn test_status_without_file() {
    let t = Test::new();

    let output = t.cmd().arg("status").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "no cache file");
    assert_stdout_contains(&output, "none");
    assert!(!t.cache_path().exists());
}

#[test]
fn test_status_reports_contents() {
    let t = Test::new();
    populate(&t);

    let output = t.cmd().arg("status").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "encrypted");
    assert_stdout_contains(&output, "alice <alice@example.com>");
    assert_output_excludes(&output, "access-token-value");
    assert_output_excludes(&output, "refresh-token-value");
}

#[test]
fn test_status_on_corrupt_file_keeps_it() {
    let t = Test::new();
    std::fs::write(t.cache_path(), [0xff, 0xfe, 0x00, 0x01]).unwrap();

    let output = t.cmd().arg("status").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "unreadable");
    assert_stdout_contains(&output, "sealcache clear");
    assert!(t.cache_path().exists());
}

#[test]
fn test_list_table() {
    let t = Test::new();
    populate(&t);

    let output = t.cmd().arg("list").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "svc:user1:token");
    assert_stdout_contains(&output, "svc:user1:all");
    assert_stdout_contains(&output, "group");
    assert_stdout_contains(&output, "never");
    assert_output_excludes(&output, "super-secret-bytes");
}

#[test]
fn test_list_json() {
    let t = Test::new();
    populate(&t);

    let output = t.cmd().args(["list", "--json"]).output().unwrap();
    assert_success(&output);

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 3);

    let keys: Vec<&str> = items.iter().map(|i| i["key"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["svc:user1:all", "svc:user1:otp", "svc:user1:token"]);
    assert_eq!(items[0]["kind"], "group");
    assert!(items[1]["expires_at"].is_string());
    assert!(items[2]["expires_at"].is_null());
    assert!(items.iter().all(|i| i.get("bytes").is_none()));
}

#[test]
fn test_list_empty() {
    let t = Test::new();

    t.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("no cached entries"));

    t.cmd()
        .args(["list", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}
