//! Tests for error handling and CLI flags.

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    for command in ["path", "status", "list", "migrate", "clear"] {
        assert!(out.contains(command), "help missing '{}'", command);
    }
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_verbose_flag_accepted() {
    let t = Test::new();

    let output = t.cmd().args(["--verbose", "status"]).output().unwrap();
    assert_success(&output);
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    t.cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("sealcache"));
}

#[test]
fn test_malformed_config_reports_error() {
    let t = Test::new();
    std::fs::write(t.dir.path().join("config.toml"), "file_name = [").unwrap();

    t.cmd()
        .arg("status")
        .assert()
        .failure()
        .stderr(predicates::str::contains("✗"))
        .stderr(predicates::str::contains("failed to parse config file"));
}
