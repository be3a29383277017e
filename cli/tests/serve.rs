//! # Bunny CLI Serve Integration Tests
//!
//! File: cli/tests/serve.rs
//!
//! ## Overview
//!
//! Command-line level checks for `bunny serve`. The HTTP routes themselves
//! are exercised in-process in `serve::server_logic`'s unit tests; running
//! the real server here would block until it is signalled.
//!

mod common;
use common::*;
use predicates::prelude::*;

#[test]
fn test_serve_help_lists_flags() {
    bunny_raw_cmd()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--port")
                .and(predicate::str::contains("--host"))
                .and(predicate::str::contains("--no-cors"))
                .and(predicate::str::contains("--farewell")),
        );
}

#[test]
fn test_serve_rejects_invalid_host_flag() {
    let (_config, mut cmd) = bunny_cmd();
    cmd.args(["serve", "--host", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_serve_reports_bad_tables_before_binding() {
    let config = TestConfig::with_tables("this is not toml = = =");

    config
        .cmd()
        .args(["serve", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid tables file"));
}
