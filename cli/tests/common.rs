//! # Bunny CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration test files. Every command started
//! through `bunny_cmd` reads an explicit (empty by default) configuration
//! file, so the tests never pick up a developer's own `~/.config/bunny` or
//! `.bunny.toml`.
//!

// Allow potentially unused code in this common module, as different test files might use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

/// Creates a command for the compiled `bunny` binary.
///
/// ## Panics
/// Panics if the `bunny` binary cannot be found via `Command::cargo_bin`.
pub fn bunny_raw_cmd() -> Command {
    Command::cargo_bin("bunny").expect("Failed to find bunny binary for testing")
}

/// A temporary directory holding a `bunny.toml` for one test.
pub struct TestConfig {
    pub dir: TempDir,
}

impl TestConfig {
    /// Writes `content` as the configuration file.
    pub fn new(content: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp config dir");
        fs::write(dir.path().join("bunny.toml"), content).expect("Failed to write config");
        Self { dir }
    }

    /// A configuration whose `engine.tables_file` points at a file holding
    /// `tables`.
    pub fn with_tables(tables: &str) -> Self {
        let config = Self::new("");
        let tables_path = config.write_file("tables.toml", tables);
        config.write_file(
            "bunny.toml",
            &format!("[engine]\ntables_file = {:?}\n", tables_path),
        );
        config
    }

    /// Writes an extra file next to the configuration and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write test file");
        path.to_string_lossy().to_string()
    }

    /// A `bunny` command pointed at this configuration.
    pub fn cmd(&self) -> Command {
        let mut cmd = bunny_raw_cmd();
        cmd.env("BUNNY_CONFIG", self.dir.path().join("bunny.toml"))
            .env_remove("RUST_LOG");
        cmd
    }
}

/// `bunny` with an empty configuration (all defaults).
///
/// The returned `TestConfig` must be kept alive while the command runs.
pub fn bunny_cmd() -> (TestConfig, Command) {
    let config = TestConfig::new("");
    let cmd = config.cmd();
    (config, cmd)
}
