//! Common test utilities for gist integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never read
//! the developer's real `~/.gist` configuration.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with an isolated home directory.
///
/// Commands run with `HOME` pointed at a fresh temp directory, so
/// config discovery only sees files the test wrote. Env vars are set
/// per-subprocess, keeping tests parallel-safe.
pub struct TestEnv {
    pub home: TempDir,
    pub workdir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with an empty home.
    pub fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            workdir: TempDir::new().unwrap(),
        }
    }

    /// Create a test environment with a minimal valid `~/.gist`.
    pub fn with_config() -> Self {
        let env = Self::new();
        env.write_config("[gist]\ntoken = test-token\n");
        env
    }

    /// Write `~/.gist` inside the isolated home.
    pub fn write_config(&self, content: &str) -> PathBuf {
        let path = self.home.path().join(".gist");
        fs::write(&path, content).unwrap();
        path
    }

    /// Get a Command for the gist binary with the isolated home.
    pub fn gist(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_gist"));
        cmd.current_dir(self.workdir.path());
        cmd.env("HOME", self.home.path());
        cmd.env_remove("XDG_DATA_HOME");
        cmd.env_remove("EDITOR");
        cmd
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
