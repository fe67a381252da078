//! Gist - a command-line client for GitHub gists.
//!
//! This library provides the core functionality for the `gist` CLI tool,
//! including configuration handling, content acquisition, GPG encryption,
//! and the GitHub gist API backend.

pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod fileset;
pub mod format;
pub mod gpg;
pub mod remote;

/// Library-level error type for gist operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("{0}")]
    Remote(String),
}

/// Result type alias for gist operations.
pub type Result<T> = std::result::Result<T, Error>;
