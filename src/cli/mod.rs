//! CLI argument definitions for the gist tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Gist - manage your GitHub gists from the command line.
#[derive(Parser, Debug)]
#[command(name = "gist")]
#[command(author, version, about = "A command-line client for GitHub gists", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List your gists, one line each
    List,

    /// Clone a gist, edit its files, and push the result back
    Edit {
        /// Gist ID
        id: String,
    },

    /// Replace the description of a gist
    Description {
        /// Gist ID
        id: String,

        /// New description
        desc: String,
    },

    /// Show the full JSON metadata of a gist
    Info {
        /// Gist ID
        id: String,
    },

    /// Fork a gist into your account
    Fork {
        /// Gist ID
        id: String,
    },

    /// List the file names of a gist
    Files {
        /// Gist ID
        id: String,
    },

    /// Delete one or more gists
    Delete {
        /// Gist IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Download a gist as <id>.tar.gz in the current directory
    Archive {
        /// Gist ID
        id: String,
    },

    /// Print the content of a gist's files
    Content {
        /// Gist ID
        id: String,

        /// Only print this file
        filename: Option<String>,

        /// Decrypt files with GPG before printing
        #[arg(long)]
        decrypt: bool,
    },

    /// Create a new gist from files, stdin, or your editor
    Create {
        /// Description of the gist
        desc: String,

        /// Make the gist public
        #[arg(long)]
        public: bool,

        /// Encrypt each file with GPG before upload
        #[arg(long)]
        encrypt: bool,

        /// Name for content captured from stdin or the editor
        #[arg(long)]
        filename: Option<String>,

        /// Existing files to upload
        #[arg(value_name = "FILES")]
        files: Vec<PathBuf>,
    },

    /// Clone a gist repository
    Clone {
        /// Gist ID
        id: String,

        /// Directory name for the clone
        name: Option<PathBuf>,
    },

    /// Show version and build information
    Version,
}

/// Get the package version from Cargo.toml.
pub fn package_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Get the git commit hash baked in at build time.
pub fn git_commit() -> &'static str {
    env!("GIST_GIT_COMMIT")
}

/// Get the build timestamp baked in at build time.
pub fn build_timestamp() -> &'static str {
    env!("GIST_BUILD_TIMESTAMP")
}
