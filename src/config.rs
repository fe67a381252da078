//! Configuration loading for the gist CLI.
//!
//! Configuration lives in an INI file with a single `[gist]` section:
//!
//! ```ini
//! [gist]
//! token = <GitHub API token>
//! editor = vim
//! log-level = error
//! gnupg-homedir = ~/.gnupg
//! gnupg-fingerprint = 0123456789ABCDEF
//! delete-tempfiles = yes
//! ```
//!
//! The file is looked up in the first existing location out of
//! `~/.config/gist`, `$XDG_DATA_HOME/gist`, and `~/.gist`. Only `token`
//! is required; everything else has a default or is validated lazily by
//! the command that needs it.

use std::env;
use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::level_filters::LevelFilter;

use crate::{Error, Result};

/// Section name inside the configuration file.
const SECTION: &str = "gist";

/// Fallback editor installed by the alternatives system on most distros.
const ALTERNATIVES_EDITOR: &str = "/usr/bin/editor";

/// Fully resolved configuration for one process run.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub API token used to authenticate every remote call.
    pub token: String,
    /// Editor command, resolved from config, `$EDITOR`, or the
    /// alternatives symlink. `None` until a command actually needs one.
    pub editor: Option<String>,
    /// Maximum level for diagnostic logging.
    pub log_level: LevelFilter,
    /// GnuPG home directory for encrypt/decrypt operations.
    pub gnupg_homedir: Option<PathBuf>,
    /// GnuPG key fingerprint used as the encryption recipient.
    pub gnupg_fingerprint: Option<String>,
    /// Whether editor temp files are removed after their content is read.
    pub delete_tempfiles: bool,
}

impl Config {
    /// Load configuration from the first discovered config file.
    pub fn load() -> Result<Self> {
        Self::from_ini(&config_path()?)
    }

    /// Load configuration from a specific INI file.
    pub fn from_ini(path: &Path) -> Result<Self> {
        let ini = Ini::load_from_file(path).map_err(|e| {
            Error::Config(format!(
                "unable to load configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let section = ini.section(Some(SECTION)).ok_or_else(|| {
            Error::Config(format!(
                "missing [{}] section in {}",
                SECTION,
                path.display()
            ))
        })?;

        let token = section
            .get("token")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Config(format!("missing 'token' in {}", path.display())))?
            .to_string();

        let log_level = match section.get("log-level") {
            Some(level) => level.trim().parse().unwrap_or(LevelFilter::ERROR),
            None => LevelFilter::ERROR,
        };

        let delete_tempfiles = match section.get("delete-tempfiles") {
            Some(value) => parse_bool(value)?,
            None => true,
        };

        Ok(Config {
            token,
            editor: resolve_editor(section.get("editor")),
            log_level,
            gnupg_homedir: section.get("gnupg-homedir").map(expand_tilde),
            gnupg_fingerprint: section
                .get("gnupg-fingerprint")
                .map(|f| f.trim().to_string()),
            delete_tempfiles,
        })
    }

    /// Editor command, or a configuration error if none could be resolved.
    pub fn require_editor(&self) -> Result<&str> {
        self.editor
            .as_deref()
            .ok_or_else(|| Error::Config("unable to find an editor".to_string()))
    }

    /// GnuPG home directory, or a configuration error if unset.
    pub fn require_gnupg_homedir(&self) -> Result<&Path> {
        self.gnupg_homedir
            .as_deref()
            .ok_or_else(|| Error::Config("gnupg-homedir missing from config file".to_string()))
    }

    /// GnuPG fingerprint, or a configuration error if unset.
    pub fn require_gnupg_fingerprint(&self) -> Result<&str> {
        self.gnupg_fingerprint
            .as_deref()
            .ok_or_else(|| Error::Config("gnupg-fingerprint missing from config file".to_string()))
    }
}

/// Locate the configuration file.
///
/// Checked in order: `~/.config/gist`, `$XDG_DATA_HOME/gist`, `~/.gist`.
/// The first path that exists as a file wins; if none exist the default
/// `~/.gist` is returned so the load error names a sensible path.
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| Error::Config("unable to determine home directory".to_string()))?;

    let mut candidates = vec![home.join(".config").join("gist")];
    if let Some(xdg_data) = env::var_os("XDG_DATA_HOME") {
        if !xdg_data.is_empty() {
            candidates.push(PathBuf::from(xdg_data).join("gist"));
        }
    }

    for candidate in candidates {
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    Ok(home.join(".gist"))
}

/// Resolve the editor command.
///
/// The config value wins, then a non-empty `$EDITOR`, then the
/// alternatives symlink if it exists. `None` when nothing matches.
fn resolve_editor(from_config: Option<&str>) -> Option<String> {
    if let Some(editor) = from_config {
        let editor = editor.trim();
        if !editor.is_empty() {
            return Some(editor.to_string());
        }
    }
    if let Ok(editor) = env::var("EDITOR") {
        let editor = editor.trim();
        if !editor.is_empty() {
            return Some(editor.to_string());
        }
    }
    if Path::new(ALTERNATIVES_EDITOR).exists() {
        return Some(ALTERNATIVES_EDITOR.to_string());
    }
    None
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "yes" | "true" | "on" => Ok(true),
        "0" | "no" | "false" | "off" => Ok(false),
        other => Err(Error::Config(format!(
            "invalid boolean '{}' for delete-tempfiles",
            other
        ))),
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    let path = path.trim();
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
