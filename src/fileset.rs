//! Gathering local content for `gist create`.
//!
//! Content comes from exactly one of three sources: paths named on the
//! command line, piped stdin, or an interactive editor session. The
//! choice between stdin and the editor follows whether stdin is a
//! terminal. Every acquired file must end up non-empty.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::Config;
use crate::{Error, Result, editor};

/// Default name for content captured from stdin or an editor buffer.
pub const DEFAULT_FILENAME: &str = "file1.txt";

/// One file destined for a gist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub content: String,
}

/// Ordered set of files for a single create call.
pub type FileSet = Vec<FileEntry>;

/// Gather gist content from paths, stdin, or an interactive editor.
///
/// `filename` only applies to the single-file sources and conflicts
/// with an explicit list of paths.
pub fn acquire(paths: &[PathBuf], filename: Option<&str>, config: &Config) -> Result<FileSet> {
    let files = if !paths.is_empty() {
        if filename.is_some() {
            return Err(Error::Validation(
                "--filename is incompatible with a list of files".to_string(),
            ));
        }
        debug!("action: - reading from files");
        from_paths(paths)?
    } else {
        let name = filename.unwrap_or(DEFAULT_FILENAME);
        if io::stdin().is_terminal() {
            debug!("action: - reading from editor");
            from_editor(name, config)?
        } else {
            debug!("action: - reading from stdin");
            from_reader(name, &mut io::stdin().lock())?
        }
    };

    ensure_non_empty(&files)?;
    Ok(files)
}

/// Read each named path into an entry, keeping the argument order.
fn from_paths(paths: &[PathBuf]) -> Result<FileSet> {
    paths
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    Error::Validation(format!("invalid file path: {}", path.display()))
                })?;
            let content = fs::read_to_string(path).map_err(|e| {
                Error::Validation(format!("unable to read {}: {}", path.display(), e))
            })?;
            Ok(FileEntry { name, content })
        })
        .collect()
}

fn from_reader(name: &str, reader: &mut dyn Read) -> Result<FileSet> {
    let mut content = String::new();
    reader.read_to_string(&mut content)?;
    Ok(vec![FileEntry {
        name: name.to_string(),
        content,
    }])
}

/// Capture content by letting the user edit a fresh temp file.
///
/// The temp file is removed once read unless `delete-tempfiles` is
/// turned off, in which case it is kept for the user to inspect. The
/// kept file is persisted before the editor runs, so the buffer
/// survives a failed editor session.
fn from_editor(name: &str, config: &Config) -> Result<FileSet> {
    let editor = config.require_editor()?;

    let tmp = NamedTempFile::new()?;
    debug!("action: - created {}", tmp.path().display());

    let content = if config.delete_tempfiles {
        editor::open(editor, &[tmp.path()])?;
        let content = fs::read_to_string(tmp.path())?;
        let path = tmp.path().to_path_buf();
        tmp.close()?;
        debug!("action: - removed {}", path.display());
        content
    } else {
        let path = tmp.into_temp_path().keep().map_err(|e| Error::Io(e.error))?;
        debug!("action: - kept {}", path.display());
        editor::open(editor, &[path.as_path()])?;
        fs::read_to_string(&path)?
    };

    Ok(vec![FileEntry {
        name: name.to_string(),
        content,
    }])
}

fn ensure_non_empty(files: &FileSet) -> Result<()> {
    for file in files {
        if file.content.is_empty() {
            return Err(Error::Validation(format!("'{}' is empty", file.name)));
        }
    }
    Ok(())
}
