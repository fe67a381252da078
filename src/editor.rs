//! Launching the user's editor.

use std::path::Path;
use std::process::Command;

use crate::{Error, Result};

/// Open the editor on the given paths and wait for it to close.
///
/// The editor value may carry its own arguments (e.g. `code -w`); it is
/// split on whitespace and the paths are appended. The call blocks until
/// the editor process exits.
pub fn open(editor: &str, paths: &[&Path]) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::Config("unable to find an editor".to_string()))?;

    let status = Command::new(program)
        .args(parts)
        .args(paths)
        .status()
        .map_err(|e| Error::Config(format!("failed to launch editor '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(Error::Config(format!(
            "editor '{}' exited with non-zero status",
            editor
        )));
    }

    Ok(())
}
