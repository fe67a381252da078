//! Output formatting for the command routines.
//!
//! Everything here writes to a caller-supplied writer so tests can
//! render into a buffer.

use std::io::Write;

use terminal_size::{Width, terminal_size};

use crate::Result;
use crate::gpg::Cipher;
use crate::remote::GistContent;

/// Width of the attached terminal, if any.
pub fn terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Shorten `text` to `width` characters, marking the cut with `...`.
///
/// Widths of three or fewer are left alone since the marker would not
/// fit. `None` disables eliding entirely.
pub fn elide(text: &str, width: Option<usize>) -> String {
    if let Some(width) = width {
        if width > 3 && text.chars().count() > width {
            let kept: String = text.chars().take(width - 3).collect();
            return format!("{}...", kept);
        }
    }
    text.to_string()
}

/// Render gist files, optionally restricted to one name.
///
/// Without a filename every file is printed as a `name:` header block;
/// with one, just that file's bare content. A cipher decrypts each
/// printed file and tags headers with a `(decrypted)` marker. Asking
/// for a filename the gist does not have prints nothing.
pub fn write_content(
    out: &mut dyn Write,
    content: &GistContent,
    filename: Option<&str>,
    cipher: Option<&dyn Cipher>,
) -> Result<()> {
    match filename {
        Some(name) => {
            if let Some(text) = content.get(name) {
                match cipher {
                    Some(cipher) => writeln!(out, "{}", cipher.decrypt(text)?)?,
                    None => writeln!(out, "{}", text)?,
                }
            }
        }
        None => {
            for (name, text) in content.iter() {
                match cipher {
                    Some(cipher) => {
                        writeln!(out, "{} (decrypted):\n{}\n", name, cipher.decrypt(text)?)?;
                    }
                    None => writeln!(out, "{}:\n{}\n", name, text)?,
                }
            }
        }
    }
    Ok(())
}
