//! GPG encryption and decryption of gist content.
//!
//! All cryptography is delegated to the `gpg` binary, pointed at the
//! home directory named by `gnupg-homedir`. The [`Cipher`] trait is the
//! seam that lets the create and content paths run against a stand-in
//! in tests.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::fileset::{FileEntry, FileSet};
use crate::{Error, Result};

/// Encrypt/decrypt pair over armored text.
pub trait Cipher {
    /// Encrypt `plaintext` for the key identified by `recipient`.
    fn encrypt(&self, plaintext: &str, recipient: &str) -> Result<String>;

    /// Decrypt `ciphertext` with whatever secret key is available.
    fn decrypt(&self, ciphertext: &str) -> Result<String>;
}

/// Cipher backed by the `gpg` binary and a dedicated home directory.
pub struct GpgCipher {
    homedir: PathBuf,
}

impl GpgCipher {
    pub fn new(homedir: impl Into<PathBuf>) -> Self {
        Self {
            homedir: homedir.into(),
        }
    }

    fn run(&self, args: &[&str], input: &str) -> Result<String> {
        let mut child = Command::new("gpg")
            .arg("--homedir")
            .arg(&self.homedir)
            .args(["--batch", "--yes"])
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Encryption(format!("failed to run gpg: {}", e)))?;

        {
            use std::io::Write;
            let stdin = child.stdin.as_mut().unwrap();
            stdin
                .write_all(input.as_bytes())
                .map_err(|e| Error::Encryption(format!("failed to write to gpg: {}", e)))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| Error::Encryption(format!("failed to wait for gpg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Encryption(stderr.trim().to_string()));
        }

        String::from_utf8(output.stdout)
            .map_err(|_| Error::Encryption("gpg produced non-UTF-8 output".to_string()))
    }
}

impl Cipher for GpgCipher {
    fn encrypt(&self, plaintext: &str, recipient: &str) -> Result<String> {
        self.run(
            &["--armor", "--encrypt", "--recipient", recipient],
            plaintext,
        )
    }

    fn decrypt(&self, ciphertext: &str) -> Result<String> {
        self.run(&["--decrypt"], ciphertext)
    }
}

/// Encrypt every entry of a file set, renaming each to `<name>.asc`.
pub fn encrypt_fileset(cipher: &dyn Cipher, recipient: &str, files: FileSet) -> Result<FileSet> {
    debug!("action: - encrypting content");
    files
        .into_iter()
        .map(|file| {
            let content = cipher.encrypt(&file.content, recipient)?;
            Ok(FileEntry {
                name: format!("{}.asc", file.name),
                content,
            })
        })
        .collect()
}
