//! Command routines behind the CLI.
//!
//! Each routine takes the collaborators it needs (remote api, config,
//! output writer) as arguments, so tests can drive them with doubles
//! and in-memory buffers.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::config::Config;
use crate::gpg::{self, GpgCipher};
use crate::remote::GistApi;
use crate::{Error, Result, cli, fileset, format};

/// Print one line per gist: `<id> <+|-> <description>`, elided to the
/// terminal width.
pub fn list(api: &dyn GistApi, width: Option<usize>, out: &mut dyn Write) -> Result<()> {
    debug!("action: list");
    for gist in api.list()? {
        let marker = if gist.public { '+' } else { '-' };
        let desc = gist.description.as_deref().unwrap_or("");
        let line = format!("{} {} {}", gist.id, marker, desc);
        // A row that cannot be written is logged and skipped.
        if let Err(e) = writeln!(out, "{}", format::elide(&line, width)) {
            error!("unable to write gist {}: {}", gist.id, e);
        }
    }
    Ok(())
}

/// Pretty-print the remote's full metadata for a gist.
pub fn info(api: &dyn GistApi, id: &str, out: &mut dyn Write) -> Result<()> {
    debug!("action: info");
    let value = api.info(id)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
    Ok(())
}

/// Print the file names of a gist, one per line.
pub fn files(api: &dyn GistApi, id: &str, out: &mut dyn Write) -> Result<()> {
    debug!("action: files");
    for name in api.files(id)? {
        writeln!(out, "{}", name)?;
    }
    Ok(())
}

/// Print gist content, optionally a single file, optionally decrypted.
pub fn content(
    api: &dyn GistApi,
    config: &Config,
    id: &str,
    filename: Option<&str>,
    decrypt: bool,
    out: &mut dyn Write,
) -> Result<()> {
    debug!("action: content");
    let content = api.content(id)?;
    if decrypt {
        let cipher = GpgCipher::new(config.require_gnupg_homedir()?);
        format::write_content(out, &content, filename, Some(&cipher))
    } else {
        format::write_content(out, &content, filename, None)
    }
}

/// Create a gist from local content and print its URL.
#[allow(clippy::too_many_arguments)]
pub fn create(
    api: &dyn GistApi,
    config: &Config,
    description: &str,
    files: &[PathBuf],
    filename: Option<&str>,
    public: bool,
    encrypt: bool,
    out: &mut dyn Write,
) -> Result<()> {
    debug!("action: create");

    // Encryption prerequisites are checked before any content is read.
    if encrypt {
        config.require_gnupg_homedir()?;
        config.require_gnupg_fingerprint()?;
    }

    let mut fileset = fileset::acquire(files, filename, config)?;
    if encrypt {
        let cipher = GpgCipher::new(config.require_gnupg_homedir()?);
        fileset = gpg::encrypt_fileset(&cipher, config.require_gnupg_fingerprint()?, fileset)?;
    }

    let url = api.create(description, &fileset, public)?;
    writeln!(out, "{}", url)?;
    Ok(())
}

/// Delete gists, attempting every id even after a failure.
pub fn delete(api: &dyn GistApi, ids: &[String]) -> Result<()> {
    debug!("action: delete");
    let mut failures = Vec::new();
    for id in ids {
        debug!("action: - {}", id);
        if let Err(e) = api.delete(id) {
            error!("unable to delete gist {}: {}", id, e);
            failures.push(id.clone());
        }
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(Error::Remote(format!(
            "unable to delete: {}",
            failures.join(", ")
        )))
    }
}

/// Edit a gist in place through a temporary clone.
pub fn edit(api: &dyn GistApi, id: &str) -> Result<()> {
    debug!("action: edit");
    api.edit(id)
}

/// Replace the description of a gist.
pub fn description(api: &dyn GistApi, id: &str, desc: &str) -> Result<()> {
    debug!("action: description");
    api.set_description(id, desc)
}

/// Fork a gist into the authenticated user's account.
pub fn fork(api: &dyn GistApi, id: &str) -> Result<()> {
    debug!("action: fork");
    let forked = api.fork(id)?;
    debug!("action: - forked as {}", forked.id);
    Ok(())
}

/// Download a gist as `<id>.tar.gz` in the working directory.
pub fn archive(api: &dyn GistApi, id: &str) -> Result<()> {
    debug!("action: archive");
    api.archive(id)
}

/// Clone a gist repository into the working directory.
pub fn clone(api: &dyn GistApi, id: &str, name: Option<&Path>) -> Result<()> {
    debug!("action: clone");
    api.clone(id, name)
}

/// Print version and build information.
pub fn version(out: &mut dyn Write) -> Result<()> {
    debug!("action: version");
    writeln!(
        out,
        "gist v{} ({} {})",
        cli::package_version(),
        cli::git_commit(),
        cli::build_timestamp()
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fileset::{FileEntry, FileSet};
    use crate::remote::{GistContent, GistSummary};
    use std::cell::RefCell;
    use std::fs;
    use std::io;
    use tempfile::TempDir;
    use tracing::level_filters::LevelFilter;

    #[derive(Default)]
    struct MockApi {
        gists: Vec<GistSummary>,
        content: GistContent,
        fail_delete: Vec<String>,
        created: RefCell<Vec<(String, FileSet, bool)>>,
        deleted: RefCell<Vec<String>>,
    }

    impl GistApi for MockApi {
        fn list(&self) -> Result<Vec<GistSummary>> {
            Ok(self.gists.clone())
        }

        fn info(&self, _id: &str) -> Result<serde_json::Value> {
            Ok(serde_json::json!({"id": "abc123", "public": true}))
        }

        fn content(&self, _id: &str) -> Result<GistContent> {
            Ok(self.content.clone())
        }

        fn files(&self, _id: &str) -> Result<Vec<String>> {
            Ok(self.content.names().map(str::to_string).collect())
        }

        fn create(&self, description: &str, files: &FileSet, public: bool) -> Result<String> {
            self.created
                .borrow_mut()
                .push((description.to_string(), files.clone(), public));
            Ok("https://gist.github.com/abc123".to_string())
        }

        fn delete(&self, id: &str) -> Result<()> {
            if self.fail_delete.iter().any(|f| f == id) {
                return Err(Error::Remote(format!("deleting gist: HTTP 404: {}", id)));
            }
            self.deleted.borrow_mut().push(id.to_string());
            Ok(())
        }

        fn archive(&self, _id: &str) -> Result<()> {
            Ok(())
        }

        fn fork(&self, id: &str) -> Result<GistSummary> {
            Ok(GistSummary {
                id: id.to_string(),
                public: false,
                description: None,
            })
        }

        fn set_description(&self, _id: &str, _description: &str) -> Result<()> {
            Ok(())
        }

        fn clone(&self, _id: &str, _directory: Option<&Path>) -> Result<()> {
            Ok(())
        }

        fn edit(&self, _id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn test_config(gnupg_homedir: Option<&str>, gnupg_fingerprint: Option<&str>) -> Config {
        Config {
            token: "abc".to_string(),
            editor: None,
            log_level: LevelFilter::ERROR,
            gnupg_homedir: gnupg_homedir.map(PathBuf::from),
            gnupg_fingerprint: gnupg_fingerprint.map(str::to_string),
            delete_tempfiles: true,
        }
    }

    fn summary(id: &str, public: bool, description: Option<&str>) -> GistSummary {
        GistSummary {
            id: id.to_string(),
            public,
            description: description.map(str::to_string),
        }
    }

    /// Writer double that rejects the first write, then works normally.
    struct FailOnceWriter {
        failed: bool,
        buf: Vec<u8>,
    }

    impl Write for FailOnceWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if !self.failed {
                self.failed = true;
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
            }
            self.buf.write(data)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    // ==================== List Tests ====================

    #[test]
    fn test_list_renders_one_line_per_gist() {
        let api = MockApi {
            gists: vec![
                summary("abc123", true, Some("notes")),
                summary("def456", false, None),
            ],
            ..Default::default()
        };

        let mut out = Vec::new();
        list(&api, None, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "abc123 + notes\ndef456 - \n"
        );
    }

    #[test]
    fn test_list_elides_to_terminal_width() {
        let api = MockApi {
            gists: vec![summary("abc123", true, Some("a very long description"))],
            ..Default::default()
        };

        let mut out = Vec::new();
        list(&api, Some(16), &mut out).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert_eq!(line.trim_end().chars().count(), 16);
        assert!(line.trim_end().ends_with("..."));
        assert!(line.starts_with("abc123 + "));
    }

    #[test]
    fn test_list_skips_row_that_fails_to_write() {
        let api = MockApi {
            gists: vec![
                summary("abc123", true, Some("notes")),
                summary("def456", false, Some("more")),
            ],
            ..Default::default()
        };

        let mut out = FailOnceWriter {
            failed: false,
            buf: Vec::new(),
        };
        list(&api, None, &mut out).unwrap();

        // The row that failed is dropped, the remaining rows still render.
        assert_eq!(String::from_utf8(out.buf).unwrap(), "def456 - more\n");
    }

    // ==================== Info / Files Tests ====================

    #[test]
    fn test_info_pretty_prints_metadata() {
        let api = MockApi::default();

        let mut out = Vec::new();
        info(&api, "abc123", &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\n  \"id\": \"abc123\",\n  \"public\": true\n}\n"
        );
    }

    #[test]
    fn test_files_lists_names_in_remote_order() {
        let api = MockApi {
            content: [("z.txt", "z"), ("a.txt", "a")].into_iter().collect(),
            ..Default::default()
        };

        let mut out = Vec::new();
        files(&api, "abc123", &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "z.txt\na.txt\n");
    }

    // ==================== Content Tests ====================

    #[test]
    fn test_content_renders_all_files() {
        let api = MockApi {
            content: [("a.txt", "hello"), ("b.txt", "world")].into_iter().collect(),
            ..Default::default()
        };

        let mut out = Vec::new();
        content(&api, &test_config(None, None), "abc123", None, false, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a.txt:\nhello\n\nb.txt:\nworld\n\n"
        );
    }

    #[test]
    fn test_content_decrypt_requires_gnupg_homedir() {
        let api = MockApi {
            content: [("a.txt.asc", "sealed")].into_iter().collect(),
            ..Default::default()
        };

        let mut out = Vec::new();
        let err = content(&api, &test_config(None, None), "abc123", None, true, &mut out)
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("gnupg-homedir"));
        assert!(out.is_empty());
    }

    // ==================== Create Tests ====================

    #[test]
    fn test_create_uploads_files_in_order_with_one_call() {
        let dir = TempDir::new().unwrap();
        let foo = dir.path().join("foo.txt");
        let bar = dir.path().join("bar.txt");
        fs::write(&foo, "foo content").unwrap();
        fs::write(&bar, "bar content").unwrap();

        let api = MockApi::default();
        let mut out = Vec::new();
        create(
            &api,
            &test_config(None, None),
            "notes",
            &[foo, bar],
            None,
            true,
            false,
            &mut out,
        )
        .unwrap();

        let created = api.created.borrow();
        assert_eq!(created.len(), 1);
        let (desc, files, public) = &created[0];
        assert_eq!(desc, "notes");
        assert!(*public);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "foo.txt");
        assert_eq!(files[1].name, "bar.txt");

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "https://gist.github.com/abc123\n"
        );
    }

    #[test]
    fn test_create_empty_file_fails_without_remote_call() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "").unwrap();

        let api = MockApi::default();
        let mut out = Vec::new();
        let err = create(
            &api,
            &test_config(None, None),
            "notes",
            &[empty],
            None,
            false,
            false,
            &mut out,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "'empty.txt' is empty");
        assert!(api.created.borrow().is_empty());
        assert!(out.is_empty());
    }

    #[test]
    fn test_create_encrypt_checks_fingerprint_before_reading() {
        // The path does not exist; if acquisition ran first the error
        // would name the file instead of the missing fingerprint.
        let api = MockApi::default();
        let mut out = Vec::new();
        let err = create(
            &api,
            &test_config(Some("/tmp/gnupg"), None),
            "notes",
            &[PathBuf::from("/no/such/file.txt")],
            None,
            false,
            true,
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("gnupg-fingerprint"));
        assert!(api.created.borrow().is_empty());
    }

    #[test]
    fn test_create_encrypt_requires_homedir() {
        let api = MockApi::default();
        let mut out = Vec::new();
        let err = create(
            &api,
            &test_config(None, Some("DEADBEEF")),
            "notes",
            &[PathBuf::from("/no/such/file.txt")],
            None,
            false,
            true,
            &mut out,
        )
        .unwrap_err();

        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("gnupg-homedir"));
    }

    #[test]
    fn test_create_records_entry_content() {
        let api = MockApi::default();
        let files = vec![FileEntry {
            name: "a.txt".to_string(),
            content: "alpha".to_string(),
        }];

        api.create("d", &files, false).unwrap();

        assert_eq!(api.created.borrow()[0].1[0].content, "alpha");
    }

    // ==================== Delete Tests ====================

    #[test]
    fn test_delete_removes_every_gist() {
        let api = MockApi::default();

        delete(&api, &["abc".to_string(), "def".to_string()]).unwrap();

        assert_eq!(*api.deleted.borrow(), vec!["abc", "def"]);
    }

    #[test]
    fn test_delete_keeps_going_after_a_failure() {
        let api = MockApi {
            fail_delete: vec!["bad".to_string()],
            ..Default::default()
        };

        let err = delete(
            &api,
            &["abc".to_string(), "bad".to_string(), "def".to_string()],
        )
        .unwrap_err();

        // Both healthy ids were still deleted, the failure is reported.
        assert_eq!(*api.deleted.borrow(), vec!["abc", "def"]);
        assert!(err.to_string().contains("bad"));
    }

    // ==================== Version Tests ====================

    #[test]
    fn test_version_prints_package_version() {
        let mut out = Vec::new();
        version(&mut out).unwrap();

        let line = String::from_utf8(out).unwrap();
        assert!(line.starts_with(&format!("gist v{}", cli::package_version())));
    }
}
