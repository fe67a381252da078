//! GitHub implementation of the gist backend.
//!
//! REST calls go through `ureq` against `api.github.com`; the clone and
//! edit workflows shell out to `git` against `gist.github.com`.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Deserialize;
use tracing::debug;

use super::{GistApi, GistContent, GistSummary};
use crate::config::Config;
use crate::fileset::FileSet;
use crate::{Error, Result, editor};

/// GitHub API base URL
const GITHUB_API_BASE: &str = "https://api.github.com";

/// Base URL of the git remotes backing each gist
const GIST_GIT_BASE: &str = "https://gist.github.com";

/// User-Agent header required by GitHub API
const USER_AGENT: &str = "gist-cli";

/// API version header value
const API_VERSION: &str = "2022-11-28";

/// Gist backend talking to GitHub with a personal access token.
pub struct GitHubRemote {
    token: String,
    editor: Option<String>,
}

/// Response from GET /gists/{id} (only the fields we care about).
#[derive(Debug, Deserialize)]
struct GistDetail {
    #[serde(default)]
    files: serde_json::Map<String, serde_json::Value>,
}

impl GistDetail {
    /// Flatten the file map into ordered name/content pairs.
    fn into_content(self) -> GistContent {
        self.files
            .into_iter()
            .map(|(name, file)| {
                let content = file
                    .get("content")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                (name, content)
            })
            .collect()
    }
}

/// Response from POST /gists (only the fields we care about).
#[derive(Debug, Deserialize)]
struct CreatedGist {
    id: String,
    html_url: Option<String>,
}

impl CreatedGist {
    /// Browser URL of the new gist, reconstructed from the id if the
    /// response did not carry one.
    fn url(self) -> String {
        self.html_url
            .unwrap_or_else(|| format!("{}/{}", GIST_GIT_BASE, self.id))
    }
}

impl GitHubRemote {
    pub fn new(config: &Config) -> Self {
        Self {
            token: config.token.clone(),
            editor: config.editor.clone(),
        }
    }

    fn request(&self, method: &str, url: &str) -> ureq::Request {
        ureq::request(method, url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", USER_AGENT)
            .set("X-GitHub-Api-Version", API_VERSION)
    }

    fn detail(&self, id: &str) -> Result<GistDetail> {
        let url = format!("{}/gists/{}", GITHUB_API_BASE, id);
        let response = check("fetching gist", self.request("GET", &url).call())?;
        response
            .into_json()
            .map_err(|e| Error::Remote(format!("failed to parse gist response: {}", e)))
    }
}

impl GistApi for GitHubRemote {
    fn list(&self) -> Result<Vec<GistSummary>> {
        let mut url = format!("{}/gists?per_page=100", GITHUB_API_BASE);
        let mut gists = Vec::new();

        loop {
            let response = check("listing gists", self.request("GET", &url).call())?;
            let next = next_page_url(response.header("link"));
            let page: Vec<GistSummary> = response
                .into_json()
                .map_err(|e| Error::Remote(format!("failed to parse gist list: {}", e)))?;
            gists.extend(page);

            match next {
                Some(n) => url = n,
                None => break,
            }
        }

        Ok(gists)
    }

    fn info(&self, id: &str) -> Result<serde_json::Value> {
        let url = format!("{}/gists/{}", GITHUB_API_BASE, id);
        let response = check("fetching gist", self.request("GET", &url).call())?;
        response
            .into_json()
            .map_err(|e| Error::Remote(format!("failed to parse gist response: {}", e)))
    }

    fn content(&self, id: &str) -> Result<GistContent> {
        Ok(self.detail(id)?.into_content())
    }

    fn files(&self, id: &str) -> Result<Vec<String>> {
        let detail = self.detail(id)?;
        Ok(detail.files.into_iter().map(|(name, _)| name).collect())
    }

    fn create(&self, description: &str, files: &FileSet, public: bool) -> Result<String> {
        let url = format!("{}/gists", GITHUB_API_BASE);
        let body = create_body(description, files, public);
        let response = check("creating gist", self.request("POST", &url).send_json(body))?;
        let created: CreatedGist = response
            .into_json()
            .map_err(|e| Error::Remote(format!("failed to parse create response: {}", e)))?;
        Ok(created.url())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let url = format!("{}/gists/{}", GITHUB_API_BASE, id);
        check("deleting gist", self.request("DELETE", &url).call())?;
        Ok(())
    }

    fn archive(&self, id: &str) -> Result<()> {
        let content = self.content(id)?;
        let filename = format!("{}.tar.gz", id);
        let file = File::create(&filename)?;
        write_archive(file, id, &content)?;
        debug!("action: - wrote {}", filename);
        Ok(())
    }

    fn fork(&self, id: &str) -> Result<GistSummary> {
        let url = format!("{}/gists/{}/forks", GITHUB_API_BASE, id);
        let response = check("forking gist", self.request("POST", &url).call())?;
        response
            .into_json()
            .map_err(|e| Error::Remote(format!("failed to parse fork response: {}", e)))
    }

    fn set_description(&self, id: &str, description: &str) -> Result<()> {
        let url = format!("{}/gists/{}", GITHUB_API_BASE, id);
        let body = serde_json::json!({ "description": description });
        check(
            "updating description",
            self.request("PATCH", &url).send_json(body),
        )?;
        Ok(())
    }

    fn clone(&self, id: &str, directory: Option<&Path>) -> Result<()> {
        let url = format!("{}/{}.git", GIST_GIT_BASE, id);
        debug!("action: - cloning {}", url);
        match directory {
            Some(dir) => {
                let dir = dir.display().to_string();
                git(&["clone", url.as_str(), dir.as_str()], None)
            }
            None => git(&["clone", url.as_str()], None),
        }
    }

    fn edit(&self, id: &str) -> Result<()> {
        let editor = self
            .editor
            .as_deref()
            .ok_or_else(|| Error::Config("unable to find an editor".to_string()))?;

        let workdir = tempfile::tempdir()?;
        let clone_path = workdir.path().join(id);
        let clone_str = clone_path.display().to_string();
        let url = format!("{}/{}.git", GIST_GIT_BASE, id);
        debug!("action: - cloning into {}", clone_str);
        git(&["clone", url.as_str(), clone_str.as_str()], None)?;

        let mut paths = Vec::new();
        for entry in fs::read_dir(&clone_path)? {
            let path = entry?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        if paths.is_empty() {
            return Err(Error::Remote(format!("gist {} has no files to edit", id)));
        }

        let path_refs: Vec<&Path> = paths.iter().map(PathBuf::as_path).collect();
        editor::open(editor, &path_refs)?;

        print!("Commit and push changes? [y/N] ");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !answer.trim().eq_ignore_ascii_case("y") {
            debug!("action: - edit abandoned");
            return Ok(());
        }

        git(&["add", "--all"], Some(&clone_path))?;
        let staged = git_output(&["diff", "--cached", "--quiet"], Some(&clone_path))?;
        if staged.status.success() {
            debug!("action: - no changes to push");
            return Ok(());
        }
        git(&["commit", "-m", "Update gist"], Some(&clone_path))?;
        git(&["push", "origin", "HEAD"], Some(&clone_path))
    }
}

/// Map a ureq response into our error type with some request context.
fn check(
    context: &str,
    response: std::result::Result<ureq::Response, ureq::Error>,
) -> Result<ureq::Response> {
    match response {
        Ok(resp) => Ok(resp),
        Err(ureq::Error::Status(401, _)) => Err(Error::Remote(format!(
            "{}: invalid or expired token (401 Unauthorized)",
            context
        ))),
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            Err(Error::Remote(format!(
                "{}: HTTP {}: {}",
                context,
                code,
                body.trim()
            )))
        }
        Err(e) => Err(Error::Remote(format!("{}: {}", context, e))),
    }
}

/// Pull the rel="next" target out of a Link header, if any.
fn next_page_url(link: Option<&str>) -> Option<String> {
    link?.split(',').find_map(|part| {
        let (url, rel) = part.split_once(';')?;
        if rel.trim() == r#"rel="next""# {
            Some(
                url.trim()
                    .trim_start_matches('<')
                    .trim_end_matches('>')
                    .to_string(),
            )
        } else {
            None
        }
    })
}

/// Request body for POST /gists, files in their acquired order.
fn create_body(description: &str, files: &FileSet, public: bool) -> serde_json::Value {
    let mut file_map = serde_json::Map::new();
    for file in files {
        file_map.insert(
            file.name.clone(),
            serde_json::json!({ "content": file.content }),
        );
    }
    serde_json::json!({
        "description": description,
        "public": public,
        "files": file_map,
    })
}

/// Write the gist files as a gzipped tarball under a `<dir_name>/` prefix.
fn write_archive<W: Write>(writer: W, dir_name: &str, content: &GistContent) -> Result<()> {
    let enc = GzEncoder::new(writer, Compression::default());
    let mut tar = tar::Builder::new(enc);

    for (name, text) in content.iter() {
        let entry_name = format!("{}/{}", dir_name, name);
        let mut header = tar::Header::new_gnu();
        header.set_size(text.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        tar.append_data(&mut header, entry_name, text.as_bytes())?;
    }

    tar.finish()?;
    Ok(())
}

fn git_output(args: &[&str], cwd: Option<&Path>) -> Result<std::process::Output> {
    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd.output()
        .map_err(|e| Error::Remote(format!("failed to run git: {}", e)))
}

fn git(args: &[&str], cwd: Option<&Path>) -> Result<()> {
    let output = git_output(args, cwd)?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::Remote(format!(
            "git {} failed: {}",
            args.first().copied().unwrap_or(""),
            stderr.trim()
        )));
    }
    Ok(())
}
