//! Remote gist backend trait and data model.
//!
//! [`GistApi`] is the seam between the command routines and GitHub.
//! The production implementation is [`GitHubRemote`]; tests substitute
//! an in-memory double to exercise command behavior without a network.

mod github;

pub use github::GitHubRemote;

use std::path::Path;

use serde::Deserialize;

use crate::Result;
use crate::fileset::FileSet;

/// One row of the authenticated user's gist listing.
#[derive(Debug, Clone, Deserialize)]
pub struct GistSummary {
    pub id: String,
    pub public: bool,
    pub description: Option<String>,
}

/// Files of a gist, in the order reported by the remote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GistContent {
    entries: Vec<(String, String)>,
}

impl GistContent {
    pub fn push(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.entries.push((name.into(), content.into()));
    }

    /// Content of the named file, if the gist has one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, C: Into<String>> FromIterator<(N, C)> for GistContent {
    fn from_iter<T: IntoIterator<Item = (N, C)>>(iter: T) -> Self {
        let mut content = GistContent::default();
        for (name, text) in iter {
            content.push(name, text);
        }
        content
    }
}

/// Operations the command routines need from a gist host.
pub trait GistApi {
    /// All gists of the authenticated user, newest first.
    fn list(&self) -> Result<Vec<GistSummary>>;

    /// Full metadata of one gist as reported by the remote.
    fn info(&self, id: &str) -> Result<serde_json::Value>;

    /// Name and content of every file in a gist.
    fn content(&self, id: &str) -> Result<GistContent>;

    /// File names of a gist, in remote order.
    fn files(&self, id: &str) -> Result<Vec<String>>;

    /// Create a gist and return its URL.
    fn create(&self, description: &str, files: &FileSet, public: bool) -> Result<String>;

    /// Delete a gist.
    fn delete(&self, id: &str) -> Result<()>;

    /// Download a gist into `<id>.tar.gz` in the working directory.
    fn archive(&self, id: &str) -> Result<()>;

    /// Fork a gist into the authenticated user's account.
    fn fork(&self, id: &str) -> Result<GistSummary>;

    /// Replace the description of a gist.
    fn set_description(&self, id: &str, description: &str) -> Result<()>;

    /// Clone a gist repository into the working directory.
    fn clone(&self, id: &str, directory: Option<&Path>) -> Result<()>;

    /// Clone a gist into a temp directory, open its files in the
    /// editor, and push the result back after confirmation.
    fn edit(&self, id: &str) -> Result<()>;
}
