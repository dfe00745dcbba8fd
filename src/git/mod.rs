//! Git operations abstraction layer
//!
//! The release pipeline only talks to git through the [Repository] trait.
//! The concrete implementations are:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! ```rust
//! # use git_release::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> git_release::Result<()> {
//! if !repo.is_clean()? {
//!     println!("working tree has local changes");
//! }
//! for commit in repo.commits()? {
//!     println!("{} {}", commit.short_hash(), commit.subject());
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::Version;
use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;

/// Commit information read from history
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The full commit message
    pub message: String,
    /// The commit author name
    pub author: String,
    /// Commit time in seconds since the Unix epoch
    pub timestamp: i64,
}

impl CommitInfo {
    /// First seven characters of the hash
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }

    /// First line of the message
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// A tag and the commit it points to
#[derive(Debug, Clone, PartialEq)]
pub struct TagInfo {
    pub name: String,
    /// Hash of the commit the tag peels to
    pub target: String,
}

impl TagInfo {
    /// Version carried by the tag name, possibly invalid
    pub fn version(&self) -> Version {
        Version::parse(&self.name)
    }
}

/// Common git operation trait for abstraction
///
/// The release pipeline is single-threaded, so implementors are not required
/// to be `Send` or `Sync`.
pub trait Repository {
    /// Whether the working tree has no staged or unstaged changes to tracked files
    fn is_clean(&self) -> Result<bool>;

    /// All tags in the repository
    fn tags(&self) -> Result<Vec<TagInfo>>;

    /// Commits reachable from HEAD, newest first
    fn commits(&self) -> Result<Vec<CommitInfo>>;

    /// Whether a tag with this exact name exists
    fn tag_exists(&self, name: &str) -> Result<bool>;

    /// Stage modifications of already tracked files
    fn add_modified(&self) -> Result<()>;

    /// Stage specific paths, tracked or not
    fn add_paths(&self, paths: &[&Path]) -> Result<()>;

    /// Commit the index as `chore(release): <version>` and tag it `v<version>`
    fn commit_and_tag(&self, version: &Version) -> Result<CommitInfo>;

    /// URL of the `origin` remote, if any
    fn remote_url(&self) -> Result<Option<String>>;
}

/// Release commit message for a version
pub fn release_message(version: &Version) -> String {
    format!("chore(release): {}", version.format_string())
}

/// Map commit hashes to the highest valid version tagged on them
pub fn tagged_versions(tags: &[TagInfo]) -> HashMap<String, Version> {
    let mut versions: HashMap<String, Version> = HashMap::new();

    for tag in tags {
        let version = tag.version();
        if version.is_invalid() {
            continue;
        }
        match versions.get(&tag.target) {
            Some(existing) if *existing >= version => {}
            _ => {
                versions.insert(tag.target.clone(), version);
            }
        }
    }

    versions
}

/// Normalize a remote URL into a browsable `https://host/owner/repo` form
///
/// Returns `None` when the URL is not recognised as a hosted repository.
pub fn normalize_remote_url(url: &str) -> Option<String> {
    let url = url.trim();
    let url = url.strip_suffix(".git").unwrap_or(url);
    let url = url.trim_end_matches('/');

    if let Some(rest) = url.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        return Some(format!("https://{}/{}", host, path));
    }

    if let Some(rest) = url.strip_prefix("ssh://") {
        let rest = rest.split_once('@').map_or(rest, |(_, r)| r);
        let (host, path) = rest.split_once('/')?;
        let host = host.split(':').next().unwrap_or(host);
        return Some(format!("https://{}/{}", host, path));
    }

    for scheme in ["https://", "http://"] {
        if let Some(rest) = url.strip_prefix(scheme) {
            let rest = rest.split_once('@').map_or(rest, |(_, r)| r);
            return Some(format!("{}{}", scheme, rest));
        }
    }

    None
}
