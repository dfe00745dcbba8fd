use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::git::{release_message, CommitInfo, Repository, TagInfo};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

/// Mock repository for testing without actual git operations
///
/// History is kept newest first, mirroring [Repository::commits].
pub struct MockRepository {
    commits: RefCell<Vec<CommitInfo>>,
    tags: RefCell<Vec<TagInfo>>,
    clean: Cell<bool>,
    remote_url: Option<String>,
    staged: RefCell<Vec<PathBuf>>,
    modified_staged: Cell<bool>,
    fail_staging: bool,
    fail_commit: bool,
}

impl MockRepository {
    /// Create a new empty, clean mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: RefCell::new(Vec::new()),
            tags: RefCell::new(Vec::new()),
            clean: Cell::new(true),
            remote_url: None,
            staged: RefCell::new(Vec::new()),
            modified_staged: Cell::new(false),
            fail_staging: false,
            fail_commit: false,
        }
    }

    /// Add a commit on top of the current HEAD and return its hash
    pub fn add_commit(&self, message: &str) -> String {
        let mut commits = self.commits.borrow_mut();
        let index = commits.len();
        let hash = format!("{:040x}", index + 1);
        commits.insert(
            0,
            CommitInfo {
                hash: hash.clone(),
                message: message.to_string(),
                author: "Test Author".to_string(),
                timestamp: 1_700_000_000 + index as i64 * 86_400,
            },
        );
        hash
    }

    /// Add a tag pointing at a commit hash
    pub fn add_tag(&self, name: impl Into<String>, target: impl Into<String>) {
        self.tags.borrow_mut().push(TagInfo {
            name: name.into(),
            target: target.into(),
        });
    }

    /// Add a commit and tag it in one step
    pub fn add_tagged_commit(&self, message: &str, tag: &str) -> String {
        let hash = self.add_commit(message);
        self.add_tag(tag, hash.clone());
        hash
    }

    pub fn set_clean(&self, clean: bool) {
        self.clean.set(clean);
    }

    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = Some(url.into());
        self
    }

    /// Make every staging call fail
    pub fn with_failing_staging(mut self) -> Self {
        self.fail_staging = true;
        self
    }

    /// Make the release commit fail
    pub fn with_failing_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    /// Paths passed to [Repository::add_paths]
    pub fn staged_paths(&self) -> Vec<PathBuf> {
        self.staged.borrow().clone()
    }

    /// Whether [Repository::add_modified] was called
    pub fn modified_staged(&self) -> bool {
        self.modified_staged.get()
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags.borrow().iter().map(|t| t.name.clone()).collect()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn is_clean(&self) -> Result<bool> {
        Ok(self.clean.get())
    }

    fn tags(&self) -> Result<Vec<TagInfo>> {
        Ok(self.tags.borrow().clone())
    }

    fn commits(&self) -> Result<Vec<CommitInfo>> {
        Ok(self.commits.borrow().clone())
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        Ok(self.tags.borrow().iter().any(|t| t.name == name))
    }

    fn add_modified(&self) -> Result<()> {
        if self.fail_staging {
            return Err(ReleaseError::Git(git2::Error::from_str("index is locked")));
        }
        self.modified_staged.set(true);
        Ok(())
    }

    fn add_paths(&self, paths: &[&Path]) -> Result<()> {
        if self.fail_staging {
            return Err(ReleaseError::Git(git2::Error::from_str("index is locked")));
        }
        self.staged
            .borrow_mut()
            .extend(paths.iter().map(|p| p.to_path_buf()));
        Ok(())
    }

    fn commit_and_tag(&self, version: &Version) -> Result<CommitInfo> {
        if self.fail_commit {
            return Err(ReleaseError::Git(git2::Error::from_str("cannot lock ref HEAD")));
        }
        let name = version.git_tag_name();
        if self.tag_exists(&name)? {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }
        let hash = self.add_tagged_commit(&release_message(version), &name);
        self.clean.set(true);

        let commits = self.commits.borrow();
        commits
            .iter()
            .find(|c| c.hash == hash)
            .cloned()
            .ok_or_else(|| ReleaseError::tag("release commit vanished"))
    }

    fn remote_url(&self) -> Result<Option<String>> {
        Ok(self.remote_url.clone())
    }
}
