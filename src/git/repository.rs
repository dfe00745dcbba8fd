use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::git::{release_message, CommitInfo, TagInfo};
use git2::{ErrorCode, IndexAddOption, Repository as Git2Repo, Sort, StatusOptions};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// Root of the working tree
    pub fn workdir(&self) -> Result<PathBuf> {
        self.repo
            .workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| ReleaseError::config("Repository has no working directory"))
    }

    fn relative_to_workdir<'p>(&self, path: &'p Path) -> Result<&'p Path> {
        if path.is_relative() {
            return Ok(path);
        }
        let workdir = self.workdir()?;
        path.strip_prefix(&workdir).map_err(|_| {
            ReleaseError::config(format!(
                "Path '{}' is outside the repository",
                path.display()
            ))
        })
    }

    fn to_commit_info(commit: &git2::Commit<'_>) -> CommitInfo {
        CommitInfo {
            hash: commit.id().to_string(),
            message: commit.message().unwrap_or("(empty message)").to_string(),
            author: commit.author().name().unwrap_or("unknown").to_string(),
            timestamp: commit.time().seconds(),
        }
    }
}

impl super::Repository for Git2Repository {
    fn is_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options.include_untracked(false).include_ignored(false);

        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn tags(&self) -> Result<Vec<TagInfo>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", name))?;
            // Tags pointing at trees or blobs never delimit a release
            if let Ok(commit) = reference.peel_to_commit() {
                tags.push(TagInfo {
                    name: name.to_string(),
                    target: commit.id().to_string(),
                });
            }
        }

        Ok(tags)
    }

    fn commits(&self) -> Result<Vec<CommitInfo>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        match revwalk.push_head() {
            Ok(()) => {}
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(Vec::new())
            }
            Err(e) => return Err(e.into()),
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(Self::to_commit_info(&commit));
        }

        Ok(commits)
    }

    fn tag_exists(&self, name: &str) -> Result<bool> {
        match self.repo.find_reference(&format!("refs/tags/{}", name)) {
            Ok(_) => Ok(true),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(false),
            Err(e) => Err(ReleaseError::tag(format!(
                "Cannot look up tag '{}': {}",
                name, e
            ))),
        }
    }

    fn add_modified(&self) -> Result<()> {
        let mut index = self.repo.index()?;
        index.update_all(["*"], None)?;
        index.write()?;
        Ok(())
    }

    fn add_paths(&self, paths: &[&Path]) -> Result<()> {
        let mut index = self.repo.index()?;
        let relative = paths
            .iter()
            .map(|path| self.relative_to_workdir(path))
            .collect::<Result<Vec<_>>>()?;
        index.add_all(relative, IndexAddOption::DEFAULT, None)?;
        index.write()?;
        Ok(())
    }

    fn commit_and_tag(&self, version: &Version) -> Result<CommitInfo> {
        if version.is_invalid() {
            return Err(ReleaseError::version(format!(
                "Cannot tag invalid version '{}'",
                version
            )));
        }

        let message = release_message(version);
        let signature = self.repo.signature()?;

        let mut index = self.repo.index()?;
        let tree = self.repo.find_tree(index.write_tree()?)?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            &message,
            &tree,
            &parents,
        )?;

        let object = self.repo.find_object(oid, None)?;
        self.repo
            .tag_lightweight(&version.git_tag_name(), &object, false)
            .map_err(|e| ReleaseError::tag(format!("Cannot create tag: {}", e)))?;

        let commit = self.repo.find_commit(oid)?;
        Ok(Self::to_commit_info(&commit))
    }

    fn remote_url(&self) -> Result<Option<String>> {
        match self.repo.find_remote("origin") {
            Ok(remote) => Ok(remote.url().map(str::to_string)),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
