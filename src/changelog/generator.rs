use std::path::Path;

use chrono::{DateTime, Local, NaiveDate};
use tracing::debug;

use crate::changelog::model::{Changelog, CommitEntry, TagSection};
use crate::changelog::render::{finish, Links, Renderer};
use crate::config::ChangelogConfig;
use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::fs::FileSystem;
use crate::git::{tagged_versions, CommitInfo, Repository};

/// How the changelog file was brought up to date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// Whole history rendered from scratch
    Regenerated,
    /// One section spliced into the existing file
    Added,
}

/// Result of an update; `content` is what was (or in dry-run would be) written
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogUpdate {
    pub mode: UpdateMode,
    pub content: String,
}

/// Builds changelog sections from history and writes the changelog file
pub struct ChangelogGenerator<'a> {
    config: &'a ChangelogConfig,
    repo: &'a dyn Repository,
    fs: &'a dyn FileSystem,
    links: Links,
    today: NaiveDate,
    dry_run: bool,
}

struct OpenSection {
    version: Version,
    date: NaiveDate,
    entries: Vec<CommitEntry>,
}

impl<'a> ChangelogGenerator<'a> {
    pub fn new(
        config: &'a ChangelogConfig,
        repo: &'a dyn Repository,
        fs: &'a dyn FileSystem,
        links: Links,
        dry_run: bool,
    ) -> Self {
        ChangelogGenerator {
            config,
            repo,
            fs,
            links,
            today: Local::now().date_naive(),
            dry_run,
        }
    }

    /// Date stamped on the pending section
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    fn renderer(&self) -> Renderer<'_> {
        Renderer::new(self.config, self.links.clone())
    }

    /// Every release in history, newest first
    ///
    /// With `pending`, commits after the newest tag form a section for that
    /// version; without it they are left out. Commits carrying a release tag
    /// open a section and are not listed themselves.
    pub fn build(&self, pending: Option<&Version>) -> Result<Changelog> {
        let commits = self.repo.commits()?;
        let versions = tagged_versions(&self.repo.tags()?);

        let mut finished: Vec<OpenSection> = Vec::new();
        let mut current = pending.map(|version| OpenSection {
            version: version.clone(),
            date: self.today,
            entries: Vec::new(),
        });
        let mut skipped = 0usize;

        for commit in &commits {
            if let Some(version) = versions.get(&commit.hash) {
                if let Some(open) = current.take() {
                    finished.push(open);
                }
                current = Some(OpenSection {
                    version: version.clone(),
                    date: commit_date(commit).unwrap_or(self.today),
                    entries: Vec::new(),
                });
                continue;
            }

            match current.as_mut() {
                Some(open) => open.entries.push(CommitEntry::from_commit(commit)),
                None => skipped += 1,
            }
        }
        if let Some(open) = current.take() {
            finished.push(open);
        }
        if skipped > 0 {
            debug!(skipped, "commits after the last tag left out");
        }

        // A pending release with nothing in it is not a release
        let empty_pending = match (pending, finished.first()) {
            (Some(version), Some(first)) => first.version == *version && first.entries.is_empty(),
            _ => false,
        };
        if empty_pending {
            finished.remove(0);
        }

        if finished.is_empty() {
            return Err(match pending {
                Some(_) => ReleaseError::NoNewCommits(self.last_tag_label(&commits, &versions)),
                None => ReleaseError::NoReleaseTag,
            });
        }

        let previous: Vec<Option<Version>> = finished
            .iter()
            .skip(1)
            .map(|open| Some(open.version.clone()))
            .chain(std::iter::once(None))
            .collect();

        let sections = finished
            .into_iter()
            .zip(previous)
            .map(|(open, previous)| {
                TagSection::build(open.version, previous, open.date, open.entries, &self.config.types)
            })
            .collect();

        Ok(Changelog { sections })
    }

    /// Section for `pending` holding the commits since the newest tag
    pub fn build_latest(&self, pending: &Version) -> Result<TagSection> {
        let commits = self.repo.commits()?;
        let versions = tagged_versions(&self.repo.tags()?);

        let mut entries = Vec::new();
        let mut previous = None;
        for commit in &commits {
            if let Some(version) = versions.get(&commit.hash) {
                previous = Some(version.clone());
                break;
            }
            entries.push(CommitEntry::from_commit(commit));
        }

        if entries.is_empty() {
            return Err(ReleaseError::NoNewCommits(
                self.last_tag_label(&commits, &versions),
            ));
        }

        Ok(TagSection::build(
            pending.clone(),
            previous,
            self.today,
            entries,
            &self.config.types,
        ))
    }

    /// Render the whole history and replace the file
    pub fn regenerate(&self, pending: Option<&Version>) -> Result<String> {
        let changelog = self.build(pending)?;
        let content = self.renderer().render(&changelog);
        self.write(&content)?;
        Ok(content)
    }

    /// Insert the section for `pending` at the top of the existing file
    ///
    /// A newest section already carrying `pending` is replaced. A missing
    /// file is generated in full instead.
    pub fn add(&self, pending: &Version) -> Result<String> {
        if !self.fs.exists(&self.config.path) {
            debug!(path = %self.config.path.display(), "no changelog yet, generating in full");
            return self.regenerate(Some(pending));
        }

        let existing = self.fs.read_to_string(&self.config.path)?;
        let section = self.build_latest(pending)?;
        let rendered = self.renderer().render_section(&section);

        let content = if existing.trim().is_empty() {
            finish(self.renderer().render_header() + &rendered)
        } else {
            splice(&existing, &rendered, pending)
        };
        self.write(&content)?;
        Ok(content)
    }

    /// Add to an existing file, or generate one when missing
    pub fn update(&self, pending: &Version) -> Result<ChangelogUpdate> {
        let mode = if self.fs.exists(&self.config.path) {
            UpdateMode::Added
        } else {
            UpdateMode::Regenerated
        };
        let content = self.add(pending)?;
        Ok(ChangelogUpdate { mode, content })
    }

    fn write(&self, content: &str) -> Result<()> {
        if self.dry_run {
            debug!(path = %self.config.path.display(), "dry run, changelog not written");
            return Ok(());
        }
        self.fs
            .write(&self.config.path, content.as_bytes())
            .map_err(|e| {
                ReleaseError::changelog(format!(
                    "Failed to write {}: {}",
                    self.config.path.display(),
                    e
                ))
            })
    }

    fn last_tag_label(
        &self,
        commits: &[CommitInfo],
        versions: &std::collections::HashMap<String, Version>,
    ) -> String {
        commits
            .iter()
            .find_map(|c| versions.get(&c.hash))
            .map(|v| v.git_tag_name())
            .unwrap_or_else(|| "the first commit".to_string())
    }
}

fn commit_date(commit: &CommitInfo) -> Option<NaiveDate> {
    DateTime::from_timestamp(commit.timestamp, 0).map(|dt| dt.date_naive())
}

/// Version named in a `## ` heading, linked or not
fn heading_version(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("## ")?.trim_start();
    let rest = rest.strip_prefix('[').unwrap_or(rest);
    rest.split(|c: char| c == ']' || c.is_whitespace()).next()
}

/// Put `section` in front of the first `## ` heading of `existing`
fn splice(existing: &str, section: &str, version: &Version) -> String {
    let mut headings = Vec::new();
    let mut offset = 0;
    for line in existing.split_inclusive('\n') {
        if line.starts_with("## ") {
            headings.push((offset, line));
        }
        offset += line.len();
    }

    let Some(&(start, first)) = headings.first() else {
        return finish(format!("{}\n\n{}", existing.trim_end(), section));
    };

    let end = if heading_version(first) == Some(version.format_string().as_str()) {
        headings.get(1).map(|&(o, _)| o).unwrap_or(existing.len())
    } else {
        start
    };

    finish(format!("{}{}{}", &existing[..start], section, &existing[end..]))
}
