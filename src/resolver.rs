//! Next-version resolution against the repository's tags.

use std::fmt;
use tracing::debug;

use crate::domain::{Version, VersionBump};
use crate::error::{ReleaseError, Result};
use crate::git::{tagged_versions, Repository, TagInfo};

/// How the next version is derived from the last release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Increment {
    Bump(VersionBump),
    /// Use this version verbatim
    Custom(Version),
}

impl Increment {
    /// Parse `major`, `minor`, `patch` or an explicit version
    pub fn parse(arg: &str) -> Self {
        match arg.trim().to_lowercase().as_str() {
            "major" => Increment::Bump(VersionBump::Major),
            "minor" => Increment::Bump(VersionBump::Minor),
            "patch" => Increment::Bump(VersionBump::Patch),
            _ => Increment::Custom(Version::parse(arg)),
        }
    }

    /// Rejects custom versions that are not valid semver
    pub fn validate(&self) -> Result<()> {
        match self {
            Increment::Custom(version) if version.is_invalid() => Err(ReleaseError::invalid_args(
                format!("'{}' is not a valid semantic version", version),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Increment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Increment::Bump(VersionBump::Major) => write!(f, "major"),
            Increment::Bump(VersionBump::Minor) => write!(f, "minor"),
            Increment::Bump(VersionBump::Patch) => write!(f, "patch"),
            Increment::Custom(version) => write!(f, "{}", version),
        }
    }
}

/// Outcome of a resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Most recent release, `0.0.0` when none exists
    pub last: Version,
    /// Version requested before collision handling
    pub requested: Version,
    /// First version whose tag does not exist yet
    pub next: Version,
    /// Whether `requested` was already tagged and `next` was advanced past it
    pub existed: bool,
}

/// Computes the next non-colliding version
pub struct VersionResolver<'a> {
    repo: &'a dyn Repository,
}

impl<'a> VersionResolver<'a> {
    pub fn new(repo: &'a dyn Repository) -> Self {
        VersionResolver { repo }
    }

    /// Nearest valid release tag walking back from HEAD, or `0.0.0`
    pub fn last_version(&self) -> Result<Version> {
        let versions = tagged_versions(&self.repo.tags()?);
        if versions.is_empty() {
            return Ok(Version::zero());
        }

        let last = self
            .repo
            .commits()?
            .iter()
            .find_map(|commit| versions.get(&commit.hash).cloned())
            .unwrap_or_else(Version::zero);

        debug!(%last, "last released version");
        Ok(last)
    }

    pub fn resolve(&self, increment: &Increment) -> Result<Resolution> {
        increment.validate()?;
        let last = self.last_version()?;
        self.resolve_from(last, increment)
    }

    /// Resolve against an explicit base version
    ///
    /// A candidate is taken when its `v` tag exists or any tag, prefixed or
    /// not, names an equal version. Each taken candidate advances by one
    /// patch. The tag set is finite and every step strictly increases the
    /// candidate, so the loop ends, but a history with many consecutive patch
    /// tags is walked in full.
    pub fn resolve_from(&self, last: Version, increment: &Increment) -> Result<Resolution> {
        increment.validate()?;

        let requested = match increment {
            Increment::Bump(bump) => last.bump(*bump),
            Increment::Custom(version) => version.clone(),
        };
        if requested.is_invalid() {
            return Err(ReleaseError::version(format!(
                "Cannot derive a version from '{}'",
                last
            )));
        }

        let taken: Vec<Version> = self
            .repo
            .tags()?
            .iter()
            .map(TagInfo::version)
            .filter(|v| !v.is_invalid())
            .collect();

        let mut next = requested.clone();
        let mut existed = false;
        while taken.contains(&next) || self.repo.tag_exists(&next.git_tag_name())? {
            debug!(version = %next, "version already tagged, advancing patch");
            existed = true;
            next = next.next_patch();
            if next.is_invalid() {
                return Err(ReleaseError::version(format!(
                    "No free patch version after '{}'",
                    requested
                )));
            }
        }

        Ok(Resolution {
            last,
            requested,
            next,
            existed,
        })
    }
}
