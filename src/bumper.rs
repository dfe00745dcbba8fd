//! Rewrites version strings embedded in project files.
//!
//! Package manifests (`package.json` and friends) get their first
//! `"version": "..."` field rewritten. Every other file is scanned line by
//! line and eligible lines get their `major.minor.patch` token replaced.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use crate::config::PolicyConfig;
use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::fs::FileSystem;
use crate::warning::ReleaseWarning;

/// Manifest file names declaring their version once in a `"version"` field
pub const MANIFEST_FILES: [&str; 4] = ["package.json", "composer.json", "bower.json", "manifest.json"];

const VERSION_PATTERN: &str =
    r"\d+\.\d+\.\d+(?:-[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?(?:\+[0-9A-Za-z-]+(?:\.[0-9A-Za-z-]+)*)?";

const MANIFEST_PATTERN: &str = r#"("version"\s*:\s*")([^"]*)(")"#;

/// A file whose version string is rewritten on release
///
/// `start` and `end` are zero-based, inclusive line indexes. Both are
/// ignored for manifest files, as are the regex filters.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BumpTarget {
    pub path: PathBuf,

    /// Lines are only rewritten when one of these matches
    #[serde(default)]
    pub regex: Vec<String>,

    #[serde(default)]
    pub start: Option<usize>,

    #[serde(default)]
    pub end: Option<usize>,
}

impl BumpTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BumpTarget {
            path: path.into(),
            regex: Vec::new(),
            start: None,
            end: None,
        }
    }

    pub fn with_regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex.push(pattern.into());
        self
    }

    pub fn with_range(mut self, start: Option<usize>, end: Option<usize>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Whether the manifest strategy applies to this target
    pub fn is_manifest(&self) -> bool {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| MANIFEST_FILES.contains(&name))
    }

    /// Rejects ranges whose end precedes their start
    pub fn validate(&self) -> Result<()> {
        if self.is_manifest() {
            return Ok(());
        }
        if let (Some(start), Some(end)) = (self.start, self.end) {
            if end < start {
                return Err(ReleaseError::bump(format!(
                    "'{}': range end {} is before start {}",
                    self.path.display(),
                    end,
                    start
                )));
            }
        }
        Ok(())
    }
}

/// New content computed for one target
#[derive(Debug, Clone, PartialEq)]
pub struct BumpResult {
    pub content: String,
    pub changed: bool,
    /// Some eligible version string was found, even if already current
    pub matched: bool,
}

/// Compute the bumped content of a target without touching the disk
pub fn bump_content(target: &BumpTarget, content: &str, version: &Version) -> Result<BumpResult> {
    if version.is_invalid() {
        return Err(ReleaseError::version(format!(
            "Cannot bump to invalid version '{}'",
            version
        )));
    }
    target.validate()?;

    let replacement = version.format_string();
    let (new_content, matched) = if target.is_manifest() {
        bump_manifest(content, &replacement)?
    } else {
        let filters = target
            .regex
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        bump_lines(content, &replacement, &filters, target.start, target.end)?
    };

    Ok(BumpResult {
        changed: new_content != content,
        content: new_content,
        matched,
    })
}

/// Split a line from its terminator so the terminator survives verbatim
fn split_terminator(line: &str) -> (&str, &str) {
    let body_len = line.trim_end_matches(['\n', '\r']).len();
    line.split_at(body_len)
}

fn bump_manifest(content: &str, replacement: &str) -> Result<(String, bool)> {
    let pattern = Regex::new(MANIFEST_PATTERN)?;
    let mut output = String::with_capacity(content.len());
    let mut done = false;

    for line in content.split_inclusive('\n') {
        if !done && pattern.is_match(line) {
            let rewritten = pattern.replacen(line, 1, |caps: &Captures| {
                format!("{}{}{}", &caps[1], replacement, &caps[3])
            });
            output.push_str(&rewritten);
            done = true;
        } else {
            output.push_str(line);
        }
    }

    Ok((output, done))
}

fn bump_lines(
    content: &str,
    replacement: &str,
    filters: &[Regex],
    start: Option<usize>,
    end: Option<usize>,
) -> Result<(String, bool)> {
    let version_pattern = Regex::new(VERSION_PATTERN)?;
    let start = start.unwrap_or(0);
    let mut output = String::with_capacity(content.len());
    let mut matched = false;

    for (index, line) in content.split_inclusive('\n').enumerate() {
        let (body, terminator) = split_terminator(line);
        let in_range = index >= start && end.map_or(true, |end| index <= end);
        let filtered = filters.is_empty() || filters.iter().any(|f| f.is_match(body));

        if in_range && filtered && version_pattern.is_match(body) {
            trace!(line = index, "rewriting version");
            matched = true;
            output.push_str(&version_pattern.replacen(body, 1, regex::NoExpand(replacement)));
            output.push_str(terminator);
        } else {
            output.push_str(line);
        }
    }

    Ok((output, matched))
}

/// What happened to one bump target
#[derive(Debug, Clone, PartialEq)]
pub enum BumpStatus {
    /// New content computed, and written unless dry-run
    Changed,
    /// No version string matched
    Unchanged,
    /// A version string matched and already equals the target version
    AlreadyCurrent,
    /// The file does not exist
    Missing,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetOutcome {
    pub path: PathBuf,
    pub status: BumpStatus,
}

/// Aggregate result of bumping every configured target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BumpReport {
    pub outcomes: Vec<TargetOutcome>,
    pub warnings: Vec<ReleaseWarning>,
}

impl BumpReport {
    /// Whether no target failed outright
    pub fn is_success(&self) -> bool {
        !self
            .outcomes
            .iter()
            .any(|o| matches!(o.status, BumpStatus::Failed(_)))
    }

    pub fn changed_paths(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter(|o| o.status == BumpStatus::Changed)
            .map(|o| o.path.as_path())
            .collect()
    }

    pub fn any_changed(&self) -> bool {
        !self.changed_paths().is_empty()
    }
}

/// Applies [BumpTarget] rules to files through a [FileSystem]
pub struct FileBumper<'a> {
    fs: &'a dyn FileSystem,
    dry_run: bool,
    backup: bool,
}

impl<'a> FileBumper<'a> {
    pub fn new(fs: &'a dyn FileSystem, policy: &PolicyConfig) -> Self {
        FileBumper {
            fs,
            dry_run: policy.dry_run,
            backup: policy.backup,
        }
    }

    /// Bump every target; one failing target never stops the others
    pub fn bump_all(&self, targets: &[BumpTarget], version: &Version) -> BumpReport {
        let mut report = BumpReport::default();

        for target in targets {
            let display = target.path.display().to_string();
            let status = match self.bump_target(target, version, &mut report.warnings) {
                Ok(status) => status,
                Err(e) => BumpStatus::Failed(e.to_string()),
            };

            match &status {
                BumpStatus::Unchanged => {
                    report
                        .warnings
                        .push(ReleaseWarning::NoVersionMatch { path: display })
                }
                BumpStatus::Missing => {
                    report
                        .warnings
                        .push(ReleaseWarning::TargetMissing { path: display })
                }
                BumpStatus::Failed(reason) => report.warnings.push(ReleaseWarning::BumpFailed {
                    path: display,
                    reason: reason.clone(),
                }),
                BumpStatus::AlreadyCurrent => {
                    debug!(path = %target.path.display(), "already at target version")
                }
                BumpStatus::Changed => {}
            }

            report.outcomes.push(TargetOutcome {
                path: target.path.clone(),
                status,
            });
        }

        report
    }

    fn bump_target(
        &self,
        target: &BumpTarget,
        version: &Version,
        warnings: &mut Vec<ReleaseWarning>,
    ) -> Result<BumpStatus> {
        if !self.fs.exists(&target.path) {
            return Ok(BumpStatus::Missing);
        }

        let original = self.fs.read_to_string(&target.path)?;
        let result = bump_content(target, &original, version)?;

        if !result.matched {
            return Ok(BumpStatus::Unchanged);
        }
        if !result.changed {
            return Ok(BumpStatus::AlreadyCurrent);
        }
        if self.dry_run {
            debug!(path = %target.path.display(), "dry run, not writing");
            return Ok(BumpStatus::Changed);
        }

        if self.backup {
            let backup_path = backup_path(&target.path);
            if let Err(e) = self.fs.write(&backup_path, original.as_bytes()) {
                warnings.push(ReleaseWarning::BackupFailed {
                    path: backup_path.display().to_string(),
                    reason: e.to_string(),
                });
            }
        }

        self.fs.write(&target.path, result.content.as_bytes())?;
        debug!(path = %target.path.display(), version = %version, "bumped");
        Ok(BumpStatus::Changed)
    }
}

/// Sibling path with a `.bak` suffix appended
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}
