use std::fmt;

/// Non-fatal conditions met while releasing.
/// The pipeline reports them to the user and keeps going.
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseWarning {
    /// Working tree has local changes but the policy allows committing them
    DirtyWorkingTree,
    /// The requested version sorts before the current one
    Downgrade { current: String, next: String },
    /// The requested tag existed and the version was advanced past it
    VersionExists { requested: String, next: String },
    /// The changelog was left as is; `reason` is the warning-class error
    ChangelogSkipped { reason: String },
    /// A `.bak` copy could not be written
    BackupFailed { path: String, reason: String },
    /// A bump target could not be processed
    BumpFailed { path: String, reason: String },
    /// Some configured bump targets failed while others were processed
    BumpIncomplete { failed: usize, total: usize },
    /// A bump target never matched a version string
    NoVersionMatch { path: String },
    /// A bump target does not exist
    TargetMissing { path: String },
    /// Staging files after the bump failed
    StagingFailed { reason: String },
    /// A hook command failed without `break_on_error`
    HookFailed { command: String, reason: String },
    /// The remote URL could not be determined; links are omitted
    RemoteUnavailable { reason: String },
}

impl fmt::Display for ReleaseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseWarning::DirtyWorkingTree => {
                write!(f, "Working tree has uncommitted changes, committing anyway")
            }
            ReleaseWarning::Downgrade { current, next } => write!(
                f,
                "Version {} is lower than the current version {}",
                next, current
            ),
            ReleaseWarning::VersionExists { requested, next } => write!(
                f,
                "Version {} already exists, using {} instead",
                requested, next
            ),
            ReleaseWarning::ChangelogSkipped { reason } => {
                write!(f, "{}, changelog left unchanged", reason)
            }
            ReleaseWarning::BackupFailed { path, reason } => {
                write!(f, "Cannot back up '{}': {}", path, reason)
            }
            ReleaseWarning::BumpFailed { path, reason } => {
                write!(f, "Cannot bump '{}': {}", path, reason)
            }
            ReleaseWarning::BumpIncomplete { failed, total } => {
                write!(f, "{} of {} bump targets failed", failed, total)
            }
            ReleaseWarning::NoVersionMatch { path } => {
                write!(f, "No version string found in '{}'", path)
            }
            ReleaseWarning::TargetMissing { path } => {
                write!(f, "Bump target '{}' does not exist", path)
            }
            ReleaseWarning::StagingFailed { reason } => {
                write!(f, "Cannot stage modified files: {}", reason)
            }
            ReleaseWarning::HookFailed { command, reason } => {
                write!(f, "Hook '{}' failed: {}", command, reason)
            }
            ReleaseWarning::RemoteUnavailable { reason } => {
                write!(f, "Remote URL unavailable, rendering plain text: {}", reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists_display() {
        let warning = ReleaseWarning::VersionExists {
            requested: "1.0.1".to_string(),
            next: "1.0.2".to_string(),
        };
        let msg = warning.to_string();
        assert!(msg.contains("1.0.1"), "got: {}", msg);
        assert!(msg.contains("1.0.2"), "got: {}", msg);
    }

    #[test]
    fn test_hook_failed_display() {
        let warning = ReleaseWarning::HookFailed {
            command: "npm publish".to_string(),
            reason: "exit status 1".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "Hook 'npm publish' failed: exit status 1"
        );
    }

    #[test]
    fn test_all_warnings_render() {
        let warnings = vec![
            ReleaseWarning::DirtyWorkingTree,
            ReleaseWarning::Downgrade {
                current: "2.0.0".to_string(),
                next: "1.0.0".to_string(),
            },
            ReleaseWarning::ChangelogSkipped {
                reason: "No new commits since v1.0.0".to_string(),
            },
            ReleaseWarning::BumpIncomplete {
                failed: 1,
                total: 3,
            },
            ReleaseWarning::BackupFailed {
                path: "a".to_string(),
                reason: "b".to_string(),
            },
            ReleaseWarning::NoVersionMatch {
                path: "README.md".to_string(),
            },
            ReleaseWarning::TargetMissing {
                path: "VERSION".to_string(),
            },
            ReleaseWarning::StagingFailed {
                reason: "locked".to_string(),
            },
        ];

        for warning in warnings {
            assert!(!warning.to_string().is_empty());
        }
    }
}
