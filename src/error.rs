use thiserror::Error;

/// Unified error type for git-release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Working tree has uncommitted changes")]
    DirtyWorkingTree,

    #[error("Version {next} is lower than the current version {current}")]
    Downgrade { current: String, next: String },

    #[error("Version {0} already exists")]
    VersionExists(String),

    #[error("Bump error: {0}")]
    Bump(String),

    #[error("Changelog error: {0}")]
    Changelog(String),

    #[error("No new commits since {0}")]
    NoNewCommits(String),

    #[error("No release tag found")]
    NoReleaseTag,

    #[error("Hook failed: {0}")]
    Hook(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Results in git-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create an invalid-arguments error with context
    pub fn invalid_args(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidArgs(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a bump error with context
    pub fn bump(msg: impl Into<String>) -> Self {
        ReleaseError::Bump(msg.into())
    }

    /// Create a changelog error with context
    pub fn changelog(msg: impl Into<String>) -> Self {
        ReleaseError::Changelog(msg.into())
    }

    /// Create a hook error with context
    pub fn hook(msg: impl Into<String>) -> Self {
        ReleaseError::Hook(msg.into())
    }

    /// Whether the error is a warning-class condition a caller may continue past
    pub fn is_warning(&self) -> bool {
        matches!(self, ReleaseError::NoNewCommits(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("test config issue");
        assert_eq!(err.to_string(), "Configuration error: test config issue");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReleaseError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_downgrade_message_names_both_versions() {
        let err = ReleaseError::Downgrade {
            current: "2.0.0".to_string(),
            next: "1.9.0".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("1.9.0"));
        assert!(msg.contains("2.0.0"));
    }

    #[test]
    fn test_only_no_new_commits_is_warning() {
        assert!(ReleaseError::NoNewCommits("v1.0.0".to_string()).is_warning());
        assert!(!ReleaseError::NoReleaseTag.is_warning());
        assert!(!ReleaseError::DirtyWorkingTree.is_warning());
        assert!(!ReleaseError::changelog("disk full").is_warning());
        assert!(!ReleaseError::hook("exit 1").is_warning());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::invalid_args("x"), "Invalid arguments"),
            (ReleaseError::version("x"), "Version error"),
            (ReleaseError::tag("x"), "Tag error"),
            (ReleaseError::bump("x"), "Bump error"),
            (ReleaseError::changelog("x"), "Changelog error"),
            (ReleaseError::hook("x"), "Hook failed"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
