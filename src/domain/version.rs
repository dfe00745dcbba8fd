use std::cmp::Ordering;
use std::fmt;

/// Semantic version as read from a flag, a tag name or file content.
///
/// Parsing never fails: input that does not match the semver grammar yields an
/// invalid version that keeps its raw text. Every operation on an invalid
/// version is a no-op (increments) or renders empty (formatting).
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    parsed: Option<semver::Version>,
}

impl Version {
    /// Create a valid version from its numeric components
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self::from_semver(semver::Version::new(major, minor, patch))
    }

    /// The `0.0.0` version used when no release tag exists yet
    pub fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Parse a version, accepting an optional leading `v` or `V`
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let candidate = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        match semver::Version::parse(candidate) {
            Ok(parsed) => Self::from_semver(parsed),
            Err(_) => Version {
                raw: trimmed.to_string(),
                parsed: None,
            },
        }
    }

    fn from_semver(parsed: semver::Version) -> Self {
        Version {
            raw: parsed.to_string(),
            parsed: Some(parsed),
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.parsed.is_none()
    }

    pub fn major(&self) -> Option<u64> {
        self.parsed.as_ref().map(|v| v.major)
    }

    pub fn minor(&self) -> Option<u64> {
        self.parsed.as_ref().map(|v| v.minor)
    }

    pub fn patch(&self) -> Option<u64> {
        self.parsed.as_ref().map(|v| v.patch)
    }

    pub fn prerelease(&self) -> Option<&str> {
        self.parsed
            .as_ref()
            .map(|v| v.pre.as_str())
            .filter(|pre| !pre.is_empty())
    }

    /// Compare by semver precedence; build metadata is ignored.
    pub fn compare(&self, other: &Version) -> Ordering {
        match (&self.parsed, &other.parsed) {
            (Some(a), Some(b)) => (a.major, a.minor, a.patch, &a.pre)
                .cmp(&(b.major, b.minor, b.patch, &b.pre)),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }

    pub fn next_major(&self) -> Self {
        self.increment(|v| Some(semver::Version::new(v.major.checked_add(1)?, 0, 0)))
    }

    pub fn next_minor(&self) -> Self {
        self.increment(|v| Some(semver::Version::new(v.major, v.minor.checked_add(1)?, 0)))
    }

    pub fn next_patch(&self) -> Self {
        self.increment(|v| Some(semver::Version::new(v.major, v.minor, v.patch.checked_add(1)?)))
    }

    /// Apply an increment kind; custom increments leave the version as is
    pub fn bump(&self, bump: VersionBump) -> Self {
        match bump {
            VersionBump::Major => self.next_major(),
            VersionBump::Minor => self.next_minor(),
            VersionBump::Patch => self.next_patch(),
        }
    }

    /// A component past `u64::MAX` yields an invalid version keeping the raw text
    fn increment(&self, step: impl FnOnce(&semver::Version) -> Option<semver::Version>) -> Self {
        match self.parsed.as_ref().and_then(step) {
            Some(next) => Self::from_semver(next),
            None => Version {
                raw: self.raw.clone(),
                parsed: None,
            },
        }
    }

    /// Canonical `major.minor.patch[-pre][+build]`, empty for invalid input
    pub fn format_string(&self) -> String {
        self.parsed
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// Tag name for this version (`v1.2.3`), empty for invalid input
    pub fn git_tag_name(&self) -> String {
        if self.is_invalid() {
            return String::new();
        }
        format!("v{}", self.format_string())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parsed {
            Some(parsed) => write!(f, "{}", parsed),
            None => write!(f, "{}", self.raw),
        }
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}
