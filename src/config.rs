use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::bumper::BumpTarget;
use crate::error::Result;
use crate::hooks::HookCommand;

/// Represents the complete configuration for git-release.
///
/// Built once per invocation and handed by reference to every component.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub policy: PolicyConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub bump: BumpConfig,

    #[serde(default)]
    pub hooks: HooksConfig,
}

/// Switches deciding how strictly the release pipeline behaves.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct PolicyConfig {
    /// Compute and report everything, persist nothing
    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub silent: bool,

    #[serde(default)]
    pub verbose: bool,

    /// Release even when tracked files have local changes
    #[serde(default)]
    pub allow_dirty_commit: bool,

    /// Accept a custom version lower than the current one
    #[serde(default)]
    pub allow_downgrades: bool,

    /// Skip past existing tags by bumping the patch component
    #[serde(default)]
    pub auto_next_patch_on_conflict: bool,

    /// Write a `.bak` copy before a bump target is rewritten
    #[serde(default)]
    pub backup: bool,

    /// Stop after bumping files and running the before hooks
    #[serde(default)]
    pub prepare_only: bool,
}

fn default_true() -> bool {
    true
}

fn default_changelog_path() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

fn default_changelog_title() -> String {
    "Changelog".to_string()
}

/// Returns the default commit types in display order.
fn default_commit_types() -> Vec<CommitTypeConfig> {
    [
        ("feat", "Features"),
        ("fix", "Bug Fixes"),
        ("perf", "Performance Improvements"),
        ("revert", "Reverts"),
        ("refactor", "Code Refactoring"),
        ("docs", "Documentation"),
        ("style", "Styles"),
        ("test", "Tests"),
        ("build", "Build System"),
        ("ci", "Continuous Integration"),
        ("chore", "Chores"),
    ]
    .into_iter()
    .map(|(kind, title)| CommitTypeConfig {
        kind: kind.to_string(),
        title: title.to_string(),
    })
    .collect()
}

/// Changelog generation settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_changelog_path")]
    pub path: PathBuf,

    #[serde(default = "default_changelog_title")]
    pub title: String,

    /// Base URL for `#123` issue links; defaults to `<remote>/issues`
    #[serde(default)]
    pub issue_url: Option<String>,

    /// Browsable repository URL; discovered from `origin` when unset
    #[serde(default)]
    pub remote_url: Option<String>,

    /// Render commit bodies as nested bullets
    #[serde(default = "default_true")]
    pub show_body: bool,

    /// Append the commit author to each entry
    #[serde(default)]
    pub show_author: bool,

    /// Commit types to render, in order
    #[serde(default = "default_commit_types")]
    pub types: Vec<CommitTypeConfig>,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            enabled: true,
            path: default_changelog_path(),
            title: default_changelog_title(),
            issue_url: None,
            remote_url: None,
            show_body: true,
            show_author: false,
            types: default_commit_types(),
        }
    }
}

/// Display name for one commit type.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitTypeConfig {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
}

/// Files whose embedded version is rewritten on release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BumpConfig {
    #[serde(default)]
    pub files: Vec<BumpTarget>,
}

/// External commands run around the release.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HooksConfig {
    /// Run at the end of the prepare phase
    #[serde(default)]
    pub before: Vec<HookCommand>,

    /// Run once the release is tagged
    #[serde(default)]
    pub after: Vec<HookCommand>,
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in current directory
/// 3. `.gitrelease.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitrelease.toml").exists() {
        fs::read_to_string("./gitrelease.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitrelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse a TOML configuration document.
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)?;
    Ok(config)
}
