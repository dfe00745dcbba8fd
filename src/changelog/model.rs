//! Document model: tag sections made of typed blocks of commit entries.

use chrono::NaiveDate;

use crate::config::CommitTypeConfig;
use crate::domain::{ParsedCommit, Version};
use crate::git::CommitInfo;

/// One commit as it appears in the changelog
#[derive(Debug, Clone, PartialEq)]
pub struct CommitEntry {
    pub kind: String,
    pub scope: Option<String>,
    pub subject: String,
    /// Body lines without the breaking-change footer
    pub body: Vec<String>,
    pub is_breaking_change: bool,
    pub breaking_note: Option<String>,
    pub hash: String,
    pub author: String,
}

impl CommitEntry {
    pub fn from_commit(commit: &CommitInfo) -> Self {
        let parsed = ParsedCommit::parse(&commit.message);
        let body = parsed
            .body
            .iter()
            .filter(|line| !line.starts_with("BREAKING CHANGE:") && !line.starts_with("BREAKING-CHANGE:"))
            .map(|line| {
                line.strip_prefix("- ")
                    .or_else(|| line.strip_prefix("* "))
                    .unwrap_or(line)
                    .to_string()
            })
            .collect();

        CommitEntry {
            kind: parsed.r#type,
            scope: parsed.scope,
            subject: parsed.description,
            body,
            is_breaking_change: parsed.is_breaking_change,
            breaking_note: parsed.breaking_note,
            hash: commit.hash.clone(),
            author: commit.author.clone(),
        }
    }

    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }
}

/// Entries of one commit type
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseBlock {
    pub kind: String,
    pub title: String,
    pub entries: Vec<CommitEntry>,
}

/// Everything released under one version
#[derive(Debug, Clone, PartialEq)]
pub struct TagSection {
    pub version: Version,
    /// The release before this one, for compare links
    pub previous: Option<Version>,
    pub date: NaiveDate,
    pub breaking_changes: Vec<CommitEntry>,
    /// Non-empty blocks in configured type order
    pub blocks: Vec<ReleaseBlock>,
}

impl TagSection {
    /// Group entries by type; breaking entries are pulled out of their block
    ///
    /// Entries keep the order they are given in. Types missing from `types`
    /// are dropped unless the entry is breaking.
    pub fn build(
        version: Version,
        previous: Option<Version>,
        date: NaiveDate,
        entries: Vec<CommitEntry>,
        types: &[CommitTypeConfig],
    ) -> Self {
        let (breaking_changes, regular): (Vec<_>, Vec<_>) =
            entries.into_iter().partition(|e| e.is_breaking_change);

        let blocks = types
            .iter()
            .map(|type_config| ReleaseBlock {
                kind: type_config.kind.clone(),
                title: type_config.title.clone(),
                entries: regular
                    .iter()
                    .filter(|e| e.kind == type_config.kind)
                    .cloned()
                    .collect(),
            })
            .filter(|block| !block.entries.is_empty())
            .collect();

        TagSection {
            version,
            previous,
            date,
            breaking_changes,
            blocks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.breaking_changes.is_empty() && self.blocks.is_empty()
    }
}

/// Sections newest first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Changelog {
    pub sections: Vec<TagSection>,
}
