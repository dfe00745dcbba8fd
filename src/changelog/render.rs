//! Markdown rendering of the changelog model.

use regex::{Captures, Regex};
use std::fmt::Write;

use crate::changelog::model::{Changelog, CommitEntry, TagSection};
use crate::config::ChangelogConfig;
use crate::domain::Version;

const BOILERPLATE: &str = "All notable changes to this project will be documented in this file. \
See [Conventional Commits](https://conventionalcommits.org) for commit guidelines.";

/// URL builders for commits, compares and issues
///
/// Without a remote URL every builder returns `None` and plain text is rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Links {
    remote: Option<String>,
    issue_url: Option<String>,
}

impl Links {
    pub fn new(remote: Option<String>, issue_url: Option<String>) -> Self {
        Links {
            remote: remote.map(|r| r.trim_end_matches('/').to_string()),
            issue_url: issue_url.map(|i| i.trim_end_matches('/').to_string()),
        }
    }

    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    pub fn commit(&self, hash: &str) -> Option<String> {
        self.remote
            .as_ref()
            .map(|remote| format!("{}/commit/{}", remote, hash))
    }

    pub fn compare(&self, previous: &Version, current: &Version) -> Option<String> {
        self.remote.as_ref().map(|remote| {
            format!(
                "{}/compare/{}...{}",
                remote,
                previous.git_tag_name(),
                current.git_tag_name()
            )
        })
    }

    pub fn issue(&self, number: &str) -> Option<String> {
        match (&self.issue_url, &self.remote) {
            (Some(base), _) => Some(format!("{}/{}", base, number)),
            (None, Some(remote)) => Some(format!("{}/issues/{}", remote, number)),
            (None, None) => None,
        }
    }
}

/// Renders sections and whole documents
pub struct Renderer<'a> {
    config: &'a ChangelogConfig,
    links: Links,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a ChangelogConfig, links: Links) -> Self {
        Renderer { config, links }
    }

    /// Title line and boilerplate paragraph
    pub fn render_header(&self) -> String {
        format!("# {}\n\n{}\n\n", self.config.title, BOILERPLATE)
    }

    /// Full document, newest section first
    pub fn render(&self, changelog: &Changelog) -> String {
        let mut output = self.render_header();
        for section in &changelog.sections {
            output.push_str(&self.render_section(section));
        }
        finish(output)
    }

    /// One `##` section, followed by a blank line
    pub fn render_section(&self, section: &TagSection) -> String {
        let mut output = String::new();
        let version = section.version.format_string();
        let date = section.date.format("%Y-%m-%d");

        let compare = section
            .previous
            .as_ref()
            .and_then(|previous| self.links.compare(previous, &section.version));
        let _ = match compare {
            Some(url) => writeln!(output, "## [{}]({}) ({})\n", version, url, date),
            None => writeln!(output, "## {} ({})\n", version, date),
        };

        if !section.breaking_changes.is_empty() {
            output.push_str("### Breaking changes\n\n");
            for entry in &section.breaking_changes {
                self.render_entry(&mut output, entry);
                if let Some(note) = &entry.breaking_note {
                    let _ = writeln!(output, "  * {}", self.link_issues(note));
                }
            }
            output.push('\n');
        }

        for block in &section.blocks {
            let _ = writeln!(output, "### {}\n", block.title);
            for entry in &block.entries {
                self.render_entry(&mut output, entry);
            }
            output.push('\n');
        }

        output
    }

    fn render_entry(&self, output: &mut String, entry: &CommitEntry) {
        output.push_str("* ");
        if let Some(scope) = &entry.scope {
            let _ = write!(output, "**{}:** ", scope);
        }
        output.push_str(&self.link_issues(&entry.subject));

        let _ = match self.links.commit(&entry.hash) {
            Some(url) => write!(output, " ([{}]({}))", entry.short_hash(), url),
            None => write!(output, " ({})", entry.short_hash()),
        };
        if self.config.show_author {
            let _ = write!(output, " by {}", entry.author);
        }
        output.push('\n');

        if self.config.show_body {
            for line in &entry.body {
                let _ = writeln!(output, "  * {}", self.link_issues(line));
            }
        }
    }

    /// Rewrite `#123` references into issue links when a URL is known
    fn link_issues(&self, text: &str) -> String {
        if self.links.issue("0").is_none() {
            return text.to_string();
        }
        let Ok(pattern) = Regex::new(r"(^|[\s(,;])#(\d+)\b") else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &Captures| {
                let number = &caps[2];
                match self.links.issue(number) {
                    Some(url) => format!("{}[#{}]({})", &caps[1], number, url),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// Normalize a document to end with exactly one newline
pub fn finish(document: String) -> String {
    let mut trimmed = document.trim_end().to_string();
    trimmed.push('\n');
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::CommitInfo;
    use chrono::NaiveDate;

    fn entry(hash: &str, message: &str) -> CommitEntry {
        CommitEntry::from_commit(&CommitInfo {
            hash: hash.to_string(),
            message: message.to_string(),
            author: "Ada".to_string(),
            timestamp: 0,
        })
    }

    fn section(entries: Vec<CommitEntry>, config: &ChangelogConfig) -> TagSection {
        TagSection::build(
            Version::new(1, 1, 0),
            Some(Version::new(1, 0, 0)),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            entries,
            &config.types,
        )
    }

    #[test]
    fn test_plain_section_without_remote() {
        let config = ChangelogConfig::default();
        let renderer = Renderer::new(&config, Links::default());
        let rendered = renderer.render_section(&section(
            vec![
                entry("aaaaaaa111", "feat(cli): add flag for #12"),
                entry("bbbbbbb222", "fix: crash\n\n- on empty input"),
            ],
            &config,
        ));

        assert_eq!(
            rendered,
            "## 1.1.0 (2024-05-01)\n\n\
             ### Features\n\n\
             * **cli:** add flag for #12 (aaaaaaa)\n\n\
             ### Bug Fixes\n\n\
             * crash (bbbbbbb)\n  * on empty input\n\n"
        );
    }

    #[test]
    fn test_linked_section_with_breaking_changes() {
        let config = ChangelogConfig {
            show_author: true,
            ..ChangelogConfig::default()
        };
        let links = Links::new(Some("https://github.com/o/r/".to_string()), None);
        let renderer = Renderer::new(&config, links);
        let rendered = renderer.render_section(&section(
            vec![entry("ccccccc333", "feat(api)!: change shape (#7)\n\nBREAKING CHANGE: x")],
            &config,
        ));

        assert_eq!(
            rendered,
            "## [1.1.0](https://github.com/o/r/compare/v1.0.0...v1.1.0) (2024-05-01)\n\n\
             ### Breaking changes\n\n\
             * **api:** change shape ([#7](https://github.com/o/r/issues/7)) \
             ([ccccccc](https://github.com/o/r/commit/ccccccc333)) by Ada\n  * x\n\n"
        );
        assert!(!rendered.contains("### Features"));
    }

    #[test]
    fn test_hidden_body() {
        let config = ChangelogConfig {
            show_body: false,
            ..ChangelogConfig::default()
        };
        let renderer = Renderer::new(&config, Links::default());
        let rendered =
            renderer.render_section(&section(vec![entry("d", "fix: a\n\ndetails")], &config));
        assert!(!rendered.contains("details"));
    }

    #[test]
    fn test_issue_url_overrides_remote() {
        let links = Links::new(
            Some("https://github.com/o/r".to_string()),
            Some("https://tracker.example.com/browse".to_string()),
        );
        assert_eq!(
            links.issue("42").as_deref(),
            Some("https://tracker.example.com/browse/42")
        );
        assert_eq!(Links::default().commit("abc"), None);
    }

    #[test]
    fn test_document_has_header_and_single_trailing_newline() {
        let config = ChangelogConfig::default();
        let renderer = Renderer::new(&config, Links::default());
        let document = renderer.render(&Changelog {
            sections: vec![section(vec![entry("e", "feat: one")], &config)],
        });
        assert!(document.starts_with("# Changelog\n\nAll notable changes"));
        assert!(document.contains("\n\n## 1.1.0 (2024-05-01)\n"));
        assert!(document.ends_with("* one (e)\n"));
    }
}
