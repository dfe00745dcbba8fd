//! Release workflow orchestration
//!
//! A release runs in two phases:
//! 1. prepare: validate, check the working tree, resolve the next version,
//!    guard against downgrades, bump files, run the before hooks
//! 2. apply: update the changelog, stage, commit and tag, run the after hooks
//!
//! Policy lives in [Config]; every collaborator is injected by reference.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::bumper::{BumpReport, BumpStatus, FileBumper};
use crate::changelog::{ChangelogGenerator, Links, UpdateMode};
use crate::config::{ChangelogConfig, Config};
use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use crate::fs::FileSystem;
use crate::git::{normalize_remote_url, Repository};
use crate::hooks::{CommandRunner, HookExecutor, HookStage};
use crate::resolver::{Increment, VersionResolver};
use crate::ui::{format_proposed_tag, Reporter};
use crate::warning::ReleaseWarning;

/// Where the pipeline currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseState {
    Idle,
    Validating,
    Resolving,
    Bumping,
    RunningBeforeHooks,
    /// Terminal when only the prepare phase was requested
    Prepared,
    WritingChangelog,
    Committing,
    RunningAfterHooks,
    Done,
    Failed,
}

/// Sequences the release steps and enforces the release policy
pub struct ReleaseOrchestrator<'a> {
    config: &'a Config,
    repo: &'a dyn Repository,
    fs: &'a dyn FileSystem,
    runner: &'a dyn CommandRunner,
    reporter: &'a dyn Reporter,
    state: Cell<ReleaseState>,
    /// Files rewritten by the bump step, staged with the release commit
    bumped: RefCell<Vec<PathBuf>>,
}

impl<'a> ReleaseOrchestrator<'a> {
    pub fn new(
        config: &'a Config,
        repo: &'a dyn Repository,
        fs: &'a dyn FileSystem,
        runner: &'a dyn CommandRunner,
        reporter: &'a dyn Reporter,
    ) -> Self {
        ReleaseOrchestrator {
            config,
            repo,
            fs,
            runner,
            reporter,
            state: Cell::new(ReleaseState::Idle),
            bumped: RefCell::new(Vec::new()),
        }
    }

    pub fn state(&self) -> ReleaseState {
        self.state.get()
    }

    fn enter(&self, state: ReleaseState) {
        debug!(?state, "release state");
        self.state.set(state);
    }

    /// Run `step`, moving to [ReleaseState::Failed] if it errors
    fn guarded<T>(&self, step: impl FnOnce() -> Result<T>) -> Result<T> {
        step().map_err(|e| {
            self.enter(ReleaseState::Failed);
            e
        })
    }

    /// Prepare, then apply unless only preparation was requested
    pub fn run(&self, increment: &Increment) -> Result<Version> {
        let version = self.prepare(increment)?;

        if self.config.policy.prepare_only {
            self.reporter
                .success(&format!("Prepared release {}", version.format_string()));
            return Ok(version);
        }

        self.apply(&version)?;
        let message = if self.config.policy.dry_run {
            format!("Dry run complete, would release {}", version.git_tag_name())
        } else {
            format!("Released {}", version.git_tag_name())
        };
        self.reporter.success(&message);
        Ok(version)
    }

    /// Resolve the next version, bump files and run the before hooks
    pub fn prepare(&self, increment: &Increment) -> Result<Version> {
        self.guarded(|| self.prepare_steps(increment))
    }

    fn prepare_steps(&self, increment: &Increment) -> Result<Version> {
        let policy = &self.config.policy;

        self.enter(ReleaseState::Validating);
        increment.validate()?;
        for target in &self.config.bump.files {
            target.validate()?;
        }

        if !self.repo.is_clean()? {
            if !policy.allow_dirty_commit {
                return Err(ReleaseError::DirtyWorkingTree);
            }
            self.reporter.warning(&ReleaseWarning::DirtyWorkingTree);
        }

        self.enter(ReleaseState::Resolving);
        let resolution = VersionResolver::new(self.repo).resolve(increment)?;
        if resolution.existed {
            if !policy.auto_next_patch_on_conflict {
                return Err(ReleaseError::VersionExists(
                    resolution.requested.format_string(),
                ));
            }
            self.reporter.warning(&ReleaseWarning::VersionExists {
                requested: resolution.requested.format_string(),
                next: resolution.next.format_string(),
            });
        }

        let last = &resolution.last;
        let next = resolution.next;
        if next < *last {
            if !policy.allow_downgrades {
                return Err(ReleaseError::Downgrade {
                    current: last.format_string(),
                    next: next.format_string(),
                });
            }
            self.reporter.warning(&ReleaseWarning::Downgrade {
                current: last.format_string(),
                next: next.format_string(),
            });
        }

        let previous_tag = (*last != Version::zero()).then(|| last.git_tag_name());
        self.reporter.info(&format_proposed_tag(
            previous_tag.as_deref(),
            &next.git_tag_name(),
        ));
        info!(%increment, version = %next, "resolved release version");

        self.enter(ReleaseState::Bumping);
        let report = FileBumper::new(self.fs, policy).bump_all(&self.config.bump.files, &next);
        self.record_bump(&report, &next)?;

        self.enter(ReleaseState::RunningBeforeHooks);
        self.hooks()
            .run_all(HookStage::Before, &self.config.hooks.before, &next)?;

        self.enter(ReleaseState::Prepared);
        Ok(next)
    }

    /// Report the bump outcome; an error when every configured target failed
    fn record_bump(&self, report: &BumpReport, next: &Version) -> Result<()> {
        for warning in &report.warnings {
            self.reporter.warning(warning);
        }

        let total = report.outcomes.len();
        if !report.is_success() {
            let failed = report
                .outcomes
                .iter()
                .filter(|o| matches!(o.status, BumpStatus::Failed(_)))
                .count();
            if failed == total {
                return Err(ReleaseError::bump(format!(
                    "none of the {} bump targets could be updated",
                    total
                )));
            }
            self.reporter
                .warning(&ReleaseWarning::BumpIncomplete { failed, total });
        }

        if total > 0 && !report.any_changed() {
            self.reporter.verbose("No bump target needed a change");
        }
        for path in report.changed_paths() {
            self.reporter
                .verbose(&format!("Bumped {} to {}", path.display(), next));
        }
        *self.bumped.borrow_mut() = report
            .changed_paths()
            .into_iter()
            .map(Path::to_path_buf)
            .collect();
        Ok(())
    }

    /// Write the changelog, commit, tag and run the after hooks
    pub fn apply(&self, version: &Version) -> Result<()> {
        self.guarded(|| self.apply_steps(version))
    }

    fn apply_steps(&self, version: &Version) -> Result<()> {
        let dry_run = self.config.policy.dry_run;

        self.enter(ReleaseState::WritingChangelog);
        let changelog_written = self.write_changelog(version)?;

        self.enter(ReleaseState::Committing);
        if dry_run {
            self.reporter.info(&format!(
                "Dry run: would commit '{}' and tag {}",
                crate::git::release_message(version),
                version.git_tag_name()
            ));
        } else {
            self.stage(changelog_written);
            let commit = self.repo.commit_and_tag(version)?;
            self.reporter.info(&format!(
                "Created tag {} on {}",
                version.git_tag_name(),
                commit.short_hash()
            ));
        }

        self.enter(ReleaseState::RunningAfterHooks);
        self.hooks()
            .run_all(HookStage::After, &self.config.hooks.after, version)?;

        self.enter(ReleaseState::Done);
        Ok(())
    }

    /// Returns whether the changelog file was (or in dry run would be) written
    fn write_changelog(&self, version: &Version) -> Result<bool> {
        let changelog = &self.config.changelog;
        if !changelog.enabled {
            self.reporter.verbose("Changelog generation disabled");
            return Ok(false);
        }

        let generator = ChangelogGenerator::new(
            changelog,
            self.repo,
            self.fs,
            self.links(),
            self.config.policy.dry_run,
        );

        match generator.update(version) {
            Ok(_) if self.config.policy.dry_run => {
                self.reporter
                    .info(&format!("Dry run: {} not written", changelog.path.display()));
                Ok(true)
            }
            Ok(update) => {
                let action = match update.mode {
                    UpdateMode::Regenerated => "Generated",
                    UpdateMode::Added => "Updated",
                };
                self.reporter
                    .info(&format!("{} {}", action, changelog.path.display()));
                Ok(true)
            }
            Err(e) if e.is_warning() => {
                self.reporter.warning(&ReleaseWarning::ChangelogSkipped {
                    reason: e.to_string(),
                });
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Stage bumped files, the changelog and every modified tracked file;
    /// failures only warn
    fn stage(&self, changelog_written: bool) {
        let bumped = self.bumped.borrow();
        let mut paths: Vec<&Path> = bumped.iter().map(PathBuf::as_path).collect();
        if changelog_written {
            paths.push(self.config.changelog.path.as_path());
        }

        let result = if paths.is_empty() {
            Ok(())
        } else {
            self.repo.add_paths(&paths)
        }
        .and_then(|_| self.repo.add_modified());

        if let Err(e) = result {
            self.reporter.warning(&ReleaseWarning::StagingFailed {
                reason: e.to_string(),
            });
        }
    }

    fn links(&self) -> Links {
        discover_links(&self.config.changelog, self.repo, self.reporter)
    }

    /// Regenerate the whole changelog outside of a release
    ///
    /// `pending` names the release for commits after the newest tag.
    pub fn regenerate_changelog(&self, pending: Option<&Version>) -> Result<String> {
        let changelog = &self.config.changelog;
        let generator = ChangelogGenerator::new(
            changelog,
            self.repo,
            self.fs,
            self.links(),
            self.config.policy.dry_run,
        );
        let content = generator.regenerate(pending)?;
        if self.config.policy.dry_run {
            self.reporter
                .info(&format!("Dry run: {} not written", changelog.path.display()));
        } else {
            self.reporter
                .success(&format!("Generated {}", changelog.path.display()));
        }
        Ok(content)
    }

    fn hooks(&self) -> HookExecutor<'_> {
        HookExecutor::new(self.runner, self.reporter, self.config.policy.dry_run)
    }
}

/// Link builder from the configured or discovered remote
///
/// The configured URL wins. Otherwise `origin` is read and normalized; any
/// failure is reported as a warning and links are left out.
pub fn discover_links(
    config: &ChangelogConfig,
    repo: &dyn Repository,
    reporter: &dyn Reporter,
) -> Links {
    let remote = match &config.remote_url {
        Some(url) => Some(url.clone()),
        None => match repo.remote_url() {
            Ok(Some(url)) => {
                let normalized = normalize_remote_url(&url);
                if normalized.is_none() {
                    reporter.warning(&ReleaseWarning::RemoteUnavailable {
                        reason: format!("unrecognised remote URL '{}'", url),
                    });
                }
                normalized
            }
            Ok(None) => None,
            Err(e) => {
                reporter.warning(&ReleaseWarning::RemoteUnavailable {
                    reason: e.to_string(),
                });
                None
            }
        },
    };
    Links::new(remote, config.issue_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bumper::BumpTarget;
    use crate::domain::VersionBump;
    use crate::fs::LocalFileSystem;
    use crate::git::MockRepository;
    use crate::hooks::{HookCommand, RecordingRunner};
    use crate::ui::{Level, MemoryReporter};
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        repo: MockRepository,
        runner: RecordingRunner,
        reporter: MemoryReporter,
    }

    impl Fixture {
        fn new(repo: MockRepository) -> Self {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("package.json"), "{\"version\": \"1.0.0\"}\n").unwrap();
            repo.add_commit("feat: initial");
            repo.add_tagged_commit("chore(release): 1.0.0", "v1.0.0");
            repo.add_commit("feat: search");
            repo.add_commit("fix: crash on empty input");
            Fixture {
                dir,
                repo,
                runner: RecordingRunner::new(),
                reporter: MemoryReporter::new(),
            }
        }

        fn fs(&self) -> LocalFileSystem {
            LocalFileSystem::new(self.dir.path())
        }

        fn read(&self, name: &str) -> String {
            std::fs::read_to_string(self.dir.path().join(name)).unwrap()
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.bump.files = vec![BumpTarget::new("package.json")];
        config.hooks.before = vec![HookCommand::new("npm").with_args(["run", "build"])];
        config.hooks.after = vec![HookCommand::new("git").with_args(["push", "--tags"])];
        config
    }

    fn minor() -> Increment {
        Increment::Bump(VersionBump::Minor)
    }

    #[test]
    fn test_full_release() {
        let fixture = Fixture::new(MockRepository::new());
        let fs = fixture.fs();
        let config = config();
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        let version = orchestrator.run(&minor()).unwrap();

        assert_eq!(version, Version::new(1, 1, 0));
        assert_eq!(orchestrator.state(), ReleaseState::Done);
        assert!(fixture.read("package.json").contains("\"version\": \"1.1.0\""));
        let changelog = fixture.read("CHANGELOG.md");
        assert!(changelog.contains("## 1.1.0 ("));
        assert!(changelog.contains("* search ("));
        assert!(fixture.repo.tag_names().contains(&"v1.1.0".to_string()));
        assert_eq!(
            fixture.repo.staged_paths(),
            vec![PathBuf::from("package.json"), PathBuf::from("CHANGELOG.md")]
        );
        assert!(fixture.repo.modified_staged());

        let calls: Vec<String> = fixture.runner.calls().into_iter().map(|c| c.0).collect();
        assert_eq!(calls, vec!["npm", "git"]);
        assert!(fixture.reporter.warnings().is_empty());
    }

    #[test]
    fn test_dirty_tree_aborts_without_override() {
        let fixture = Fixture::new(MockRepository::new());
        fixture.repo.set_clean(false);
        let fs = fixture.fs();
        let config = config();
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        let err = orchestrator.prepare(&minor()).unwrap_err();

        assert!(matches!(err, ReleaseError::DirtyWorkingTree));
        assert_eq!(orchestrator.state(), ReleaseState::Failed);
        assert!(fixture.read("package.json").contains("1.0.0"));
        assert!(fixture.runner.calls().is_empty());
    }

    #[test]
    fn test_dirty_tree_warns_once_with_override() {
        let fixture = Fixture::new(MockRepository::new());
        fixture.repo.set_clean(false);
        let fs = fixture.fs();
        let mut config = config();
        config.policy.allow_dirty_commit = true;
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        let version = orchestrator.prepare(&minor()).unwrap();

        assert_eq!(version, Version::new(1, 1, 0));
        let expected = ReleaseWarning::DirtyWorkingTree.to_string();
        let dirty: Vec<_> = fixture
            .reporter
            .warnings()
            .into_iter()
            .filter(|w| *w == expected)
            .collect();
        assert_eq!(dirty.len(), 1);
    }

    #[test]
    fn test_existing_version_fails_without_auto_patch() {
        let fixture = Fixture::new(MockRepository::new());
        fixture.repo.add_tag("v1.1.0", "0000000000000000000000000000000000000abc");
        let fs = fixture.fs();
        let config = config();
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        let err = orchestrator.prepare(&minor()).unwrap_err();
        assert!(matches!(err, ReleaseError::VersionExists(ref v) if v == "1.1.0"));
    }

    #[test]
    fn test_existing_version_advances_with_auto_patch() {
        let fixture = Fixture::new(MockRepository::new());
        fixture.repo.add_tag("v1.1.0", "0000000000000000000000000000000000000abc");
        let fs = fixture.fs();
        let mut config = config();
        config.policy.auto_next_patch_on_conflict = true;
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        let version = orchestrator.prepare(&minor()).unwrap();

        assert_eq!(version, Version::new(1, 1, 1));
        assert_eq!(fixture.reporter.warnings().len(), 1);
        assert!(fixture.reporter.warnings()[0].contains("already exists"));
    }

    #[test]
    fn test_downgrade_policy() {
        let fixture = Fixture::new(MockRepository::new());
        let fs = fixture.fs();
        let older = Increment::Custom(Version::parse("0.9.0"));

        let strict = config();
        let orchestrator =
            ReleaseOrchestrator::new(&strict, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);
        let err = orchestrator.prepare(&older).unwrap_err();
        assert!(matches!(err, ReleaseError::Downgrade { .. }));

        let mut lenient = config();
        lenient.policy.allow_downgrades = true;
        let orchestrator =
            ReleaseOrchestrator::new(&lenient, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);
        let version = orchestrator.prepare(&older).unwrap();
        assert_eq!(version, Version::new(0, 9, 0));
        assert!(fixture
            .reporter
            .warnings()
            .iter()
            .any(|w| w.contains("lower than the current version")));
    }

    #[test]
    fn test_dry_run_changes_nothing() {
        let fixture = Fixture::new(MockRepository::new());
        let fs = fixture.fs();
        let mut config = config();
        config.policy.dry_run = true;
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        let version = orchestrator.run(&minor()).unwrap();

        assert_eq!(version, Version::new(1, 1, 0));
        assert!(fixture.read("package.json").contains("1.0.0"));
        assert!(!fixture.dir.path().join("CHANGELOG.md").exists());
        assert!(!fixture.repo.tag_names().contains(&"v1.1.0".to_string()));
        assert!(fixture.runner.calls().is_empty());
        assert!(!fixture.repo.modified_staged());
        let infos = fixture.reporter.messages(Level::Info);
        assert!(infos.contains(&"Dry run: CHANGELOG.md not written".to_string()));
        assert!(!infos.iter().any(|m| m.starts_with("Updated") || m.starts_with("Generated")));
    }

    #[test]
    fn test_all_bump_targets_failing_aborts_before_tagging() {
        let fixture = Fixture::new(MockRepository::new());
        let fs = fixture.fs();
        let mut config = config();
        config.bump.files = vec![BumpTarget::new("package.json").with_regex("(bad")];
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        let err = orchestrator.run(&minor()).unwrap_err();

        assert!(matches!(err, ReleaseError::Bump(_)));
        assert_eq!(orchestrator.state(), ReleaseState::Failed);
        assert!(!fixture.repo.tag_names().contains(&"v1.1.0".to_string()));
        assert!(fixture.runner.calls().is_empty());
        assert!(fixture.read("package.json").contains("1.0.0"));
    }

    #[test]
    fn test_partial_bump_failure_warns_and_stages_bumped_files() {
        let fixture = Fixture::new(MockRepository::new());
        std::fs::write(fixture.dir.path().join("VERSION"), "1.0.0\n").unwrap();
        let fs = fixture.fs();
        let mut config = config();
        config.bump.files = vec![
            BumpTarget::new("package.json"),
            BumpTarget::new("VERSION").with_regex("(bad"),
        ];
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        orchestrator.run(&minor()).unwrap();

        assert_eq!(orchestrator.state(), ReleaseState::Done);
        assert!(fixture.repo.tag_names().contains(&"v1.1.0".to_string()));
        assert!(fixture
            .reporter
            .warnings()
            .contains(&"1 of 2 bump targets failed".to_string()));
        assert_eq!(fixture.read("VERSION"), "1.0.0\n");
        assert!(fixture
            .repo
            .staged_paths()
            .contains(&PathBuf::from("package.json")));
        assert!(!fixture.repo.staged_paths().contains(&PathBuf::from("VERSION")));
    }

    #[test]
    fn test_target_already_at_version_does_not_warn() {
        let fixture = Fixture::new(MockRepository::new());
        std::fs::write(fixture.dir.path().join("package.json"), "{\"version\": \"1.1.0\"}\n").unwrap();
        let fs = fixture.fs();
        let config = config();
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        orchestrator.run(&minor()).unwrap();

        assert!(fixture.reporter.warnings().is_empty());
        assert_eq!(fixture.repo.staged_paths(), vec![PathBuf::from("CHANGELOG.md")]);
    }

    #[test]
    fn test_commit_failure_is_fatal() {
        let fixture = Fixture::new(MockRepository::new().with_failing_commit());
        let fs = fixture.fs();
        let config = config();
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        let err = orchestrator.run(&minor()).unwrap_err();

        assert!(matches!(err, ReleaseError::Git(_)));
        assert_eq!(orchestrator.state(), ReleaseState::Failed);
        let calls: Vec<String> = fixture.runner.calls().into_iter().map(|c| c.0).collect();
        assert_eq!(calls, vec!["npm"]);
    }

    #[test]
    fn test_staging_failure_only_warns() {
        let fixture = Fixture::new(MockRepository::new().with_failing_staging());
        let fs = fixture.fs();
        let config = config();
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        orchestrator.run(&minor()).unwrap();

        assert_eq!(orchestrator.state(), ReleaseState::Done);
        assert!(fixture.repo.tag_names().contains(&"v1.1.0".to_string()));
        assert!(fixture
            .reporter
            .warnings()
            .iter()
            .any(|w| w.starts_with("Cannot stage modified files")));
    }

    #[test]
    fn test_prepare_only_stops_before_apply() {
        let fixture = Fixture::new(MockRepository::new());
        let fs = fixture.fs();
        let mut config = config();
        config.policy.prepare_only = true;
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        orchestrator.run(&minor()).unwrap();

        assert_eq!(orchestrator.state(), ReleaseState::Prepared);
        assert!(fixture.read("package.json").contains("1.1.0"));
        assert!(!fixture.dir.path().join("CHANGELOG.md").exists());
        assert!(!fixture.repo.tag_names().contains(&"v1.1.0".to_string()));
    }

    #[test]
    fn test_no_new_commits_is_a_warning() {
        let repo = MockRepository::new();
        repo.add_commit("feat: initial");
        repo.add_tagged_commit("chore(release): 1.0.0", "v1.0.0");
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("CHANGELOG.md"), "# Changelog\n\n## 1.0.0 (2024-01-01)\n").unwrap();
        let fs = LocalFileSystem::new(dir.path());
        let runner = RecordingRunner::new();
        let reporter = MemoryReporter::new();
        let config = Config::default();
        let orchestrator = ReleaseOrchestrator::new(&config, &repo, &fs, &runner, &reporter);

        orchestrator
            .run(&Increment::Bump(VersionBump::Patch))
            .unwrap();

        assert!(repo.tag_names().contains(&"v1.0.1".to_string()));
        assert!(reporter
            .warnings()
            .iter()
            .any(|w| w.starts_with("No new commits since v1.0.0")));
        assert!(repo.staged_paths().is_empty());
    }

    #[test]
    fn test_disabled_changelog_is_skipped() {
        let fixture = Fixture::new(MockRepository::new());
        let fs = fixture.fs();
        let mut config = config();
        config.changelog.enabled = false;
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        orchestrator.run(&minor()).unwrap();
        assert!(!fixture.dir.path().join("CHANGELOG.md").exists());
    }

    #[test]
    fn test_remote_links_from_origin() {
        let fixture = Fixture::new(MockRepository::new().with_remote_url("git@github.com:o/r.git"));
        let fs = fixture.fs();
        let config = config();
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        orchestrator.run(&minor()).unwrap();
        let changelog = fixture.read("CHANGELOG.md");
        assert!(changelog.contains("## [1.1.0](https://github.com/o/r/compare/v1.0.0...v1.1.0)"));
    }

    #[test]
    fn test_regenerate_changelog_outside_release() {
        let fixture = Fixture::new(MockRepository::new());
        let fs = fixture.fs();
        let config = config();
        let orchestrator =
            ReleaseOrchestrator::new(&config, &fixture.repo, &fs, &fixture.runner, &fixture.reporter);

        let content = orchestrator.regenerate_changelog(None).unwrap();

        assert!(content.contains("## 1.0.0 ("));
        assert!(!content.contains("search"));
        assert_eq!(fixture.read("CHANGELOG.md"), content);
        assert_eq!(orchestrator.state(), ReleaseState::Idle);
    }

    #[test]
    fn test_configured_remote_wins_over_origin() {
        let repo = MockRepository::new().with_remote_url("git@github.com:o/r.git");
        let reporter = MemoryReporter::new();
        let config = ChangelogConfig {
            remote_url: Some("https://git.example.com/team/app".to_string()),
            ..ChangelogConfig::default()
        };

        let links = discover_links(&config, &repo, &reporter);
        assert_eq!(links.remote(), Some("https://git.example.com/team/app"));

        let unknown = MockRepository::new().with_remote_url("/srv/git/app");
        let links = discover_links(&ChangelogConfig::default(), &unknown, &reporter);
        assert_eq!(links.remote(), None);
        assert_eq!(reporter.warnings().len(), 1);
    }
}
