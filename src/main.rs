use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use git_release::config::{self, Config};
use git_release::domain::Version;
use git_release::fs::LocalFileSystem;
use git_release::git::Git2Repository;
use git_release::hooks::ProcessRunner;
use git_release::orchestrator::ReleaseOrchestrator;
use git_release::resolver::{Increment, VersionResolver};
use git_release::ui::{ConsoleReporter, Reporter};

#[derive(Parser)]
#[command(
    name = "git-release",
    version,
    about = "Bump versions, write the changelog and tag releases from conventional commits"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(short, long, global = true, help = "Show detailed progress")]
    verbose: bool,

    #[arg(short, long, global = true, help = "Only print warnings and errors")]
    silent: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Bump, write the changelog, commit and tag
    Release {
        #[arg(help = "major, minor, patch or an explicit version")]
        increment: String,

        #[arg(long, help = "Stop after bumping files and running the before hooks")]
        prepare_only: bool,

        #[arg(long, help = "Release even with uncommitted changes")]
        allow_dirty: bool,

        #[arg(long, help = "Accept a version lower than the current one")]
        allow_downgrade: bool,

        #[arg(long, help = "Advance the patch version past existing tags")]
        auto_patch: bool,

        #[arg(long, help = "Write .bak copies of bumped files")]
        backup: bool,

        #[arg(long, help = "Do not touch the changelog")]
        no_changelog: bool,
    },
    /// Regenerate the whole changelog
    Changelog {
        #[arg(long, help = "Version for commits after the newest tag")]
        next: Option<String>,
    },
    /// Print the version the next release would get
    Next {
        #[arg(help = "major, minor, patch or an explicit version")]
        increment: String,
    },
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ConsoleReporter::default().error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

fn run(args: Args) -> Result<()> {
    let mut config =
        config::load_config(args.config.as_deref()).context("Error loading config")?;
    apply_global_flags(&mut config, &args);
    let reporter = ConsoleReporter::new(config.policy.silent, config.policy.verbose);

    let repo = Git2Repository::open(".").context("Git repository error")?;
    let fs = LocalFileSystem::new(repo.workdir().context("Repository has no working directory")?);
    let runner = ProcessRunner;

    match args.command {
        Command::Release {
            increment,
            prepare_only,
            allow_dirty,
            allow_downgrade,
            auto_patch,
            backup,
            no_changelog,
        } => {
            let policy = &mut config.policy;
            policy.prepare_only |= prepare_only;
            policy.allow_dirty_commit |= allow_dirty;
            policy.allow_downgrades |= allow_downgrade;
            policy.auto_next_patch_on_conflict |= auto_patch;
            policy.backup |= backup;
            if no_changelog {
                config.changelog.enabled = false;
            }

            let orchestrator = ReleaseOrchestrator::new(&config, &repo, &fs, &runner, &reporter);
            orchestrator.run(&Increment::parse(&increment))?;
        }
        Command::Changelog { next } => {
            let pending = match next {
                Some(raw) => {
                    let version = Version::parse(&raw);
                    if version.is_invalid() {
                        anyhow::bail!("'{}' is not a valid semantic version", raw);
                    }
                    Some(version)
                }
                None => None,
            };
            let orchestrator = ReleaseOrchestrator::new(&config, &repo, &fs, &runner, &reporter);
            orchestrator.regenerate_changelog(pending.as_ref())?;
        }
        Command::Next { increment } => {
            let resolution = VersionResolver::new(&repo).resolve(&Increment::parse(&increment))?;
            println!("{}", resolution.next.format_string());
        }
    }

    Ok(())
}

fn apply_global_flags(config: &mut Config, args: &Args) {
    config.policy.dry_run |= args.dry_run;
    config.policy.verbose |= args.verbose;
    config.policy.silent |= args.silent;
}
