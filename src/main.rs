//! rcogr - run a command on every git revision in a range
//!
//! Checks each commit of `START..END` out into its own temporary git worktree,
//! runs the given command there and reports which commits passed.
//!
//! ## Features
//!
//! - Isolated checkouts: the primary working copy and index are never touched
//! - Parallel execution bounded by available CPUs, or strictly sequential
//! - Captured or streamed command output
//! - Multiple output formats (Table, JSON, CSV, Summary)
//!
//! ## Usage
//!
//! ```bash
//! # Run the test suite on every commit since v1.2
//! rcogr --start v1.2 "cargo test --quiet"
//!
//! # One commit at a time, oldest first, with live output
//! rcogr -s main~20 --single-threaded --reverse --show-output "make check"
//!
//! # Machine-readable results
//! rcogr -s origin/main -e HEAD --format json "./ci/lint.sh"
//! ```
//!
//! The process exits 0 once results are printed, however many commits
//! failed. Errors that stop the batch (bad range, git failures, checkout
//! cleanup failures) exit non-zero.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

mod cli;
mod config;
mod executor;
mod git;
mod models;
mod output;
#[cfg(test)]
mod testutil;
mod utils;

use cli::Args;
use config::{env::EnvConfig, RunConfig};
use git::RangeResolver;
use models::ResultSet;
use output::ResultFormatter;
use utils::logger::init_logger;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let env = EnvConfig::load();

    init_logger(config::log_level(args.verbose, &env));

    let config = RunConfig::from_sources(args, &env)?;
    let results = run_revisions(&config).await?;

    let mut formatter = ResultFormatter::new(config.format);
    if !config.color {
        formatter = formatter.no_color();
    }
    println!("{}", formatter.format_results(&results));

    Ok(())
}

/// Resolve the range and run the command on every commit in it
async fn run_revisions(config: &RunConfig) -> Result<ResultSet> {
    let commits = RangeResolver::new(config.repo())
        .reverse(config.reverse)
        .resolve(&config.start, &config.end)
        .await
        .with_context(|| format!("Failed to resolve {}..{}", config.start, config.end))?;

    info!(
        "{} commits in {}..{} of {}",
        commits.len(),
        config.start,
        config.end,
        config.repo().display()
    );

    let scheduler =
        executor::scheduler_for(config.strategy, config.checkout.clone(), config.jobs);
    let results = scheduler
        .run(&commits, &config.command, config.capture)
        .await?;

    info!(
        "{} run finished: {}/{} passed",
        scheduler.name(),
        results.passed(),
        results.len()
    );

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Strategy;
    use crate::testutil::{is_empty_dir, scratch_dir, TestRepo};

    fn config_for(repo: &TestRepo, scratch: &std::path::Path, extra: &[&str]) -> RunConfig {
        let repo_path = repo.path().to_str().unwrap().to_string();
        let scratch_path = scratch.to_str().unwrap().to_string();
        let mut argv = vec!["rcogr", "-p", repo_path.as_str(), "--scratch-dir", scratch_path.as_str()];
        argv.extend_from_slice(extra);
        RunConfig::from_sources(Args::parse_from(argv), &EnvConfig::default()).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_pass_fail_pass_scenario() {
        let (repo, root, commits) =
            TestRepo::with_history(&[("status", "0"), ("status", "1"), ("status", "0")]);
        let scratch = scratch_dir();

        for extra in [&[][..], &["--single-threaded"][..]] {
            let mut argv = vec!["-s", root.as_str()];
            argv.extend_from_slice(extra);
            argv.push("sh -c 'exit $(cat status)'");
            let config = config_for(&repo, scratch.path(), &argv);

            let results = run_revisions(&config).await.unwrap();
            assert_eq!(results.len(), 3);
            assert_eq!(results.passed(), 2);

            let failed: Vec<_> = results.iter().filter(|r| !r.success()).collect();
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].commit, commits[1]);
        }

        assert!(is_empty_dir(scratch.path()));
        assert_eq!(repo.worktree_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_start_aborts_before_any_checkout() {
        let (repo, _root, _) = TestRepo::with_history(&[("f", "1")]);
        let scratch = scratch_dir();
        let config = config_for(&repo, scratch.path(), &["-s", "no-such-rev", "true"]);
        assert_eq!(config.strategy, Strategy::Parallel);

        let err = run_revisions(&config).await.unwrap_err();

        assert!(format!("{err:#}").contains("unknown revision: no-such-rev"));
        assert!(is_empty_dir(scratch.path()));
        assert_eq!(repo.worktree_count(), 1);
    }

    #[tokio::test]
    async fn test_not_a_repository_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = scratch_dir();
        let dir_path = dir.path().to_str().unwrap().to_string();
        let scratch_path = scratch.path().to_str().unwrap().to_string();
        let args = Args::parse_from([
            "rcogr",
            "-p",
            dir_path.as_str(),
            "--scratch-dir",
            scratch_path.as_str(),
            "-s",
            "HEAD~1",
            "true",
        ]);
        let config = RunConfig::from_sources(args, &EnvConfig::default()).unwrap();

        let err = run_revisions(&config).await.unwrap_err();
        assert!(format!("{err:#}").contains("not a git repository"));
        assert!(is_empty_dir(scratch.path()));
    }
}
