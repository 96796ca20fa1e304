//! Parallel execution
//!
//! Runs commits concurrently on a bounded pool of tasks and collects the
//! results as they complete.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::num::NonZeroUsize;
use std::panic;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use super::{run_commit, CaptureMode, CommandLine, CommandRunner, Scheduler};
use crate::git::CheckoutConfig;
use crate::models::{Commit, ResultOrder, ResultSet};

/// Parallel scheduler
///
/// Every commit gets its own task, but at most `max_concurrent` of them hold
/// a checkout at any time. Results come back in completion order.
///
/// On the first fatal error the pool is closed: runs already in progress
/// finish, runs not yet started are skipped, and the error is returned once
/// everything has settled.
pub struct ParallelScheduler {
    checkout: CheckoutConfig,
    max_concurrent: usize,
}

impl ParallelScheduler {
    pub fn new(checkout: CheckoutConfig, max_concurrent: usize) -> Self {
        Self {
            checkout,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Pool size used when none is configured: one per hardware thread
    pub fn default_concurrency() -> usize {
        std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
    }
}

#[async_trait]
impl Scheduler for ParallelScheduler {
    async fn run(
        &self,
        commits: &[Commit],
        command: &CommandLine,
        mode: CaptureMode,
    ) -> Result<ResultSet> {
        info!(
            "Running `{}` on {} commits in parallel (max {} concurrent)",
            command,
            commits.len(),
            self.max_concurrent
        );

        let started_at = Utc::now();
        let pool = Arc::new(Semaphore::new(self.max_concurrent));
        let runner = Arc::new(CommandRunner::new(command.clone()));

        let mut pending = FuturesUnordered::new();
        for commit in commits {
            let pool = pool.clone();
            let runner = runner.clone();
            let checkout = self.checkout.clone();
            let commit = commit.clone();

            pending.push(tokio::spawn(async move {
                // A closed pool means another run hit a fatal error
                let Ok(_permit) = pool.acquire().await else {
                    debug!("Skipping {} after fatal error", commit.short());
                    return Ok(None);
                };

                let result = run_commit(&checkout, &commit, &runner, mode).await;
                if result.is_err() {
                    pool.close();
                }
                result.map(Some)
            }));
        }

        let mut results = Vec::with_capacity(commits.len());
        let mut fatal = None;
        let mut panicked = None;

        while let Some(joined) = pending.next().await {
            match joined {
                Ok(Ok(Some(result))) => {
                    info!("  {}", result);
                    results.push(result);
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => {
                    error!("Aborting batch: {:#}", e);
                    fatal.get_or_insert(e);
                }
                Err(join_error) => {
                    pool.close();
                    if join_error.is_panic() {
                        panicked.get_or_insert(join_error.into_panic());
                    } else {
                        fatal.get_or_insert(anyhow!("Run task failed: {join_error}"));
                    }
                }
            }
        }

        if let Some(payload) = panicked {
            panic::resume_unwind(payload);
        }
        if let Some(e) = fatal {
            return Err(e);
        }

        Ok(ResultSet::new(ResultOrder::Completion, started_at, results))
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::testutil::{is_empty_dir, scratch_dir, TestRepo};

    #[test]
    fn test_parallel_scheduler_creation() {
        let scheduler = ParallelScheduler::new(CheckoutConfig::new("."), 8);
        assert_eq!(scheduler.max_concurrent, 8);

        let clamped = ParallelScheduler::new(CheckoutConfig::new("."), 0);
        assert_eq!(clamped.max_concurrent, 1);

        assert!(ParallelScheduler::default_concurrency() >= 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_results_arrive_in_completion_order() {
        // The first commit sleeps, the second finishes immediately
        let (repo, _root, commits) = TestRepo::with_history(&[("delay", "2"), ("delay", "0")]);
        let scheduler = ParallelScheduler::new(CheckoutConfig::new(repo.path()), 2);
        let command = CommandLine::parse(r#"sh -c 'sleep $(cat delay)'"#).unwrap();

        let results = scheduler
            .run(&commits, &command, CaptureMode::Buffered)
            .await
            .unwrap();

        let order: Vec<_> = results.iter().map(|r| r.commit.clone()).collect();
        assert_eq!(order, vec![commits[1].clone(), commits[0].clone()]);
        assert_eq!(results.order, ResultOrder::Completion);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fatal_error_lets_in_flight_runs_finish() {
        let (repo, _root, commits) = TestRepo::with_history(&[("delay", "1"), ("delay", "0")]);
        let scratch = scratch_dir();
        let scheduler = ParallelScheduler::new(
            CheckoutConfig::new(repo.path()).with_scratch_dir(scratch.path()),
            2,
        );
        let command = CommandLine::parse(r#"sh -c 'sleep $(cat delay); touch done'"#).unwrap();
        let batch = vec![commits[0].clone(), Commit::new("e".repeat(40)), commits[1].clone()];

        let err = scheduler
            .run(&batch, &command, CaptureMode::Buffered)
            .await
            .unwrap_err();

        assert!(format!("{err:#}").contains("worktree add"));
        // The sleeping run was allowed to complete and clean up after itself
        assert!(is_empty_dir(scratch.path()));
        assert_eq!(repo.worktree_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let scheduler = ParallelScheduler::new(CheckoutConfig::new("."), 2);

        let results = scheduler
            .run(&[], &CommandLine::parse("true").unwrap(), CaptureMode::Buffered)
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
