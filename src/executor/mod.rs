//! Revision execution engine
//!
//! Provides sequential and parallel scheduling of one command across many
//! commits, each run inside its own checkout.

mod parallel;
mod runner;
mod sequential;

use anyhow::Result;
use async_trait::async_trait;

pub use parallel::ParallelScheduler;
pub use runner::{CaptureMode, CommandLine, CommandRunner};
pub use sequential::SequentialScheduler;

use crate::git::{with_checkout, CheckoutConfig};
use crate::models::{Commit, ResultSet, TestResult};
use crate::utils::Timer;

/// Drives a command across a list of commits
///
/// Implementations return exactly one result per commit, or the first fatal
/// error. A command exiting non-zero is a failed result, not an error.
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn run(
        &self,
        commits: &[Commit],
        command: &CommandLine,
        mode: CaptureMode,
    ) -> Result<ResultSet>;

    fn name(&self) -> &'static str;
}

/// Scheduling strategy, chosen once at startup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    Sequential,
    #[default]
    Parallel,
}

/// Build the scheduler for `strategy`
pub fn scheduler_for(
    strategy: Strategy,
    checkout: CheckoutConfig,
    max_concurrent: usize,
) -> Box<dyn Scheduler> {
    match strategy {
        Strategy::Sequential => Box::new(SequentialScheduler::new(checkout)),
        Strategy::Parallel => Box::new(ParallelScheduler::new(checkout, max_concurrent)),
    }
}

/// Check out `commit`, run the command in it and tear the checkout down
async fn run_commit(
    checkout: &CheckoutConfig,
    commit: &Commit,
    runner: &CommandRunner,
    mode: CaptureMode,
) -> Result<TestResult> {
    let timer = Timer::start(format!("commit {}", commit.short()));

    let output = with_checkout(checkout, commit, |dir| async move {
        Ok(runner.execute(&dir, mode).await)
    })
    .await?;

    Ok(TestResult::new(commit.clone(), output.return_code)
        .with_output(output.stdout, output.stderr)
        .with_duration(timer.stop_ms()))
}
