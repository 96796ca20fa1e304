//! Sequential execution
//!
//! One commit at a time, in resolved order.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::{run_commit, CaptureMode, CommandLine, CommandRunner, Scheduler};
use crate::git::CheckoutConfig;
use crate::models::{Commit, ResultOrder, ResultSet};

/// Runs commits strictly one after another
pub struct SequentialScheduler {
    checkout: CheckoutConfig,
}

impl SequentialScheduler {
    pub fn new(checkout: CheckoutConfig) -> Self {
        Self { checkout }
    }
}

#[async_trait]
impl Scheduler for SequentialScheduler {
    async fn run(
        &self,
        commits: &[Commit],
        command: &CommandLine,
        mode: CaptureMode,
    ) -> Result<ResultSet> {
        info!("Running `{}` on {} commits sequentially", command, commits.len());

        let started_at = Utc::now();
        let runner = CommandRunner::new(command.clone());
        let mut results = Vec::with_capacity(commits.len());

        for (i, commit) in commits.iter().enumerate() {
            info!("[{}/{}] {}", i + 1, commits.len(), commit.short());
            let result = run_commit(&self.checkout, commit, &runner, mode).await?;
            info!("  {}", result);
            results.push(result);
        }

        Ok(ResultSet::new(ResultOrder::Resolution, started_at, results))
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
