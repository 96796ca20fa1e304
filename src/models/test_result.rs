//! Per-commit result models
//!
//! Defines the outcome of one command run and the set of outcomes for a batch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Commit;

/// Outcome classification of a single run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
        }
    }
}

/// Result of running the command against one commit
///
/// `stdout` and `stderr` are `None` when the run used passthrough output,
/// since the child wrote straight to the invoking terminal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub commit: Commit,
    pub return_code: i32,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub duration_ms: u64,
}

impl TestResult {
    pub fn new(commit: Commit, return_code: i32) -> Self {
        Self {
            commit,
            return_code,
            stdout: None,
            stderr: None,
            duration_ms: 0,
        }
    }

    pub fn with_output(mut self, stdout: Option<String>, stderr: Option<String>) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn success(&self) -> bool {
        self.return_code == 0
    }

    pub fn status(&self) -> TestStatus {
        if self.success() {
            TestStatus::Pass
        } else {
            TestStatus::Fail
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} exit {} [{}ms]",
            self.status().symbol(),
            self.commit.short(),
            self.return_code,
            self.duration_ms
        )
    }
}

/// How the entries of a [`ResultSet`] are ordered
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultOrder {
    /// Same order as the resolved revision range
    Resolution,
    /// Order in which runs finished; not deterministic
    Completion,
}

/// All results of one batch, exactly one per resolved commit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResultSet {
    pub order: ResultOrder,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    results: Vec<TestResult>,
}

impl ResultSet {
    pub fn new(order: ResultOrder, started_at: DateTime<Utc>, results: Vec<TestResult>) -> Self {
        Self {
            order,
            started_at,
            finished_at: Utc::now(),
            results,
        }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestResult> {
        self.results.iter()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.success()).count()
    }

    pub fn failed(&self) -> usize {
        self.len() - self.passed()
    }

    pub fn total_duration_ms(&self) -> u64 {
        (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as u64
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a TestResult;
    type IntoIter = std::slice::Iter<'a, TestResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
