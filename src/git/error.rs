//! Git layer errors
//!
//! Everything in here is fatal for a run: callers propagate these instead of
//! recording them against a single commit.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::Commit;

/// Errors raised while resolving a revision range
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("failed to run git (is it on PATH?): {0}")]
    Spawn(#[source] io::Error),

    #[error("not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("unknown revision: {0}")]
    UnknownRevision(String),

    #[error("git rev-list {range} failed: {stderr}")]
    RangeFailed { range: String, stderr: String },
}

/// Errors raised while creating or tearing down an isolated checkout
#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("failed to create scratch directory: {0}")]
    TempDir(#[source] io::Error),

    #[error("failed to run git (is it on PATH?): {0}")]
    Spawn(#[source] io::Error),

    #[error("git worktree add for {commit} failed: {stderr}")]
    Create { commit: Commit, stderr: String },

    #[error("git worktree remove for {} failed: {stderr}", .path.display())]
    Teardown { path: PathBuf, stderr: String },

    #[error("failed to delete {}: {source}", .path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
