//! Git integration
//!
//! Resolves revision ranges and manages the isolated worktrees each commit
//! is checked out into. All git access goes through the `git` binary.

mod checkout;
mod error;
mod range;

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

pub use checkout::{with_checkout, CheckoutConfig};
pub use error::{CheckoutError, VcsError};
pub use range::RangeResolver;

/// Name of the git executable looked up on PATH
const GIT: &str = "git";

/// Build a git invocation scoped to `repo`
fn git(repo: &Path) -> Command {
    let mut cmd = Command::new(GIT);
    cmd.arg("-C").arg(repo).stdin(Stdio::null());
    cmd
}

/// Blocking variant of [`git`] for contexts that cannot await
fn git_blocking(repo: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(GIT);
    cmd.arg("-C").arg(repo).stdin(Stdio::null());
    cmd
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}
