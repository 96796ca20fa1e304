//! Isolated per-commit checkouts
//!
//! Every run gets its own detached `git worktree` inside a freshly created
//! scratch directory. The worktree is unregistered from the repository and
//! the directory deleted before control returns to the caller, however the
//! guarded work ended.

use anyhow::Context;
use futures::FutureExt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, error, warn};

use super::{git, git_blocking, lossy, CheckoutError};
use crate::models::Commit;

/// Prefix of every scratch directory
const SCRATCH_PREFIX: &str = "rcogr-";

/// Name of the worktree directory inside the scratch directory
const WORKTREE_DIR: &str = "checkout";

/// Where checkouts come from and where they are placed
#[derive(Clone, Debug)]
pub struct CheckoutConfig {
    /// Repository the worktrees are linked to
    pub repo: PathBuf,
    /// Parent for scratch directories; the system temp dir when unset
    pub scratch_dir: Option<PathBuf>,
}

impl CheckoutConfig {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            scratch_dir: None,
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = Some(dir.into());
        self
    }

    fn scratch(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX);
        match &self.scratch_dir {
            Some(dir) => builder.tempdir_in(dir),
            None => builder.tempdir(),
        }
    }
}

/// Lifecycle of a [`CheckoutScope`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckoutState {
    Created,
    InUse,
    Releasing,
    Released,
}

/// A worktree pinned to one commit, owned by exactly one run
#[derive(Debug)]
pub struct CheckoutScope {
    repo: PathBuf,
    commit: Commit,
    path: PathBuf,
    scratch: Option<TempDir>,
    state: CheckoutState,
}

impl CheckoutScope {
    /// Create a scratch directory and check `commit` out into it
    pub async fn acquire(config: &CheckoutConfig, commit: &Commit) -> Result<Self, CheckoutError> {
        let scratch = config.scratch().map_err(CheckoutError::TempDir)?;
        let path = scratch.path().join(WORKTREE_DIR);

        debug!("Adding worktree for {} at {}", commit.short(), path.display());

        let output = git(&config.repo)
            .args(["worktree", "add", "--detach"])
            .arg(&path)
            .arg(commit.as_str())
            .output()
            .await
            .map_err(CheckoutError::Spawn)?;

        if !output.status.success() {
            // `scratch` drops here and takes the directory with it
            return Err(CheckoutError::Create {
                commit: commit.clone(),
                stderr: lossy(&output.stderr),
            });
        }

        Ok(Self {
            repo: config.repo.clone(),
            commit: commit.clone(),
            path,
            scratch: Some(scratch),
            state: CheckoutState::Created,
        })
    }

    /// Hand the directory to a runner
    pub fn enter(&mut self) {
        self.state = CheckoutState::InUse;
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unregister the worktree, then delete the scratch directory
    ///
    /// The directory is deleted even when unregistering fails, but the
    /// unregister error is still returned.
    pub async fn release(mut self) -> Result<(), CheckoutError> {
        self.state = CheckoutState::Releasing;
        debug!("Removing worktree for {} at {}", self.commit.short(), self.path.display());

        let unregistered = match git(&self.repo)
            .args(["worktree", "remove", "--force"])
            .arg(&self.path)
            .output()
            .await
        {
            Ok(output) if output.status.success() => Ok(()),
            Ok(output) => Err(CheckoutError::Teardown {
                path: self.path.clone(),
                stderr: lossy(&output.stderr),
            }),
            Err(e) => Err(CheckoutError::Spawn(e)),
        };

        let scratch = self.scratch.take();
        self.state = CheckoutState::Released;
        unregistered?;

        if let Some(scratch) = scratch {
            let scratch_path = scratch.path().to_path_buf();
            scratch.close().map_err(|source| CheckoutError::Cleanup {
                path: scratch_path,
                source,
            })?;
        }
        Ok(())
    }
}

// Only reached when a scope is dropped without `release`, e.g. a cancelled
// future. Blocks the current worker thread while git runs.
impl Drop for CheckoutScope {
    fn drop(&mut self) {
        if self.state == CheckoutState::Released {
            return;
        }

        warn!(
            "Checkout of {} dropped while {:?}, tearing down",
            self.commit.short(),
            self.state
        );

        match git_blocking(&self.repo)
            .args(["worktree", "remove", "--force"])
            .arg(&self.path)
            .output()
        {
            Ok(output) if output.status.success() => {}
            Ok(output) => error!(
                "Failed to remove worktree {}: {}",
                self.path.display(),
                lossy(&output.stderr)
            ),
            Err(e) => error!("Failed to remove worktree {}: {}", self.path.display(), e),
        }
        // `scratch` is dropped after this and deletes the directory
    }
}

/// Run `body` inside a fresh checkout of `commit`
///
/// The checkout is released after `body` completes, returns an error or
/// panics. A panic is resumed once teardown has finished. A teardown failure
/// takes precedence over the body's own outcome.
pub async fn with_checkout<F, Fut, T>(
    config: &CheckoutConfig,
    commit: &Commit,
    body: F,
) -> anyhow::Result<T>
where
    F: FnOnce(PathBuf) -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let mut scope = CheckoutScope::acquire(config, commit)
        .await
        .with_context(|| format!("Failed to check out {commit}"))?;

    scope.enter();
    let path = scope.path().to_path_buf();
    let outcome = AssertUnwindSafe(body(path)).catch_unwind().await;

    scope
        .release()
        .await
        .with_context(|| format!("Failed to remove checkout of {commit}"))?;

    match outcome {
        Ok(result) => result,
        Err(payload) => panic::resume_unwind(payload),
    }
}
