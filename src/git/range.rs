//! Revision range resolution

use std::path::PathBuf;
use tracing::debug;

use super::{git, lossy, VcsError};
use crate::models::Commit;

/// Turns a `start..end` pair into the commits it contains
#[derive(Clone, Debug)]
pub struct RangeResolver {
    repo: PathBuf,
    reverse: bool,
}

impl RangeResolver {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            repo: repo.into(),
            reverse: false,
        }
    }

    /// List oldest commits first instead of git's default newest-first
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Resolve the commits reachable from `end` but not from `start`
    #[tracing::instrument(skip(self), fields(repo = %self.repo.display()))]
    pub async fn resolve(&self, start: &str, end: &str) -> Result<Vec<Commit>, VcsError> {
        self.ensure_repository().await?;
        self.verify_revision(start).await?;
        self.verify_revision(end).await?;

        let range = format!("{start}..{end}");
        let mut cmd = git(&self.repo);
        cmd.arg("rev-list");
        if self.reverse {
            cmd.arg("--reverse");
        }
        let output = cmd
            .arg(&range)
            .arg("--")
            .output()
            .await
            .map_err(VcsError::Spawn)?;

        if !output.status.success() {
            return Err(VcsError::RangeFailed {
                range,
                stderr: lossy(&output.stderr),
            });
        }

        let commits: Vec<Commit> = String::from_utf8_lossy(&output.stdout)
            .split_whitespace()
            .map(Commit::new)
            .collect();

        debug!("{} resolved to {} commits", range, commits.len());
        Ok(commits)
    }

    async fn ensure_repository(&self) -> Result<(), VcsError> {
        if !self.repo.is_dir() {
            return Err(VcsError::NotARepository(self.repo.clone()));
        }

        let output = git(&self.repo)
            .args(["rev-parse", "--git-dir"])
            .output()
            .await
            .map_err(VcsError::Spawn)?;

        if !output.status.success() {
            debug!("rev-parse --git-dir: {}", lossy(&output.stderr));
            return Err(VcsError::NotARepository(self.repo.clone()));
        }
        Ok(())
    }

    async fn verify_revision(&self, rev: &str) -> Result<(), VcsError> {
        // Leading dashes would be read as options
        if rev.is_empty() || rev.starts_with('-') {
            return Err(VcsError::UnknownRevision(rev.to_string()));
        }

        let output = git(&self.repo)
            .args(["rev-parse", "--verify", "--quiet"])
            .arg(format!("{rev}^{{commit}}"))
            .output()
            .await
            .map_err(VcsError::Spawn)?;

        if !output.status.success() {
            return Err(VcsError::UnknownRevision(rev.to_string()));
        }
        Ok(())
    }
}
