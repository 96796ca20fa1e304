//! Scratch git repositories for tests

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

use crate::models::Commit;

/// A throwaway repository driven through the real git binary
pub struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::Builder::new()
            .prefix("rcogr-test-repo-")
            .tempdir()
            .unwrap();
        let repo = Self { dir };
        repo.git(&["init", "-q"]);
        repo
    }

    /// Repository with one root commit plus one commit per entry of `files`,
    /// each writing `contents` to `name`. Returns the non-root commits in
    /// creation order.
    pub fn with_history(files: &[(&str, &str)]) -> (Self, Commit, Vec<Commit>) {
        let repo = Self::new();
        let root = repo.commit_file("README", "root\n", "root");
        let commits = files
            .iter()
            .enumerate()
            .map(|(i, (name, contents))| repo.commit_file(name, contents, &format!("commit {i}")))
            .collect();
        (repo, root, commits)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, commit it and return the new HEAD
    pub fn commit_file(&self, name: &str, contents: &str, message: &str) -> Commit {
        fs::write(self.path().join(name), contents).unwrap();
        self.git(&["add", name]);
        self.git(&["commit", "-q", "-m", message]);
        Commit::new(self.git(&["rev-parse", "HEAD"]))
    }

    /// Number of worktrees git knows about, including the primary one
    pub fn worktree_count(&self) -> usize {
        self.git(&["worktree", "list", "--porcelain"])
            .lines()
            .filter(|line| line.starts_with("worktree "))
            .count()
    }

    pub fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .arg("-C")
            .arg(self.path())
            .args([
                "-c",
                "user.name=rcogr",
                "-c",
                "user.email=rcogr@example.com",
                "-c",
                "commit.gpgsign=false",
            ])
            .args(args)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

/// Empty scratch directory for checkouts, so tests can assert it is left empty
pub fn scratch_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("rcogr-test-scratch-")
        .tempdir()
        .unwrap()
}

pub fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).unwrap().next().is_none()
}
