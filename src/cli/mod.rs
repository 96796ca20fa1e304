//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

/// Run a command on every commit in a git revision range
#[derive(Parser, Debug)]
#[command(name = "rcogr")]
#[command(version)]
#[command(about = "Run a command on every commit in a git revision range")]
#[command(
    long_about = "Run a command on every commit in START..END. Each commit is checked out \
                  into its own temporary git worktree, so runs never interfere with each \
                  other or with your working copy."
)]
pub struct Args {
    /// Command to run in each checkout (split like a shell would, but not run by one)
    pub command: String,

    /// Start revision (exclusive)
    #[arg(short, long)]
    pub start: String,

    /// End revision (inclusive)
    #[arg(short, long, default_value = "HEAD")]
    pub end: String,

    /// Repository root [default: current directory]
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Run one commit at a time, in range order
    #[arg(long)]
    pub single_threaded: bool,

    /// Stream command output to the terminal instead of capturing it
    #[arg(long)]
    pub show_output: bool,

    /// Number of commits to run at once [default: available CPUs]
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Visit the oldest commit first
    #[arg(long)]
    pub reverse: bool,

    /// Output format (table, json, json-pretty, csv, summary)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Directory to create temporary checkouts in [default: system temp dir]
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["rcogr", "-s", "v1.0", "cargo test"]);
        assert_eq!(args.command, "cargo test");
        assert_eq!(args.start, "v1.0");
        assert_eq!(args.end, "HEAD");
        assert_eq!(args.path, None);
        assert!(!args.single_threaded);
        assert!(!args.show_output);
        assert_eq!(args.jobs, None);
    }

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from([
            "rcogr",
            "make check",
            "--start",
            "abc123",
            "--end",
            "main",
            "--path",
            "/src/project",
            "--single-threaded",
            "--show-output",
            "-j",
            "3",
            "--format",
            "json",
        ]);
        assert_eq!(args.end, "main");
        assert_eq!(args.path, Some(PathBuf::from("/src/project")));
        assert!(args.single_threaded);
        assert!(args.show_output);
        assert_eq!(args.jobs, Some(3));
        assert_eq!(args.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_start_is_required() {
        assert!(Args::try_parse_from(["rcogr", "true"]).is_err());
    }
}
