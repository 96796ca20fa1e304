//! Configuration module
//!
//! Merges command-line arguments with environment overrides into the
//! settings for one run. Command-line values win.

pub mod env;

use anyhow::{bail, Context, Result};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::cli::Args;
use crate::executor::{CaptureMode, CommandLine, ParallelScheduler, Strategy};
use crate::git::CheckoutConfig;
use crate::output::OutputFormat;
use crate::utils::logger::LogLevel;
use env::EnvConfig;

/// Resolved settings for one invocation
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub command: CommandLine,
    pub start: String,
    pub end: String,
    pub checkout: CheckoutConfig,
    pub strategy: Strategy,
    pub capture: CaptureMode,
    pub jobs: usize,
    pub reverse: bool,
    pub format: OutputFormat,
    pub color: bool,
}

impl RunConfig {
    /// Build the run configuration
    ///
    /// Fails on an unparsable command, an unknown output format or a pool
    /// size of zero, before anything touches the repository.
    pub fn from_sources(args: Args, env: &EnvConfig) -> Result<Self> {
        let command = CommandLine::parse(&args.command)
            .with_context(|| format!("Invalid command: {}", args.command))?;

        let repo = match args.path {
            Some(path) => path,
            None => std::env::current_dir().context("Failed to read current directory")?,
        };

        let mut checkout = CheckoutConfig::new(repo);
        if let Some(dir) = args.scratch_dir.or_else(|| env.scratch_dir.clone()) {
            checkout = checkout.with_scratch_dir(dir);
        }

        let strategy = if args.single_threaded || env.single_threaded.unwrap_or(false) {
            Strategy::Sequential
        } else {
            Strategy::Parallel
        };

        let capture = if args.show_output || env.show_output.unwrap_or(false) {
            CaptureMode::Passthrough
        } else {
            CaptureMode::Buffered
        };

        let jobs = args
            .jobs
            .or(env.jobs)
            .unwrap_or_else(ParallelScheduler::default_concurrency);
        if jobs == 0 {
            bail!("--jobs must be at least 1");
        }

        let format = match args.format.as_deref().or(env.format.as_deref()) {
            Some(name) => OutputFormat::from_str(name)
                .with_context(|| format!("Unknown output format: {name}"))?,
            None => OutputFormat::Table,
        };

        let color = !args.no_color && !env.no_color && std::io::stdout().is_terminal();

        Ok(Self {
            command,
            start: args.start,
            end: args.end,
            checkout,
            strategy,
            capture,
            jobs,
            reverse: args.reverse,
            format,
            color,
        })
    }

    pub fn repo(&self) -> &PathBuf {
        &self.checkout.repo
    }
}

/// Log level: `--verbose` forces debug, otherwise RCOGR_LOG, otherwise info
pub fn log_level(verbose: bool, env: &EnvConfig) -> LogLevel {
    if verbose {
        return LogLevel::Debug;
    }
    env.log_level
        .as_deref()
        .and_then(|level| level.parse().ok())
        .unwrap_or_default()
}
