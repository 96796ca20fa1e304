//! Logging setup
//!
//! Diagnostics go to stderr so stdout only ever carries the formatted results.

use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Verbosity of the crate's own diagnostics
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level `{other}`")),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

/// Filter that only lets this crate's events through at `level`
fn crate_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::new(format!(
        "{}={}",
        env!("CARGO_CRATE_NAME"),
        LevelFilter::from(level)
    ))
}

/// Install the global subscriber
pub fn init_logger(level: LogLevel) {
    tracing_subscriber::fmt()
        .with_env_filter(crate_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
