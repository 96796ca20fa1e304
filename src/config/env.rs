//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "RCOGR";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Pool size from RCOGR_JOBS
    pub jobs: Option<usize>,
    /// Output format from RCOGR_FORMAT
    pub format: Option<String>,
    /// Log level from RCOGR_LOG
    pub log_level: Option<String>,
    /// Sequential strategy from RCOGR_SINGLE_THREADED
    pub single_threaded: Option<bool>,
    /// Passthrough output from RCOGR_SHOW_OUTPUT
    pub show_output: Option<bool>,
    /// Checkout parent directory from RCOGR_SCRATCH_DIR
    pub scratch_dir: Option<PathBuf>,
    /// Color suppression from NO_COLOR
    pub no_color: bool,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a full variable name
    /// to its value
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(&format!("{ENV_PREFIX}_{name}"));

        Self {
            jobs: get("JOBS").and_then(|v| v.parse().ok()),
            format: get("FORMAT"),
            log_level: get("LOG"),
            single_threaded: get("SINGLE_THREADED").map(|v| parse_bool(&v)),
            show_output: get("SHOW_OUTPUT").map(|v| parse_bool(&v)),
            scratch_dir: get("SCRATCH_DIR").map(PathBuf::from),
            // https://no-color.org: any non-empty value disables color
            no_color: lookup("NO_COLOR").is_some_and(|v| !v.is_empty()),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "enabled"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> EnvConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_env_config_default() {
        let config = from_pairs(&[]);
        assert_eq!(config.jobs, None);
        assert_eq!(config.single_threaded, None);
        assert!(!config.no_color);
    }

    #[test]
    fn test_env_config_values() {
        let config = from_pairs(&[
            ("RCOGR_JOBS", "6"),
            ("RCOGR_FORMAT", "csv"),
            ("RCOGR_LOG", "debug"),
            ("RCOGR_SINGLE_THREADED", "yes"),
            ("RCOGR_SHOW_OUTPUT", "off"),
            ("RCOGR_SCRATCH_DIR", "/var/tmp"),
            ("NO_COLOR", "1"),
        ]);

        assert_eq!(config.jobs, Some(6));
        assert_eq!(config.format.as_deref(), Some("csv"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.single_threaded, Some(true));
        assert_eq!(config.show_output, Some(false));
        assert_eq!(config.scratch_dir, Some(PathBuf::from("/var/tmp")));
        assert!(config.no_color);
    }

    #[test]
    fn test_unparsable_jobs_is_ignored() {
        let config = from_pairs(&[("RCOGR_JOBS", "many")]);
        assert_eq!(config.jobs, None);
    }

    #[test]
    fn test_empty_no_color_keeps_color() {
        let config = from_pairs(&[("NO_COLOR", "")]);
        assert!(!config.no_color);
    }
}
