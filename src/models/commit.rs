//! Commit identifiers
//!
//! A resolved revision hash, immutable once produced by the range resolver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the abbreviated hash used for display
const SHORT_LEN: usize = 7;

/// A resolved commit hash
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Commit(String);

impl Commit {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Full hash as produced by git
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated hash for human-readable output
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(SHORT_LEN) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Commit {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
