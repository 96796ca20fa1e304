//! Data models for revision runs
//!
//! This module contains the data structures shared between the git layer,
//! the executor and the output formatters.

mod commit;
mod test_result;

pub use commit::Commit;
pub use test_result::{ResultOrder, ResultSet, TestResult, TestStatus};
