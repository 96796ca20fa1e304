//! Output formatting module
//!
//! Renders result sets for the terminal or for other tools.

mod formatter;

pub use formatter::{OutputFormat, ResultFormatter};
