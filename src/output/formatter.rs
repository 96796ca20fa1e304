//! Output formatters for revision results
//!
//! Provides table, JSON, CSV and summary output formats.

use tracing::error;

use crate::models::{ResultOrder, ResultSet, TestResult, TestStatus};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    fn status_label(&self, status: TestStatus) -> &'static str {
        if self.colorize {
            match status {
                TestStatus::Pass => "\x1b[32m✓ PASS\x1b[0m",
                TestStatus::Fail => "\x1b[31m✗ FAIL\x1b[0m",
            }
        } else {
            match status {
                TestStatus::Pass => "✓ PASS",
                TestStatus::Fail => "✗ FAIL",
            }
        }
    }

    fn format_result_table(&self, result: &TestResult) -> String {
        format!(
            "{} {} exit {:>3} [{:>6}ms]",
            result.commit.short(),
            self.status_label(result.status()),
            result.return_code,
            result.duration_ms
        )
    }

    fn format_result_summary(&self, result: &TestResult) -> String {
        format!(
            "{} {} ({}ms)",
            result.status().symbol(),
            result.commit.short(),
            result.duration_ms
        )
    }

    /// Format a whole result set
    pub fn format_results(&self, results: &ResultSet) -> String {
        match self.format {
            OutputFormat::Table => self.format_results_table(results),
            OutputFormat::Json => serde_json::to_string(results).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(results).unwrap_or_default(),
            OutputFormat::Csv => self.format_results_csv(results),
            OutputFormat::Summary => self.format_results_brief(results),
        }
    }

    fn format_results_table(&self, results: &ResultSet) -> String {
        let mut output = String::new();

        if results.is_empty() {
            output.push_str("No commits in range\n");
            return output;
        }

        output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        for result in results {
            output.push_str(&self.format_result_table(result));
            output.push('\n');

            // Captured output is only shown for failures
            if !result.success() {
                push_block(&mut output, "stdout", result.stdout.as_deref());
                push_block(&mut output, "stderr", result.stderr.as_deref());
            }
        }
        output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", results.passed())
        } else {
            results.passed().to_string()
        };
        let fail_str = if self.colorize && results.failed() > 0 {
            format!("\x1b[31m{}\x1b[0m", results.failed())
        } else {
            results.failed().to_string()
        };

        output.push_str(&format!(
            "Total: {} | Pass: {} | Fail: {} | Duration: {}ms\n",
            results.len(),
            pass_str,
            fail_str,
            results.total_duration_ms()
        ));
        if results.order == ResultOrder::Completion {
            output.push_str("(listed in completion order)\n");
        }

        output
    }

    fn format_results_csv(&self, results: &ResultSet) -> String {
        match write_csv(results) {
            Ok(output) => output,
            Err(e) => {
                error!("Failed to write CSV: {}", e);
                String::new()
            }
        }
    }

    fn format_results_brief(&self, results: &ResultSet) -> String {
        let failing: Vec<_> = results
            .iter()
            .filter(|r| !r.success())
            .map(|r| r.commit.short())
            .collect();

        let mut output = String::new();
        for result in results {
            output.push_str(&self.format_result_summary(result));
            output.push('\n');
        }

        output.push_str(&format!(
            "{}/{} commits passed in {}ms",
            results.passed(),
            results.len(),
            results.total_duration_ms()
        ));
        if !failing.is_empty() {
            output.push_str(&format!(" - failing: {}", failing.join(", ")));
        }
        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

fn push_block(output: &mut String, label: &str, text: Option<&str>) {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return;
    };
    output.push_str(&format!("  ── {label} ──\n"));
    for line in text.lines() {
        output.push_str("  │ ");
        output.push_str(line);
        output.push('\n');
    }
}

/// One record per result; passthrough runs leave the output columns empty
fn write_csv(results: &ResultSet) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());

    writer.write_record([
        "commit",
        "status",
        "return_code",
        "duration_ms",
        "stdout",
        "stderr",
    ])?;

    for result in results {
        writer.write_record([
            result.commit.to_string(),
            result.status().to_string(),
            result.return_code.to_string(),
            result.duration_ms.to_string(),
            result.stdout.clone().unwrap_or_default(),
            result.stderr.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
