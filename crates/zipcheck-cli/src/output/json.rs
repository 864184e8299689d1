//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::ListEntry;
use super::formatter::Listing;
use super::formatter::OutputFormatter;
use super::formatter::VerifySummary;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct VerifyOutput<'a> {
    archive: String,
    files: usize,
    total_size: u64,
    checked: usize,
    passed: usize,
    failed: usize,
    cancelled: bool,
    failures: &'a [String],
    duration_ms: u128,
}

#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    archive: String,
    files: usize,
    directories: usize,
    total_size: u64,
    entries: &'a [ListEntry],
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn verify_output<'a>(summary: &'a VerifySummary<'_>) -> JsonOutput<VerifyOutput<'a>> {
        let result = summary.result;
        let data = VerifyOutput {
            archive: summary.archive.display().to_string(),
            files: summary.stats.files,
            total_size: summary.stats.total_size,
            checked: result.total_checked(),
            passed: result.passed,
            failed: result.failed,
            cancelled: result.cancelled,
            failures: &result.failures,
            duration_ms: summary.duration.as_millis(),
        };

        if result.is_clean() && !result.cancelled {
            JsonOutput::success("verify", data)
        } else if result.cancelled {
            JsonOutput::failure("verify", data, "verification cancelled")
        } else {
            let message = format!("{} entries failed CRC-32 verification", result.failed);
            JsonOutput::failure("verify", data, message)
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_verification(&self, summary: &VerifySummary<'_>) -> Result<()> {
        Self::output(&Self::verify_output(summary))
    }

    fn format_listing(&self, listing: &Listing<'_>, _long: bool, _human_readable: bool) -> Result<()> {
        let data = ListOutput {
            archive: listing.archive.display().to_string(),
            files: listing.stats.files,
            directories: listing.stats.directories,
            total_size: listing.stats.total_size,
            entries: &listing.entries,
        };
        Self::output(&JsonOutput::success("list", data))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        // Warnings go to stderr so stdout stays a single JSON document.
        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        if let Ok(json) = serde_json::to_string(&output) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}
