//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use zipcheck_core::CatalogStats;
use zipcheck_core::VerificationResult;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the outcome of a verification run
    fn format_verification(&self, summary: &VerifySummary<'_>) -> Result<()>;

    /// Format archive contents
    fn format_listing(&self, listing: &Listing<'_>, long: bool, human_readable: bool)
    -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Everything a formatter needs to report a verification run.
pub struct VerifySummary<'a> {
    pub archive: &'a Path,
    pub stats: CatalogStats,
    pub result: &'a VerificationResult,
    pub duration: Duration,
}

/// One file row of a listing.
#[derive(Debug, Serialize)]
pub struct ListEntry {
    pub path: String,
    pub size: u64,
    pub crc32: u32,
}

/// Archive contents in traversal order.
pub struct Listing<'a> {
    pub archive: &'a Path,
    pub entries: Vec<ListEntry>,
    pub stats: CatalogStats,
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(operation: impl Into<String>, data: T, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Failure,
            data: Some(data),
            error: Some(error.into()),
        }
    }
}
