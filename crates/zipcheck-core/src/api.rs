//! High-level public API for archive verification.

use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc;

use crate::Result;
use crate::VerificationResult;
use crate::VerifyConfig;
use crate::catalog::CatalogStats;
use crate::events::NoopSink;
use crate::events::VerifyEvent;
use crate::formats::ZipSource;
use crate::verify::VerificationTask;
use crate::verify::Verifier;
use crate::verify::spawn_verification;

/// Verifies every entry of the ZIP archive at `archive_path` on the calling
/// thread.
///
/// # Errors
///
/// Returns an error if the archive cannot be opened or its central directory
/// cannot be read. Checksum mismatches and unreadable entries are reported in
/// the result.
///
/// # Examples
///
/// ```no_run
/// use zipcheck_core::VerifyConfig;
/// use zipcheck_core::verify_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let result = verify_archive("archive.zip", &VerifyConfig::default())?;
/// println!("{} passed, {} failed", result.passed, result.failed);
/// # Ok(())
/// # }
/// ```
pub fn verify_archive<P: AsRef<Path>>(
    archive_path: P,
    config: &VerifyConfig,
) -> Result<VerificationResult> {
    let source = ZipSource::new(archive_path);
    let catalog = source.catalog_with(&config.parent_link_name)?;
    Verifier::new(config.clone()).verify(&catalog, &source, &mut NoopSink)
}

/// A background verification of a ZIP archive, with its pre-computed totals.
#[derive(Debug)]
pub struct BackgroundVerification {
    /// Totals over the catalog being verified.
    pub stats: CatalogStats,
    /// Handle to the running task.
    pub task: VerificationTask,
    /// Events of the run, ending with `Completed`.
    pub events: mpsc::Receiver<VerifyEvent>,
}

/// Reads the catalog of the ZIP archive at `archive_path` and starts
/// verifying it in the background.
///
/// # Errors
///
/// Returns an error if the central directory cannot be read or the
/// background thread cannot be started.
pub fn spawn_archive_verification<P: AsRef<Path>>(
    archive_path: P,
    config: &VerifyConfig,
) -> Result<BackgroundVerification> {
    let source = ZipSource::new(archive_path);
    let catalog = source.catalog_with(&config.parent_link_name)?;
    let stats = CatalogStats::collect_with(&catalog, &config.parent_link_name);
    let (task, events) = spawn_verification(Arc::new(catalog), source, config.clone())?;
    Ok(BackgroundVerification {
        stats,
        task,
        events,
    })
}
