//! Error conversion utilities for CLI.
//!
//! Converts zipcheck-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::io;
use std::path::Path;
use zipcheck_core::VerifyError;

/// Converts `VerifyError` to user-friendly anyhow error with context
pub fn convert_verify_error(err: VerifyError, archive: &Path) -> anyhow::Error {
    match err {
        VerifyError::ArchiveOpen { source, .. } => match *source {
            VerifyError::Io(io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                anyhow!(
                    "Archive '{}' not found\n\
                     HINT: Check the path and try again.",
                    archive.display()
                )
            }
            VerifyError::Io(io_err) if io_err.kind() == io::ErrorKind::PermissionDenied => {
                anyhow!(
                    "Permission denied reading '{}'\n\
                     HINT: Check the file permissions.",
                    archive.display()
                )
            }
            other => {
                anyhow!(
                    "Cannot open '{}' as a ZIP archive: {}\n\
                     HINT: The file may be truncated, corrupted, or not a ZIP archive.",
                    archive.display(),
                    other
                )
            }
        },
        VerifyError::ArchiveClosed => {
            anyhow!(
                "Archive '{}' became unreadable during verification\n\
                 HINT: The file may have been moved or modified while it was being checked.",
                archive.display()
            )
        }
        VerifyError::TaskPanicked => {
            anyhow!(
                "Verification of '{}' stopped unexpectedly\n\
                 HINT: Re-run with --verbose or RUST_LOG=debug for details.",
                archive.display()
            )
        }
        VerifyError::Zip(zip_err) => {
            anyhow!(
                "Invalid ZIP archive '{}': {}\n\
                 HINT: The central directory may be corrupted.",
                archive.display(),
                zip_err
            )
        }
        _ => anyhow::Error::from(err)
            .context(format!("Error verifying archive '{}'", archive.display())),
    }
}

/// Adds context to a core result about archive operations
pub fn add_archive_context<T>(
    result: Result<T, VerifyError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_verify_error(e, archive))
}
