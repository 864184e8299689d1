//! Error types for archive verification operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `VerifyError`.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Errors that can occur while reading or verifying an archive.
///
/// A checksum mismatch is not an error: it is the outcome a verification run
/// exists to report, and it is recorded in
/// [`VerificationResult`](crate::VerificationResult).
#[derive(Error, Debug)]
pub enum VerifyError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The ZIP reader rejected the archive or one of its entries.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The archive could not be opened at all.
    #[error("cannot open archive {path}: {source}")]
    ArchiveOpen {
        /// Path of the archive that failed to open.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: Box<Self>,
    },

    /// The archive handle was used after it had been closed.
    #[error("archive handle is closed")]
    ArchiveClosed,

    /// An entry handle does not refer to an entry of the open archive.
    #[error("no entry at index {index} in archive")]
    EntryNotFound {
        /// Index carried by the entry handle.
        index: usize,
    },

    /// Archive is structurally invalid.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// The background verification thread panicked.
    #[error("verification task panicked")]
    TaskPanicked,
}

impl VerifyError {
    /// Wraps `source` as a failure to open the archive at `path`.
    pub fn archive_open(path: impl Into<PathBuf>, source: impl Into<Self>) -> Self {
        Self::ArchiveOpen {
            path: path.into(),
            source: Box::new(source.into()),
        }
    }

    /// Returns `true` if this error means the archive handle is unusable and
    /// the run must abort.
    ///
    /// # Examples
    ///
    /// ```
    /// use zipcheck_core::VerifyError;
    ///
    /// assert!(VerifyError::ArchiveClosed.is_fatal());
    ///
    /// let err = VerifyError::InvalidArchive("bad deflate stream".to_string());
    /// assert!(!err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ArchiveOpen { .. } | Self::ArchiveClosed | Self::TaskPanicked
        )
    }

    /// Returns `true` if this error only affects the entry being read.
    ///
    /// Entry-local failures are recorded as a failed entry and the run
    /// continues with the next one.
    #[must_use]
    pub const fn is_entry_local(&self) -> bool {
        !self.is_fatal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_archive_open_preserves_source() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err = VerifyError::archive_open("missing.zip", io_err);

        assert!(err.is_fatal());
        assert!(err.to_string().contains("missing.zip"));
        let source = err.source().map(ToString::to_string).unwrap_or_default();
        assert!(source.contains("no such file"));
    }

    #[test]
    fn test_entry_local_errors() {
        let err = VerifyError::Io(io::Error::new(io::ErrorKind::InvalidData, "truncated"));
        assert!(err.is_entry_local());
        assert!(VerifyError::EntryNotFound { index: 3 }.is_entry_local());
        assert!(!VerifyError::ArchiveClosed.is_entry_local());
        assert!(!VerifyError::TaskPanicked.is_entry_local());
    }
}
