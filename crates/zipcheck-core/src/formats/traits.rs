//! Common traits for archive container readers.

use std::io::Read;

use crate::Result;
use crate::catalog::FileEntry;

/// An archive that has been opened for reading entry streams.
///
/// A handle is single-reader: at most one entry stream is open at a time,
/// which the `&mut self` borrow on [`open_entry`](Self::open_entry) enforces.
pub trait OpenArchive {
    /// Opens a fresh decompressed stream for `entry`.
    ///
    /// The stream is closed when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::ArchiveClosed`](crate::VerifyError::ArchiveClosed)
    /// once the handle has been closed, or an entry-local error if the entry
    /// cannot be read.
    fn open_entry(&mut self, entry: &FileEntry) -> Result<Box<dyn Read + '_>>;

    /// Returns `true` while entry streams can still be opened.
    fn is_open(&self) -> bool;

    /// Releases the underlying handle. Later calls are no-ops.
    fn close(&mut self) -> Result<()>;

    /// Returns the archive format name.
    fn format_name(&self) -> &str;
}

/// Something that can be opened into an [`OpenArchive`].
///
/// Opening is the only step allowed to block on container I/O besides
/// reading entry streams. Anything partially acquired by a failed `open`
/// must be released before the error is returned; owning types do this by
/// dropping.
pub trait ArchiveSource {
    /// Handle type produced by [`open`](Self::open).
    type Archive: OpenArchive;

    /// Opens the archive.
    fn open(&self) -> Result<Self::Archive>;

    /// Human-readable name used in logs.
    fn display_name(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VerifyError;
    use crate::catalog::EntryHandle;
    use std::io::Cursor;

    struct EmptyArchive {
        open: bool,
    }

    impl OpenArchive for EmptyArchive {
        fn open_entry(&mut self, _entry: &FileEntry) -> Result<Box<dyn Read + '_>> {
            if !self.open {
                return Err(VerifyError::ArchiveClosed);
            }
            Ok(Box::new(Cursor::new(Vec::new())))
        }

        fn is_open(&self) -> bool {
            self.open
        }

        fn close(&mut self) -> Result<()> {
            self.open = false;
            Ok(())
        }

        fn format_name(&self) -> &str {
            "empty"
        }
    }

    #[test]
    fn test_trait_implementation() {
        let mut archive = EmptyArchive { open: true };
        let entry = FileEntry::new("a", 0, 0, EntryHandle::new(0));

        assert_eq!(archive.format_name(), "empty");
        assert!(archive.open_entry(&entry).is_ok());
        archive.close().ok();
        assert!(!archive.is_open());
        assert!(matches!(
            archive.open_entry(&entry),
            Err(VerifyError::ArchiveClosed)
        ));
    }
}
