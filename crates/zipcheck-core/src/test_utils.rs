//! Test utilities for building archives and simulating archive failures.
//!
//! [`create_test_zip`] builds real ZIP bytes in memory. [`MemorySource`] is
//! an in-memory [`ArchiveSource`] whose open, read and close steps can be
//! made to fail, with a [`SourceProbe`] to observe what the engine acquired
//! and released.
//!
//! # Panics
//!
//! The ZIP builders panic on I/O errors since they are designed for test use
//! only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io;
use std::io::Cursor;
use std::io::Read;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use crate::Result;
use crate::VerifyError;
use crate::catalog::CatalogBuilder;
use crate::catalog::CatalogNode;
use crate::catalog::EntryHandle;
use crate::catalog::FileEntry;
use crate::checksum::crc32;
use crate::config::DEFAULT_PARENT_LINK_NAME;
use crate::formats::ArchiveSource;
use crate::formats::OpenArchive;

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are stored uncompressed.
///
/// # Examples
///
/// ```
/// use zipcheck_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("file.txt", b"hello"), ("dir/nested.txt", b"world")]);
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    build_zip(entries, zip::CompressionMethod::Stored)
}

/// Creates an in-memory ZIP archive whose entries are deflate-compressed.
#[must_use]
pub fn create_deflated_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    build_zip(entries, zip::CompressionMethod::Deflated)
}

fn build_zip(entries: Vec<(&str, &[u8])>, method: zip::CompressionMethod) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .unix_permissions(0o644);

    for (path, data) in entries {
        zip.start_file(path, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fault {
    None,
    ReadError { after: usize },
    HandleLoss,
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    path: String,
    data: Vec<u8>,
    stored_crc: u32,
    fault: Fault,
}

#[derive(Debug, Default)]
struct Counters {
    opens: AtomicUsize,
    closes: AtomicUsize,
    streams_opened: AtomicUsize,
    streams_closed: AtomicUsize,
    partial_released: AtomicBool,
}

/// In-memory archive with optional failure injection.
///
/// # Examples
///
/// ```
/// use zipcheck_core::Verifier;
/// use zipcheck_core::events::NoopSink;
/// use zipcheck_core::test_utils::MemorySource;
///
/// let source = MemorySource::new()
///     .with_file("ok.txt", b"fine")
///     .with_corrupt_file("bad.bin", b"data", 0xdead_beef);
/// let catalog = source.catalog();
///
/// let result = Verifier::default()
///     .verify(&catalog, &source, &mut NoopSink)
///     .unwrap();
/// assert_eq!(result.failures, ["bad.bin"]);
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    entries: Vec<MemoryEntry>,
    fail_open: bool,
    fail_close: bool,
    counters: Arc<Counters>,
}

impl MemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, path: &str, data: &[u8], stored_crc: u32, fault: Fault) -> Self {
        self.entries.push(MemoryEntry {
            path: path.to_string(),
            data: data.to_vec(),
            stored_crc,
            fault,
        });
        self
    }

    /// Adds an intact file.
    #[must_use]
    pub fn with_file(self, path: &str, data: &[u8]) -> Self {
        self.push(path, data, crc32(data), Fault::None)
    }

    /// Adds a file whose stored checksum is `stored_crc`.
    #[must_use]
    pub fn with_corrupt_file(self, path: &str, data: &[u8], stored_crc: u32) -> Self {
        self.push(path, data, stored_crc, Fault::None)
    }

    /// Adds a file whose stream fails after `after` bytes.
    #[must_use]
    pub fn with_failing_file(self, path: &str, data: &[u8], after: usize) -> Self {
        self.push(path, data, crc32(data), Fault::ReadError { after })
    }

    /// Adds a file whose stream fails halfway and invalidates the archive
    /// handle.
    #[must_use]
    pub fn with_handle_loss(self, path: &str, data: &[u8]) -> Self {
        self.push(path, data, crc32(data), Fault::HandleLoss)
    }

    /// Makes `open` fail after acquiring a partial resource.
    #[must_use]
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Makes `close` report an error.
    #[must_use]
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Returns a probe sharing this source's counters.
    #[must_use]
    pub fn probe(&self) -> SourceProbe {
        SourceProbe(Arc::clone(&self.counters))
    }

    /// Builds a catalog of the entries with `".."` parent links.
    #[must_use]
    pub fn catalog(&self) -> CatalogNode {
        let mut builder = CatalogBuilder::new(DEFAULT_PARENT_LINK_NAME);
        for (index, entry) in self.entries.iter().enumerate() {
            builder.add_file(
                &entry.path,
                entry.data.len() as u64,
                entry.stored_crc,
                EntryHandle::new(index),
            );
        }
        builder.finish()
    }
}

impl ArchiveSource for MemorySource {
    type Archive = MemoryArchive;

    fn open(&self) -> Result<MemoryArchive> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            let _partial = PartialOpen(Arc::clone(&self.counters));
            return Err(VerifyError::archive_open(
                self.display_name(),
                io::Error::new(io::ErrorKind::PermissionDenied, "injected open failure"),
            ));
        }
        Ok(MemoryArchive {
            entries: self.entries.clone(),
            open: Arc::new(AtomicBool::new(true)),
            fail_close: self.fail_close,
            counters: Arc::clone(&self.counters),
        })
    }

    fn display_name(&self) -> String {
        "memory".to_string()
    }
}

/// Resource acquired by a failing `open`, released on drop.
struct PartialOpen(Arc<Counters>);

impl Drop for PartialOpen {
    fn drop(&mut self) {
        self.0.partial_released.store(true, Ordering::SeqCst);
    }
}

/// Open handle produced by [`MemorySource`].
#[derive(Debug)]
pub struct MemoryArchive {
    entries: Vec<MemoryEntry>,
    open: Arc<AtomicBool>,
    fail_close: bool,
    counters: Arc<Counters>,
}

impl OpenArchive for MemoryArchive {
    fn open_entry(&mut self, entry: &FileEntry) -> Result<Box<dyn Read + '_>> {
        if !self.is_open() {
            return Err(VerifyError::ArchiveClosed);
        }
        let index = entry.handle.index();
        let stored = self
            .entries
            .get(index)
            .ok_or(VerifyError::EntryNotFound { index })?;
        self.counters.streams_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryStream {
            data: Cursor::new(stored.data.clone()),
            fault: stored.fault,
            open: Arc::clone(&self.open),
            counters: Arc::clone(&self.counters),
        }))
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    fn close(&mut self) -> Result<()> {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        self.open.store(false, Ordering::SeqCst);
        if self.fail_close {
            return Err(VerifyError::Io(io::Error::other("injected close failure")));
        }
        Ok(())
    }

    fn format_name(&self) -> &str {
        "memory"
    }
}

struct MemoryStream {
    data: Cursor<Vec<u8>>,
    fault: Fault,
    open: Arc<AtomicBool>,
    counters: Arc<Counters>,
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = self.data.get_ref().len();
        let limit = match self.fault {
            Fault::None => len,
            Fault::ReadError { after } => after.min(len),
            Fault::HandleLoss => len / 2,
        };
        let pos = usize::try_from(self.data.position()).unwrap_or(usize::MAX);
        if self.fault != Fault::None && pos >= limit {
            if self.fault == Fault::HandleLoss {
                self.open.store(false, Ordering::SeqCst);
            }
            return Err(io::Error::other("injected read failure"));
        }
        let max = limit.saturating_sub(pos).min(buf.len());
        self.data.read(&mut buf[..max])
    }
}

impl Drop for MemoryStream {
    fn drop(&mut self) {
        self.counters.streams_closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// Read-only view of what a [`MemorySource`] handed out.
#[derive(Debug, Clone)]
pub struct SourceProbe(Arc<Counters>);

impl SourceProbe {
    /// Number of `open` calls.
    #[must_use]
    pub fn opens(&self) -> usize {
        self.0.opens.load(Ordering::SeqCst)
    }

    /// Number of `close` calls.
    #[must_use]
    pub fn closes(&self) -> usize {
        self.0.closes.load(Ordering::SeqCst)
    }

    /// Number of entry streams opened.
    #[must_use]
    pub fn streams_opened(&self) -> usize {
        self.0.streams_opened.load(Ordering::SeqCst)
    }

    /// Number of entry streams dropped.
    #[must_use]
    pub fn streams_closed(&self) -> usize {
        self.0.streams_closed.load(Ordering::SeqCst)
    }

    /// Whether a failed `open` released its partial resource.
    #[must_use]
    pub fn partial_released(&self) -> bool {
        self.0.partial_released.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_zip_readable() {
        let data = create_deflated_zip(vec![("a.txt", b"aaaa"), ("b/c.txt", b"c")]);
        let archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_failing_stream_stops_at_limit() {
        let source = MemorySource::new().with_failing_file("f", b"0123456789", 4);
        let catalog = source.catalog();
        let crate::catalog::CatalogNode::Directory(root) = &catalog else {
            panic!("root must be a directory");
        };
        let Some(CatalogNode::File(entry)) = root.children.get("f") else {
            panic!("missing entry");
        };

        let mut archive = source.open().unwrap();
        let mut stream = archive.open_entry(entry).unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(stream.read(&mut buf).unwrap(), 4);
        assert!(stream.read(&mut buf).is_err());
    }
}
