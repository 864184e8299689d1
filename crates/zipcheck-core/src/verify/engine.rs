//! Verification engine.

use std::io;
use std::io::Read;
use std::time::Instant;

use crate::Result;
use crate::VerificationResult;
use crate::VerifyConfig;
use crate::VerifyError;
use crate::catalog::CatalogNode;
use crate::catalog::FileEntry;
use crate::catalog::Walk;
use crate::checksum::Crc32;
use crate::events::EventSink;
use crate::events::VerifyEvent;
use crate::formats::ArchiveSource;
use crate::formats::OpenArchive;

use super::cancel::CancellationToken;

/// Recomputes CRC-32 checksums of catalog entries and compares them with the
/// stored values.
///
/// # Examples
///
/// ```no_run
/// use zipcheck_core::{Verifier, VerifyConfig, ZipSource};
/// use zipcheck_core::events::NoopSink;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = ZipSource::new("archive.zip");
/// let catalog = source.catalog()?;
///
/// let verifier = Verifier::new(VerifyConfig::default());
/// let result = verifier.verify(&catalog, &source, &mut NoopSink)?;
/// for path in &result.failures {
///     eprintln!("CRC mismatch: {path}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Verifier {
    config: VerifyConfig,
    cancel: CancellationToken,
}

enum EntryCheck {
    Match,
    Mismatch { actual: u32 },
    Cancelled,
}

impl Verifier {
    /// Creates a verifier with its own cancellation token.
    #[must_use]
    pub fn new(config: VerifyConfig) -> Self {
        Self {
            config,
            cancel: CancellationToken::new(),
        }
    }

    /// Uses `token` for cancellation instead of the verifier's own.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns a handle that cancels runs of this verifier.
    #[must_use]
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs one verification of `catalog` against `source`.
    ///
    /// The archive is opened once and closed before returning on every path.
    /// `sink` receives the event sequence described in
    /// [`events`](crate::events), always ending with one `Completed`.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::ArchiveOpen`] if the archive cannot be opened
    /// (the `Completed` event then carries an empty result), or a fatal
    /// error if the archive handle became unusable mid-run (the `Completed`
    /// event carries the partial result). Unreadable entries, and entries
    /// whose length differs from their declared size, are not errors: they
    /// are recorded as failures.
    pub fn verify<S: ArchiveSource + ?Sized>(
        &self,
        catalog: &CatalogNode,
        source: &S,
        sink: &mut dyn EventSink,
    ) -> Result<VerificationResult> {
        let started = Instant::now();
        let name = source.display_name();

        let mut archive = match source.open() {
            Ok(archive) => archive,
            Err(err) => {
                tracing::error!(archive = %name, error = %err, "unable to open archive for verification");
                sink.emit(VerifyEvent::Completed(VerificationResult::new()));
                return Err(err);
            }
        };

        let (result, abort) = self.check_entries(catalog, &mut archive, sink);

        if let Err(err) = archive.close() {
            tracing::warn!(archive = %name, error = %err, "failed to close archive");
        }

        tracing::debug!(
            archive = %name,
            passed = result.passed,
            failed = result.failed,
            cancelled = result.cancelled,
            elapsed_ms = started.elapsed().as_millis(),
            "verification finished"
        );
        sink.emit(VerifyEvent::Completed(result.clone()));

        match abort {
            Some(err) => Err(err),
            None => Ok(result),
        }
    }

    /// Like [`verify`](Self::verify), but reports a fatal error through the
    /// log and returns whatever was verified instead (an empty result if the
    /// archive never opened).
    pub fn verify_or_empty<S: ArchiveSource + ?Sized>(
        &self,
        catalog: &CatalogNode,
        source: &S,
        sink: &mut dyn EventSink,
    ) -> VerificationResult {
        let mut last = None;
        let mut recorder = LastCompleted {
            inner: sink,
            last: &mut last,
        };
        match self.verify(catalog, source, &mut recorder) {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(error = %err, "verification aborted");
                last.unwrap_or_default()
            }
        }
    }

    fn check_entries<A: OpenArchive>(
        &self,
        catalog: &CatalogNode,
        archive: &mut A,
        sink: &mut dyn EventSink,
    ) -> (VerificationResult, Option<VerifyError>) {
        let mut result = VerificationResult::new();
        let mut buffer = vec![0u8; self.config.chunk_size.max(1)];

        for (path, entry) in Walk::new(catalog, "", &self.config.parent_link_name) {
            if self.cancel.is_cancelled() {
                result.cancelled = true;
                break;
            }

            sink.emit(VerifyEvent::EntryStarted {
                path: path.clone(),
                size: entry.size,
            });

            match self.check_entry(archive, entry, &mut buffer, sink) {
                Ok(EntryCheck::Match) => {
                    tracing::debug!(entry = %path, crc32 = %format!("{:08x}", entry.crc32), "checksum ok");
                    result.record_pass();
                }
                Ok(EntryCheck::Mismatch { actual }) => {
                    tracing::debug!(
                        entry = %path,
                        stored = %format!("{:08x}", entry.crc32),
                        actual = %format!("{actual:08x}"),
                        "checksum mismatch"
                    );
                    result.record_failure(path);
                }
                Ok(EntryCheck::Cancelled) => {
                    result.cancelled = true;
                    break;
                }
                Err(err) if err.is_fatal() || !archive.is_open() => {
                    tracing::error!(entry = %path, error = %err, "archive handle lost, aborting run");
                    return (result, Some(err));
                }
                Err(err) => {
                    tracing::warn!(entry = %path, error = %err, "entry unreadable, counted as failed");
                    result.record_failure(path);
                }
            }
        }

        (result, None)
    }

    fn check_entry<A: OpenArchive>(
        &self,
        archive: &mut A,
        entry: &FileEntry,
        buffer: &mut [u8],
        sink: &mut dyn EventSink,
    ) -> Result<EntryCheck> {
        // The stream is dropped, and so closed, on every return below.
        let mut stream = archive.open_entry(entry)?;
        let mut crc = Crc32::new();

        loop {
            if self.cancel.is_cancelled() {
                return Ok(EntryCheck::Cancelled);
            }
            let count = fill_chunk(&mut stream, buffer)?;
            if count == 0 {
                break;
            }
            crc.update(&buffer[..count]);
            sink.emit(VerifyEvent::BytesRead {
                count: count as u64,
            });
        }

        if crc.bytes_processed() != entry.size {
            return Err(VerifyError::InvalidArchive(format!(
                "entry declares {} bytes but holds {}",
                entry.size,
                crc.bytes_processed()
            )));
        }

        let actual = crc.finalize();
        if actual == entry.crc32 {
            Ok(EntryCheck::Match)
        } else {
            Ok(EntryCheck::Mismatch { actual })
        }
    }
}

/// Reads until `buf` is full or the stream ends.
fn fill_chunk<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Passes events through while remembering the last `Completed` result.
struct LastCompleted<'a> {
    inner: &'a mut dyn EventSink,
    last: &'a mut Option<VerificationResult>,
}

impl EventSink for LastCompleted<'_> {
    fn emit(&mut self, event: VerifyEvent) {
        if let VerifyEvent::Completed(result) = &event {
            *self.last = Some(result.clone());
        }
        self.inner.emit(event);
    }
}
