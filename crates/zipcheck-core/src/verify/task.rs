//! Running verification on a dedicated background thread.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::thread::JoinHandle;

use crate::Result;
use crate::VerificationResult;
use crate::VerifyConfig;
use crate::VerifyError;
use crate::catalog::CatalogNode;
use crate::events::EventSink;
use crate::events::VerifyEvent;
use crate::formats::ArchiveSource;

use super::cancel::CancellationToken;
use super::engine::Verifier;

const THREAD_NAME: &str = "zipcheck-verify";

/// Handle to a verification run executing in the background.
///
/// The caller is never blocked by the run itself; it observes progress
/// through the event channel and collects the outcome with
/// [`join`](Self::join).
#[derive(Debug)]
pub struct VerificationTask {
    handle: JoinHandle<Result<VerificationResult>>,
    cancel: CancellationToken,
}

impl VerificationTask {
    /// Returns a token that cancels this run.
    #[must_use]
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Requests cooperative cancellation.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns `true` once the background thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the run and returns its outcome.
    ///
    /// # Errors
    ///
    /// Returns the run's fatal error, or [`VerifyError::TaskPanicked`] if the
    /// background thread panicked.
    pub fn join(self) -> Result<VerificationResult> {
        self.handle
            .join()
            .unwrap_or(Err(VerifyError::TaskPanicked))
    }

    /// Waits for the run, logging a fatal error and returning an empty
    /// result in its place.
    pub fn join_or_empty(self) -> VerificationResult {
        self.join().unwrap_or_else(|err| {
            tracing::error!(error = %err, "verification run aborted");
            VerificationResult::new()
        })
    }
}

/// Starts verifying `catalog` against `source` on a background thread.
///
/// Returns the task handle and the receiving end of the run's event channel.
/// The channel is unbounded so the run never waits on a slow observer.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use zipcheck_core::events::VerifyEvent;
/// use zipcheck_core::{VerifyConfig, ZipSource, spawn_verification};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = ZipSource::new("archive.zip");
/// let catalog = Arc::new(source.catalog()?);
///
/// let (task, events) = spawn_verification(catalog, source, VerifyConfig::default())?;
/// for event in events {
///     if let VerifyEvent::EntryStarted { path, .. } = event {
///         println!("checking {path}");
///     }
/// }
/// let result = task.join()?;
/// println!("{} failed", result.failed);
/// # Ok(())
/// # }
/// ```
pub fn spawn_verification<S>(
    catalog: Arc<CatalogNode>,
    source: S,
    config: VerifyConfig,
) -> Result<(VerificationTask, mpsc::Receiver<VerifyEvent>)>
where
    S: ArchiveSource + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let task = spawn_verification_with_sink(catalog, source, config, tx)?;
    Ok((task, rx))
}

/// Starts a background run that reports to an arbitrary sink, such as an
/// [`EventBroadcaster`](crate::events::EventBroadcaster).
pub fn spawn_verification_with_sink<S, K>(
    catalog: Arc<CatalogNode>,
    source: S,
    config: VerifyConfig,
    mut sink: K,
) -> Result<VerificationTask>
where
    S: ArchiveSource + Send + 'static,
    K: EventSink + 'static,
{
    let verifier = Verifier::new(config);
    let cancel = verifier.cancel_handle();

    let handle = thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || verifier.verify(&catalog, &source, &mut sink))?;

    Ok(VerificationTask { handle, cancel })
}
