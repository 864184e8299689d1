//! Verify command implementation

use crate::cli::VerifyArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::output::VerifySummary;
use crate::progress::VerifyProgress;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Instant;
use zipcheck_core::VerifyConfig;
use zipcheck_core::spawn_archive_verification;

pub fn execute(
    args: &VerifyArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let mut config = VerifyConfig::default();
    if let Some(size) = args.chunk_size {
        let size = usize::try_from(size).context("chunk size does not fit in memory")?;
        config = config.with_chunk_size(size);
    }

    let started = Instant::now();
    let run = add_archive_context(
        spawn_archive_verification(&args.archive, &config),
        &args.archive,
    )?;

    if run.stats.files == 0 {
        formatter.format_warning("archive contains no files to verify");
    }

    let mut progress =
        (show_progress && VerifyProgress::should_show()).then(|| VerifyProgress::new(&run.stats));
    let mut deadline = args.timeout.and_then(|limit| started.checked_add(limit));
    loop {
        let event = if let Some(at) = deadline {
            match run.events.recv_timeout(at.saturating_duration_since(Instant::now())) {
                Ok(event) => event,
                Err(RecvTimeoutError::Timeout) => {
                    tracing::warn!(archive = %args.archive.display(), "timeout reached, cancelling verification");
                    run.task.cancel();
                    deadline = None;
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else if let Ok(event) = run.events.recv() {
            event
        } else {
            break;
        };
        if let Some(bar) = progress.as_mut() {
            bar.observe(&event);
        }
    }
    drop(progress);

    let result = add_archive_context(run.task.join(), &args.archive)?;

    formatter.format_verification(&VerifySummary {
        archive: &args.archive,
        stats: run.stats,
        result: &result,
        duration: started.elapsed(),
    })?;

    if result.cancelled {
        bail!(
            "Verification of '{}' did not finish within the timeout",
            args.archive.display()
        );
    }
    if !result.is_clean() {
        bail!(
            "{} of {} entries failed CRC-32 verification",
            result.failed,
            result.total_checked()
        );
    }

    Ok(())
}
