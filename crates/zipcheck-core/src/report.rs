//! Verification run reporting.

/// Outcome of one verification run.
///
/// Produced once per run and immutable afterwards. A checksum mismatch is
/// recorded here, never raised as an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationResult {
    /// Catalog paths of entries whose checksum did not match, in the order
    /// they were checked.
    pub failures: Vec<String>,

    /// Number of entries whose checksum matched.
    pub passed: usize,

    /// Number of entries that failed, equal to `failures.len()`.
    pub failed: usize,

    /// Whether the run stopped early on a cancellation request.
    pub cancelled: bool,
}

impl VerificationResult {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entry whose checksum matched.
    pub fn record_pass(&mut self) {
        self.passed += 1;
    }

    /// Records a failed entry.
    pub fn record_failure(&mut self, path: impl Into<String>) {
        self.failed += 1;
        self.failures.push(path.into());
    }

    /// Returns total number of entries checked.
    #[must_use]
    pub fn total_checked(&self) -> usize {
        self.passed + self.failed
    }

    /// Returns `true` if no entry failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
