//! CRC-32 verification of catalog entries.
//!
//! [`Verifier`] runs the check synchronously on the calling thread;
//! [`spawn_verification`] runs it on a dedicated background thread and hands
//! back an event channel plus a [`VerificationTask`] to collect the outcome.

pub mod cancel;
pub mod engine;
pub mod task;

pub use cancel::CancellationToken;
pub use engine::Verifier;
pub use task::VerificationTask;
pub use task::spawn_verification;
pub use task::spawn_verification_with_sink;
