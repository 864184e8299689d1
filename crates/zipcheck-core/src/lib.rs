//! Background CRC-32 integrity verification of ZIP archives.
//!
//! `zipcheck-core` walks an in-memory catalog of archive entries, streams
//! each file entry's decompressed bytes through a CRC-32 accumulator,
//! compares the result with the checksum stored in the archive and reports
//! which entries fail. Runs can execute on a background thread and report
//! fine-grained progress through an event channel.
//!
//! # Examples
//!
//! ```no_run
//! use zipcheck_core::VerifyConfig;
//! use zipcheck_core::verify_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let result = verify_archive("archive.zip", &VerifyConfig::default())?;
//! for path in &result.failures {
//!     eprintln!("corrupted: {path}");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod catalog;
pub mod checksum;
pub mod config;
pub mod error;
pub mod events;
pub mod formats;
pub mod report;
#[doc(hidden)]
pub mod test_utils;
pub mod verify;

// Re-export main API types
pub use api::BackgroundVerification;
pub use api::spawn_archive_verification;
pub use api::verify_archive;
pub use catalog::CatalogNode;
pub use catalog::CatalogStats;
pub use config::VerifyConfig;
pub use error::Result;
pub use error::VerifyError;
pub use events::EventSink;
pub use events::VerifyEvent;
pub use formats::ArchiveSource;
pub use formats::OpenArchive;
pub use formats::ZipSource;
pub use report::VerificationResult;
pub use verify::CancellationToken;
pub use verify::VerificationTask;
pub use verify::Verifier;
pub use verify::spawn_verification;
