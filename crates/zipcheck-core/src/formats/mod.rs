//! Archive container readers.

pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use traits::ArchiveSource;
pub use traits::OpenArchive;
pub use self::zip::ZipHandle;
pub use self::zip::ZipSource;
