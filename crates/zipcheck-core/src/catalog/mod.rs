//! In-memory catalog of archive contents.
//!
//! A catalog is a tree of [`CatalogNode`]s: directories hold named children,
//! files carry their declared size, stored CRC-32 and an [`EntryHandle`]
//! for opening their decompressed stream. Catalogs are built once by a
//! container reader and are read-only afterwards, so they can be shared
//! across runs behind an `Arc`.

pub mod builder;
pub mod node;
pub mod stats;
pub mod walk;

pub use builder::CatalogBuilder;
pub use node::CatalogNode;
pub use node::Directory;
pub use node::EntryHandle;
pub use node::FileEntry;
pub use stats::CatalogStats;
pub use walk::Walk;
pub use walk::walk;
