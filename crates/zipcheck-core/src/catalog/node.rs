//! Catalog node types.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Opaque capability to open one entry's decompressed stream.
///
/// A handle is only meaningful to the [`OpenArchive`](crate::OpenArchive)
/// that produced the catalog it lives in, and only while that archive is
/// open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle(usize);

impl EntryHandle {
    /// Creates a handle for the entry at `index` in its archive.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the entry inside its archive.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A file leaf of the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Last path component of the entry.
    pub name: String,
    /// Declared uncompressed size in bytes.
    pub size: u64,
    /// CRC-32 stored in the archive metadata.
    pub crc32: u32,
    /// Handle used to open the entry's stream.
    pub handle: EntryHandle,
}

impl FileEntry {
    /// Creates a file entry.
    #[must_use]
    pub fn new(name: impl Into<String>, size: u64, crc32: u32, handle: EntryHandle) -> Self {
        Self {
            name: name.into(),
            size,
            crc32,
            handle,
        }
    }
}

/// A named group of child nodes.
///
/// Child order is irrelevant to verification; a `BTreeMap` keeps listings
/// stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    /// Last path component of the directory (empty for the root).
    pub name: String,
    /// Children keyed by name.
    pub children: BTreeMap<String, CatalogNode>,
}

impl Directory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: BTreeMap::new(),
        }
    }

    /// Adds `node` under its own name, replacing any previous child.
    pub fn insert(&mut self, node: CatalogNode) {
        let name = node.name().to_string();
        self.children.insert(name, node);
    }

    /// Adds `node` under an explicit key.
    pub fn insert_as(&mut self, key: impl Into<String>, node: CatalogNode) {
        self.children.insert(key.into(), node);
    }

    /// Adds a file child, returning `self` for chaining.
    #[must_use]
    pub fn with_file(mut self, file: FileEntry) -> Self {
        self.insert(CatalogNode::File(file));
        self
    }

    /// Adds a directory child, returning `self` for chaining.
    #[must_use]
    pub fn with_dir(mut self, dir: Self) -> Self {
        self.insert(CatalogNode::Directory(dir));
        self
    }

    /// Adds a parent-link child under `key`, returning `self` for chaining.
    #[must_use]
    pub fn with_parent_link(mut self, key: impl Into<String>) -> Self {
        self.insert_as(key, CatalogNode::ParentLink);
        self
    }

    /// Adds `node` under its own name unless that name is taken.
    ///
    /// # Errors
    ///
    /// Hands `node` back if a child with the same name already exists.
    pub fn try_insert(&mut self, node: CatalogNode) -> Result<(), CatalogNode> {
        match self.children.entry(node.name().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(node);
                Ok(())
            }
            Entry::Occupied(_) => Err(node),
        }
    }

    /// Returns the child directory `name`, creating it if absent.
    ///
    /// Returns `None` if a file or parent link already uses the name; it is
    /// never replaced.
    pub fn dir_mut(&mut self, name: &str) -> Option<&mut Self> {
        let slot = self
            .children
            .entry(name.to_string())
            .or_insert_with(|| CatalogNode::Directory(Self::new(name)));
        match slot {
            CatalogNode::Directory(dir) => Some(dir),
            CatalogNode::File(_) | CatalogNode::ParentLink => None,
        }
    }

    /// Walks down `components`, creating missing directories, and returns
    /// the last one.
    ///
    /// Every directory on the way gets a parent-link child keyed
    /// `parent_link`. Returns `None` if a component is already taken by a
    /// non-directory child.
    pub fn subdir_mut(&mut self, components: &[&str], parent_link: &str) -> Option<&mut Self> {
        let mut dir = self;
        for component in components {
            dir = dir.dir_mut(component)?;
            dir.children
                .entry(parent_link.to_string())
                .or_insert(CatalogNode::ParentLink);
        }
        Some(dir)
    }
}

/// Node of the entry catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogNode {
    /// A directory with children.
    Directory(Directory),
    /// A file entry.
    File(FileEntry),
    /// Back-reference to the enclosing directory. Never traversed.
    ParentLink,
}

impl CatalogNode {
    /// Name of the node; parent links have none.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Directory(dir) => &dir.name,
            Self::File(file) => &file.name,
            Self::ParentLink => "",
        }
    }

    /// Returns `true` for file leaves.
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

impl From<FileEntry> for CatalogNode {
    fn from(file: FileEntry) -> Self {
        Self::File(file)
    }
}

impl From<Directory> for CatalogNode {
    fn from(dir: Directory) -> Self {
        Self::Directory(dir)
    }
}
