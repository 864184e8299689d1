//! Building a catalog from flat archive entry names.

use std::collections::BTreeSet;

use super::node::CatalogNode;
use super::node::Directory;
use super::node::EntryHandle;
use super::node::FileEntry;

/// Assembles a catalog from the flat, slash-separated names a container
/// stores.
///
/// Every file added ends up in the catalog exactly once. A file that cannot
/// sit at its natural position is placed at the root under its raw name, or
/// under `"{raw}#{index}"` if that is taken too:
///
/// - a component equals the parent-link key;
/// - a parent component is already a file;
/// - the name itself is already taken (duplicates, or a directory);
/// - the name has no usable component at all.
///
/// # Examples
///
/// ```
/// use zipcheck_core::catalog::{CatalogBuilder, EntryHandle, walk};
///
/// let mut builder = CatalogBuilder::new("..");
/// builder.add_file("a", 1, 0, EntryHandle::new(0));
/// builder.add_file("a/b", 1, 0, EntryHandle::new(1));
/// let catalog = builder.finish();
///
/// let paths: Vec<String> = walk(&catalog, "").map(|(path, _)| path).collect();
/// assert_eq!(paths, ["a", "a/b"]);
/// ```
#[derive(Debug)]
pub struct CatalogBuilder {
    root: Directory,
    parent_link: String,
    paths: BTreeSet<String>,
}

impl CatalogBuilder {
    /// Starts an empty catalog whose parent links are keyed `parent_link`.
    pub fn new(parent_link: impl Into<String>) -> Self {
        Self {
            root: Directory::new(""),
            parent_link: parent_link.into(),
            paths: BTreeSet::new(),
        }
    }

    /// Adds the directories of `name`.
    ///
    /// Directories carry no data, so one that clashes with a file or the
    /// parent-link key is left out.
    pub fn add_directory(&mut self, name: &str) {
        let components = split(name);
        if components.iter().any(|c| *c == self.parent_link)
            || self.root.subdir_mut(&components, &self.parent_link).is_none()
        {
            tracing::debug!(entry = %name, "directory entry clashes with a file, ignored");
        }
    }

    /// Adds a file and returns the path it will be walked under.
    pub fn add_file(&mut self, name: &str, size: u64, crc32: u32, handle: EntryHandle) -> String {
        let components = split(name);
        if let Some(path) = self.place(&components, size, crc32, handle) {
            self.paths.insert(path.clone());
            return path;
        }

        let key = self.free_root_key(name, handle);
        tracing::warn!(entry = %name, key = %key, "entry name cannot be nested, verifying it at the root");
        self.root
            .insert(FileEntry::new(key.clone(), size, crc32, handle).into());
        self.paths.insert(key.clone());
        key
    }

    /// Returns the finished catalog.
    #[must_use]
    pub fn finish(self) -> CatalogNode {
        CatalogNode::Directory(self.root)
    }

    fn place(
        &mut self,
        components: &[&str],
        size: u64,
        crc32: u32,
        handle: EntryHandle,
    ) -> Option<String> {
        if components.iter().any(|c| *c == self.parent_link) {
            return None;
        }
        let (last, parents) = components.split_last()?;
        let dir = self.root.subdir_mut(parents, &self.parent_link)?;
        dir.try_insert(FileEntry::new(*last, size, crc32, handle).into())
            .ok()?;
        Some(components.join("/"))
    }

    fn free_root_key(&self, name: &str, handle: EntryHandle) -> String {
        let taken = |key: &str| {
            key.is_empty()
                || key == self.parent_link
                || self.paths.contains(key)
                || self.root.children.contains_key(key)
        };
        if !taken(name) {
            return name.to_string();
        }
        let mut suffix = handle.index();
        loop {
            let key = format!("{name}#{suffix}");
            if !taken(&key) {
                return key;
            }
            suffix += 1;
        }
    }
}

fn split(name: &str) -> Vec<&str> {
    name.split(['/', '\\'])
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}
