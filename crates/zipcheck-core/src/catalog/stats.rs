//! Catalog statistics pre-pass.

use super::node::CatalogNode;
use super::walk::Walk;

/// Totals over a catalog, computed before a run starts.
///
/// Presentation layers use these to size progress displays; the
/// verification engine never reads them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Number of file entries.
    pub files: usize,
    /// Sum of declared uncompressed sizes in bytes.
    pub total_size: u64,
    /// Number of directories below the starting node.
    pub directories: usize,
}

impl CatalogStats {
    /// Collects statistics with the default parent-link name.
    #[must_use]
    pub fn collect(node: &CatalogNode) -> Self {
        Self::collect_with(node, crate::config::DEFAULT_PARENT_LINK_NAME)
    }

    /// Collects statistics, skipping children keyed `parent_link`.
    #[must_use]
    pub fn collect_with(node: &CatalogNode, parent_link: &str) -> Self {
        let mut stats = Self {
            directories: count_directories(node, parent_link),
            ..Self::default()
        };
        for (_, file) in Walk::new(node, "", parent_link) {
            stats.files += 1;
            stats.total_size = stats.total_size.saturating_add(file.size);
        }
        stats
    }
}

fn count_directories(node: &CatalogNode, parent_link: &str) -> usize {
    let CatalogNode::Directory(dir) = node else {
        return 0;
    };
    dir.children
        .iter()
        .filter(|(key, _)| key.as_str() != parent_link)
        .map(|(_, child)| match child {
            CatalogNode::Directory(_) => 1 + count_directories(child, parent_link),
            CatalogNode::File(_) | CatalogNode::ParentLink => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::node::Directory;
    use crate::catalog::node::EntryHandle;
    use crate::catalog::node::FileEntry;

    #[test]
    fn test_collect_nested() {
        let root = Directory::new("")
            .with_file(FileEntry::new("a", 10, 0, EntryHandle::new(0)))
            .with_dir(
                Directory::new("d")
                    .with_file(FileEntry::new("b", 5, 0, EntryHandle::new(1)))
                    .with_dir(Directory::new("empty").with_parent_link(".."))
                    .with_parent_link(".."),
            );
        let stats = CatalogStats::collect(&CatalogNode::Directory(root));

        assert_eq!(stats.files, 2);
        assert_eq!(stats.total_size, 15);
        assert_eq!(stats.directories, 2);
    }

    #[test]
    fn test_collect_single_file() {
        let node = CatalogNode::File(FileEntry::new("x", 7, 0, EntryHandle::new(0)));
        assert_eq!(
            CatalogStats::collect(&node),
            CatalogStats {
                files: 1,
                total_size: 7,
                directories: 0
            }
        );
    }
}
