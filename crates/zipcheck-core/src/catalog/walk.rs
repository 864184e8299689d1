//! Lazy depth-first traversal over catalog file entries.

use super::node::CatalogNode;
use super::node::FileEntry;
use crate::config::DEFAULT_PARENT_LINK_NAME;

/// Iterator over `(path, file)` pairs of a catalog.
///
/// Each file entry is yielded exactly once. Parent links, whether given as
/// [`CatalogNode::ParentLink`] or as a child keyed by the reserved name, are
/// never descended into. Paths are `/`-joined child keys below the walk's
/// prefix; the name of the starting directory itself is not part of them.
///
/// # Examples
///
/// ```
/// use zipcheck_core::catalog::{walk, CatalogNode, Directory, EntryHandle, FileEntry};
///
/// let root = Directory::new("")
///     .with_file(FileEntry::new("a", 1, 0, EntryHandle::new(0)))
///     .with_dir(
///         Directory::new("dir1")
///             .with_file(FileEntry::new("b", 1, 0, EntryHandle::new(1)))
///             .with_parent_link(".."),
///     );
/// let root = CatalogNode::Directory(root);
///
/// let paths: Vec<String> = walk(&root, "").map(|(path, _)| path).collect();
/// assert_eq!(paths, ["a", "dir1/b"]);
/// ```
#[derive(Debug)]
pub struct Walk<'a> {
    stack: Vec<(String, &'a CatalogNode)>,
    parent_link: &'a str,
}

impl<'a> Walk<'a> {
    /// Starts a walk at `node` with the reserved parent-link name
    /// `parent_link`.
    #[must_use]
    pub fn new(node: &'a CatalogNode, prefix: &str, parent_link: &'a str) -> Self {
        let start = match node {
            CatalogNode::File(file) => join(prefix, &file.name),
            CatalogNode::Directory(_) | CatalogNode::ParentLink => prefix.to_string(),
        };
        Self {
            stack: vec![(start, node)],
            parent_link,
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (String, &'a FileEntry);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((path, node)) = self.stack.pop() {
            match node {
                CatalogNode::File(file) => return Some((path, file)),
                CatalogNode::Directory(dir) => {
                    // Reverse so entries come out in key order.
                    for (key, child) in dir.children.iter().rev() {
                        if key == self.parent_link || matches!(child, CatalogNode::ParentLink) {
                            continue;
                        }
                        self.stack.push((join(&path, key), child));
                    }
                }
                CatalogNode::ParentLink => {}
            }
        }
        None
    }
}

/// Walks `node` with the default `".."` parent-link name.
#[must_use]
pub fn walk<'a>(node: &'a CatalogNode, prefix: &str) -> Walk<'a> {
    Walk::new(node, prefix, DEFAULT_PARENT_LINK_NAME)
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{name}", prefix.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::node::Directory;
    use crate::catalog::node::EntryHandle;

    fn file(name: &str, index: usize) -> FileEntry {
        FileEntry::new(name, 0, 0, EntryHandle::new(index))
    }

    fn paths(node: &CatalogNode, prefix: &str) -> Vec<String> {
        walk(node, prefix).map(|(path, _)| path).collect()
    }

    #[test]
    fn test_nested_catalog_skips_parent_link() {
        let dir2 = Directory::new("dir2")
            .with_file(file("c", 2))
            .with_parent_link("..");
        let dir1 = Directory::new("dir1")
            .with_file(file("b", 1))
            .with_dir(dir2)
            .with_parent_link("..");
        let root = CatalogNode::Directory(Directory::new("").with_file(file("a", 0)).with_dir(dir1));

        let mut visited = paths(&root, "");
        visited.sort();
        assert_eq!(visited, ["a", "dir1/b", "dir1/dir2/c"]);
        assert!(!visited.iter().any(|p| p.contains("..")));
    }

    #[test]
    fn test_reserved_key_skipped_even_if_directory() {
        // A directory stored under the reserved key would loop forever if
        // followed.
        let mut root = Directory::new("");
        root.insert_as("..", CatalogNode::Directory(Directory::new("").with_file(file("x", 0))));
        root.insert(file("y", 1).into());

        assert_eq!(paths(&CatalogNode::Directory(root), ""), ["y"]);
    }

    #[test]
    fn test_directories_only_yields_nothing() {
        let root = Directory::new("")
            .with_dir(Directory::new("a").with_dir(Directory::new("b")))
            .with_dir(Directory::new("c").with_parent_link(".."));
        assert!(paths(&CatalogNode::Directory(root), "").is_empty());
    }

    #[test]
    fn test_single_file_root() {
        let root = CatalogNode::File(file("only.txt", 0));
        assert_eq!(paths(&root, ""), ["only.txt"]);
        assert_eq!(paths(&root, "base/"), ["base/only.txt"]);
    }

    #[test]
    fn test_prefix_is_prepended() {
        let root = CatalogNode::Directory(Directory::new("ignored").with_file(file("a", 0)));
        assert_eq!(paths(&root, "top"), ["top/a"]);
    }

    #[test]
    fn test_custom_parent_link_name() {
        let root = CatalogNode::Directory(
            Directory::new("")
                .with_file(file("a", 0))
                .with_dir(Directory::new("^").with_file(file("b", 1))),
        );
        let visited: Vec<String> = Walk::new(&root, "", "^").map(|(p, _)| p).collect();
        assert_eq!(visited, ["a"]);
    }
}
