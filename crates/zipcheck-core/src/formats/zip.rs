//! ZIP container reader.

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::VerifyError;
use crate::catalog::CatalogBuilder;
use crate::catalog::CatalogNode;
use crate::catalog::EntryHandle;
use crate::catalog::FileEntry;
use crate::config::DEFAULT_PARENT_LINK_NAME;

use super::traits::ArchiveSource;
use super::traits::OpenArchive;

type ZipReader = zip::ZipArchive<BufReader<File>>;

/// A ZIP archive on disk.
///
/// # Examples
///
/// ```no_run
/// use zipcheck_core::ZipSource;
/// use zipcheck_core::catalog::CatalogStats;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = ZipSource::new("archive.zip");
/// let catalog = source.catalog()?;
/// println!("{} files", CatalogStats::collect(&catalog).files);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ZipSource {
    path: PathBuf,
}

impl ZipSource {
    /// Creates a source for the archive at `path`. Nothing is opened yet.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the archive path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the central directory into a catalog with `".."` parent links.
    pub fn catalog(&self) -> Result<CatalogNode> {
        self.catalog_with(DEFAULT_PARENT_LINK_NAME)
    }

    /// Reads the central directory into a catalog, naming parent links
    /// `parent_link`.
    pub fn catalog_with(&self, parent_link: &str) -> Result<CatalogNode> {
        let mut archive = open_zip(&self.path)?;
        build_catalog(&mut archive, parent_link)
    }
}

impl ArchiveSource for ZipSource {
    type Archive = ZipHandle;

    fn open(&self) -> Result<ZipHandle> {
        let archive = open_zip(&self.path)?;
        tracing::info!(archive = %self.path.display(), entries = archive.len(), "opened zip archive");
        Ok(ZipHandle {
            path: self.path.clone(),
            archive: Some(archive),
        })
    }

    fn display_name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Open ZIP archive.
#[derive(Debug)]
pub struct ZipHandle {
    path: PathBuf,
    archive: Option<ZipReader>,
}

impl OpenArchive for ZipHandle {
    fn open_entry(&mut self, entry: &FileEntry) -> Result<Box<dyn Read + '_>> {
        let archive = self.archive.as_mut().ok_or(VerifyError::ArchiveClosed)?;
        let index = entry.handle.index();
        if index >= archive.len() {
            return Err(VerifyError::EntryNotFound { index });
        }
        let file = archive.by_index(index)?;
        Ok(Box::new(file))
    }

    fn is_open(&self) -> bool {
        self.archive.is_some()
    }

    fn close(&mut self) -> Result<()> {
        if self.archive.take().is_some() {
            tracing::info!(archive = %self.path.display(), "closed zip archive");
        }
        Ok(())
    }

    fn format_name(&self) -> &str {
        "zip"
    }
}

fn open_zip(path: &Path) -> Result<ZipReader> {
    // A file opened before a failed parse is dropped, and so closed, here.
    let file = File::open(path).map_err(|e| VerifyError::archive_open(path, e))?;
    zip::ZipArchive::new(BufReader::new(file)).map_err(|e| VerifyError::archive_open(path, e))
}

/// Builds a catalog from the central directory of `archive`.
///
/// Every path component becomes a [`Directory`](crate::catalog::Directory);
/// each non-root directory receives a parent-link child keyed `parent_link`.
/// No file entry is ever left out: names that cannot be nested are kept at
/// the root, as described on [`CatalogBuilder`].
pub fn build_catalog<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    parent_link: &str,
) -> Result<CatalogNode> {
    let mut builder = CatalogBuilder::new(parent_link);

    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        if entry.is_dir() {
            builder.add_directory(entry.name());
        } else {
            builder.add_file(
                entry.name(),
                entry.size(),
                entry.crc32(),
                EntryHandle::new(index),
            );
        }
    }

    Ok(builder.finish())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::walk;
    use crate::checksum::crc32;
    use crate::test_utils::create_test_zip;
    use std::io::Cursor;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn catalog_of(bytes: Vec<u8>) -> CatalogNode {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        build_catalog(&mut archive, "..").unwrap()
    }

    #[test]
    fn test_build_catalog_nests_directories() {
        let catalog = catalog_of(create_test_zip(vec![
            ("a", b"1"),
            ("dir1/b", b"22"),
            ("dir1/dir2/c", b"333"),
        ]));

        let mut files: Vec<(String, u64, u32)> = walk(&catalog, "")
            .map(|(path, f)| (path, f.size, f.crc32))
            .collect();
        files.sort();
        assert_eq!(
            files,
            vec![
                ("a".to_string(), 1, crc32(b"1")),
                ("dir1/b".to_string(), 2, crc32(b"22")),
                ("dir1/dir2/c".to_string(), 3, crc32(b"333")),
            ]
        );

        let CatalogNode::Directory(root) = &catalog else {
            panic!("root must be a directory");
        };
        assert!(!root.children.contains_key(".."));
        let Some(CatalogNode::Directory(dir1)) = root.children.get("dir1") else {
            panic!("dir1 missing");
        };
        assert_eq!(dir1.children.get(".."), Some(&CatalogNode::ParentLink));
    }

    fn walked(catalog: &CatalogNode) -> Vec<String> {
        let mut paths: Vec<String> = walk(catalog, "").map(|(p, _)| p).collect();
        paths.sort();
        paths
    }

    #[test]
    fn test_build_catalog_keeps_file_shadowed_by_directory() {
        let catalog = catalog_of(create_test_zip(vec![("a", b"file"), ("a/b", b"nested")]));
        assert_eq!(walked(&catalog), ["a", "a/b"]);

        let catalog = catalog_of(create_test_zip(vec![("a/b", b"nested"), ("a", b"file")]));
        assert_eq!(walked(&catalog), ["a#1", "a/b"]);
    }

    #[test]
    fn test_build_catalog_keeps_parent_components() {
        let catalog = catalog_of(create_test_zip(vec![
            ("ok.txt", b"x"),
            ("../evil", b"y"),
            ("x/../evil", b"z"),
        ]));
        assert_eq!(walked(&catalog), ["../evil", "ok.txt", "x/../evil"]);

        let CatalogNode::Directory(root) = &catalog else {
            panic!("root must be a directory");
        };
        assert!(!root.children.contains_key(".."));
    }

    #[test]
    fn test_build_catalog_directory_entry_does_not_replace_file() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        zip.start_file("a", options).unwrap();
        zip.write_all(b"file").unwrap();
        zip.add_directory("a/", options).unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let catalog = catalog_of(bytes);
        let entries: Vec<(String, u32)> = walk(&catalog, "").map(|(p, f)| (p, f.crc32)).collect();
        assert_eq!(entries, [("a".to_string(), crc32(b"file"))]);
    }

    #[test]
    fn test_handle_reads_and_closes() {
        let mut temp = NamedTempFile::with_suffix(".zip").unwrap();
        temp.write_all(&create_test_zip(vec![("hello.txt", b"hello")]))
            .unwrap();
        temp.flush().unwrap();

        let source = ZipSource::new(temp.path());
        let catalog = source.catalog().unwrap();
        let (_, entry) = walk(&catalog, "").next().unwrap();
        let entry = entry.clone();

        let mut handle = source.open().unwrap();
        assert!(handle.is_open());
        let mut content = String::new();
        handle
            .open_entry(&entry)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "hello");

        handle.close().unwrap();
        assert!(!handle.is_open());
        assert!(matches!(
            handle.open_entry(&entry),
            Err(VerifyError::ArchiveClosed)
        ));
        // Closing twice is harmless.
        assert!(handle.close().is_ok());
    }

    #[test]
    fn test_open_missing_archive() {
        let source = ZipSource::new("/nonexistent/zipcheck/archive.zip");
        let err = source.open().unwrap_err();
        assert!(matches!(err, VerifyError::ArchiveOpen { .. }));
    }

    #[test]
    fn test_open_garbage_archive() {
        let mut temp = NamedTempFile::with_suffix(".zip").unwrap();
        temp.write_all(b"this is not a zip file").unwrap();
        temp.flush().unwrap();

        let err = ZipSource::new(temp.path()).catalog().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_unknown_index_is_entry_local() {
        let mut temp = NamedTempFile::with_suffix(".zip").unwrap();
        temp.write_all(&create_test_zip(vec![("a", b"a")])).unwrap();
        temp.flush().unwrap();

        let mut handle = ZipSource::new(temp.path()).open().unwrap();
        let bogus = FileEntry::new("ghost", 0, 0, EntryHandle::new(42));
        let err = handle.open_entry(&bogus).err().unwrap();
        assert!(matches!(err, VerifyError::EntryNotFound { index: 42 }));
        assert!(err.is_entry_local());
    }
}
