/// Directory listing — the one place the walker touches the filesystem.
///
/// The walker only needs `name / is_dir / size` per entry, so listing is a
/// trait: the bundled [`FsLister`] reads the real filesystem, tests plug in
/// in-memory trees or listers that stall on purpose.
use crate::error::ListError;
use compact_str::CompactString;
use std::fs;
use std::path::Path;

/// One child of a listed directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    /// File or directory name only (not the full path).
    pub name: CompactString,
    pub is_dir: bool,
    /// Logical size in bytes. Ignored for directories.
    pub size: u64,
}

impl DirEntry {
    pub fn file(name: impl Into<CompactString>, size: u64) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
            size,
        }
    }

    pub fn dir(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
            size: 0,
        }
    }
}

/// Lists the immediate children of a directory.
///
/// Called concurrently from many worker threads, at most
/// `concurrency_limit` at a time.
pub trait DirLister: Send + Sync {
    fn list(&self, path: &Path) -> Result<Vec<DirEntry>, ListError>;
}

/// Lists directories on the local filesystem.
///
/// Symlinks are not followed: a link is reported as a non-directory entry
/// with the size of the link itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLister;

impl DirLister for FsLister {
    fn list(&self, path: &Path) -> Result<Vec<DirEntry>, ListError> {
        let read_dir = fs::read_dir(path).map_err(|source| ListError::ReadDir {
            path: path.to_path_buf(),
            source,
        })?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| ListError::ReadDir {
                path: path.to_path_buf(),
                source,
            })?;
            // symlink_metadata rather than metadata: never follow links.
            let meta = match fs::symlink_metadata(entry.path()) {
                Ok(meta) => meta,
                // Deleted between read_dir and stat.
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(ListError::Metadata {
                        path: entry.path(),
                        source,
                    })
                }
            };
            let name = CompactString::new(entry.file_name().to_string_lossy());
            entries.push(DirEntry {
                name,
                is_dir: meta.is_dir(),
                size: if meta.is_dir() { 0 } else { meta.len() },
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_bytes(path: &Path, n: usize) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(&vec![0u8; n]).unwrap();
    }

    #[test]
    fn lists_files_and_subdirectories() {
        let tmp = tempfile::TempDir::new().unwrap();
        write_bytes(&tmp.path().join("a.bin"), 10);
        fs::create_dir(tmp.path().join("sub")).unwrap();

        let mut entries = FsLister.list(tmp.path()).unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries, vec![DirEntry::file("a.bin", 10), DirEntry::dir("sub")]);
    }

    #[test]
    fn missing_directory_is_a_read_dir_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("does-not-exist");
        let err = FsLister.list(&missing).unwrap_err();
        assert!(matches!(err, ListError::ReadDir { .. }));
        assert_eq!(err.path(), missing.as_path());
    }

    #[test]
    fn listing_a_file_fails() {
        let tmp = tempfile::TempDir::new().unwrap();
        let file = tmp.path().join("plain.txt");
        write_bytes(&file, 3);
        assert!(FsLister.list(&file).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let tmp = tempfile::TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("real"), tmp.path().join("link")).unwrap();

        let entries = FsLister.list(tmp.path()).unwrap();
        let link = entries.iter().find(|e| e.name == "link").unwrap();
        assert!(!link.is_dir);
    }
}
