//! Filesystem capability used by the directory walk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What a directory entry turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    /// Sockets, fifos and anything else that is neither.
    Other,
}

/// Read-only view of a directory tree.
///
/// Implementations must fail, not return an empty listing, when `path` does
/// not exist.
pub trait Filesystem {
    /// Full paths of the entries in `dir`, in the order the implementation
    /// produces them.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Classify `path`, following symlinks.
    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Identity of a directory, used to notice symlink cycles. Trees without
    /// links can use the path itself.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        Ok(path.to_path_buf())
    }
}

/// [`Filesystem`] backed by `std::fs`.
///
/// Listing order is whatever the operating system returns; it is not sorted.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn entry_kind(&self, path: &Path) -> io::Result<EntryKind> {
        let metadata = fs::metadata(path)?;
        Ok(if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        })
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}
