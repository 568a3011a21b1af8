//! Filesystem port for plan reads, tree walks and guard-state writes.

use std::path::{Path, PathBuf};

use super::PortError;

/// Predicate consulted for every entry during [`FileSystem::walk_files`].
///
/// Receives the absolute entry path and whether it is a directory. Returning
/// `true` skips the entry; a skipped directory is never descended into.
pub type SkipFn<'a> = &'a dyn Fn(&Path, bool) -> bool;

/// Provides filesystem access for the guard.
///
/// Abstracting the filesystem lets the whole run be exercised against an
/// in-memory tree without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String, PortError>;

    /// Writes the given contents to a file, creating or overwriting it.
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError>;

    /// Returns `true` if anything (file or directory) exists at the path.
    ///
    /// Inaccessible paths read as absent. Use [`FileSystem::try_exists`]
    /// where that distinction matters.
    fn exists(&self, path: &Path) -> bool;

    /// Like [`FileSystem::exists`], but fails when the answer cannot be
    /// determined (for example, a parent directory cannot be read).
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be confirmed or denied.
    fn try_exists(&self, path: &Path) -> Result<bool, PortError>;

    /// Creates a directory and all of its missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns an error if any component cannot be created.
    fn create_dir_all(&self, path: &Path) -> Result<(), PortError>;

    /// Recursively lists every non-directory entry below `root`.
    ///
    /// Entries for which `skip` returns `true` are left out, and skipped
    /// directories are pruned. The result is sorted.
    ///
    /// # Errors
    ///
    /// Returns an error as soon as any directory below `root` cannot be read.
    /// Partial listings are never returned.
    fn walk_files(&self, root: &Path, skip: SkipFn<'_>) -> Result<Vec<PathBuf>, PortError>;
}
