//! Live filesystem adapter using `std::fs` and `walkdir`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ports::filesystem::{FileSystem, SkipFn};
use crate::ports::PortError;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(std::fs::write(path, contents)?)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn try_exists(&self, path: &Path) -> Result<bool, PortError> {
        Ok(path.try_exists()?)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        Ok(std::fs::create_dir_all(path)?)
    }

    fn walk_files(&self, root: &Path, skip: SkipFn<'_>) -> Result<Vec<PathBuf>, PortError> {
        let walker = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !skip(entry.path(), entry.file_type().is_dir()));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            // Symlinks are not followed and count as files.
            if !entry.file_type().is_dir() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}
