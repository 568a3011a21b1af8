//! In-memory port implementations shared by unit tests.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use crate::context::ServiceContext;
use crate::ports::filesystem::{FileSystem, SkipFn};
use crate::ports::{Clock, PortError};

/// In-memory filesystem for exercising the guard without touching disk.
pub struct MemFs {
    files: Mutex<BTreeMap<PathBuf, String>>,
    dirs: Mutex<BTreeSet<PathBuf>>,
    unreadable: Mutex<BTreeSet<PathBuf>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(BTreeMap::new()),
            dirs: Mutex::new(BTreeSet::new()),
            unreadable: Mutex::new(BTreeSet::new()),
        }
    }

    /// Adds a file (and its ancestor directories).
    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        self.write(path.as_ref(), contents).unwrap();
        self
    }

    /// Adds an empty directory.
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.create_dir_all(path.as_ref()).unwrap();
        self
    }

    /// Makes any walk that reaches `path`, or any existence check beneath it,
    /// fail.
    pub fn with_unreadable(self, path: impl AsRef<Path>) -> Self {
        self.create_dir_all(path.as_ref()).unwrap();
        self.unreadable.lock().unwrap().insert(path.as_ref().to_path_buf());
        self
    }

    pub fn file_paths(&self) -> Vec<PathBuf> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        let files = self.files.lock().unwrap();
        files.get(path).cloned().ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        self.files.lock().unwrap().insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path) || self.dirs.lock().unwrap().contains(path)
    }

    fn try_exists(&self, path: &Path) -> Result<bool, PortError> {
        let unreadable = self.unreadable.lock().unwrap();
        if let Some(bad) = path.ancestors().skip(1).find(|a| unreadable.contains(*a)) {
            return Err(format!("Permission denied: {}", bad.display()).into());
        }
        drop(unreadable);
        Ok(self.exists(path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), PortError> {
        let mut dirs = self.dirs.lock().unwrap();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            dirs.insert(ancestor.to_path_buf());
        }
        Ok(())
    }

    fn walk_files(&self, root: &Path, skip: SkipFn<'_>) -> Result<Vec<PathBuf>, PortError> {
        if !self.dirs.lock().unwrap().contains(root) {
            return Err(format!("No such directory: {}", root.display()).into());
        }
        let unreadable = self.unreadable.lock().unwrap();
        let dirs = self.dirs.lock().unwrap();

        // Directories below root, pruned the same way a real walk would.
        let mut visible: BTreeSet<&Path> = BTreeSet::new();
        visible.insert(root);
        for dir in dirs.iter().filter(|d| d.starts_with(root) && d.as_path() != root) {
            let pruned = dir
                .ancestors()
                .take_while(|a| *a != root)
                .any(|a| skip(a, true));
            if !pruned {
                visible.insert(dir.as_path());
            }
        }
        if let Some(bad) = unreadable.iter().find(|u| visible.contains(u.as_path())) {
            return Err(format!("Permission denied: {}", bad.display()).into());
        }

        let files = self.files.lock().unwrap();
        let mut out: Vec<PathBuf> = files
            .keys()
            .filter(|f| f.parent().is_some_and(|p| visible.contains(p)))
            .filter(|f| !skip(f, false))
            .cloned()
            .collect();
        out.sort();
        Ok(out)
    }
}

/// Clock pinned to a single instant.
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn default_instant() -> Self {
        Self(Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds a context over the given in-memory filesystem and a fixed clock.
pub fn context_with(fs: MemFs) -> ServiceContext {
    ServiceContext { clock: Box::new(FixedClock::default_instant()), fs: Box::new(fs) }
}
