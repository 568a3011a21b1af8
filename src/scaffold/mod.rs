//! Placeholder materialization for missing enforced paths (`--create`).
//!
//! Only ever adds: empty files and directories for enforced paths that have
//! nothing on disk. Drift is never touched and nothing is deleted.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::GuardError;
use crate::ports::FileSystem;

/// Extensionless base names that are files, not directories.
pub const KNOWN_EXTENSIONLESS_FILES: [&str; 7] =
    ["Dockerfile", "Makefile", "LICENSE", "Procfile", "Gemfile", "Rakefile", "CODEOWNERS"];

/// What a materialization pass created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Created {
    /// Directories created, repo-relative and sorted.
    pub dirs: Vec<String>,
    /// Empty files created, repo-relative and sorted.
    pub files: Vec<String>,
}

impl Created {
    /// Returns `true` if nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }
}

/// Decides whether a plan path names a file.
///
/// A trailing `/` always means a directory. Otherwise a base name with an
/// extension, or one of [`KNOWN_EXTENSIONLESS_FILES`], is a file.
#[must_use]
pub fn is_probably_file(path: &str) -> bool {
    if path.ends_with('/') {
        return false;
    }
    let base = path.rsplit('/').next().unwrap_or(path);
    base.contains('.') || KNOWN_EXTENSIONLESS_FILES.contains(&base)
}

/// Creates every enforced path that does not exist yet.
///
/// Files get their parent directory created first (recorded as a created
/// directory when it was absent) and are written empty. Running again once
/// nothing is missing performs no writes.
///
/// # Errors
///
/// Returns [`GuardError::Io`] on the first failed write or directory creation.
pub fn materialize(
    fs: &dyn FileSystem,
    repo_root: &Path,
    enforced: &[String],
) -> Result<Created, GuardError> {
    let mut dirs = BTreeSet::new();
    let mut files = BTreeSet::new();

    for rel in enforced {
        let abs = repo_root.join(rel);

        if !is_probably_file(rel) {
            if !fs.exists(&abs) {
                create_dir(fs, &abs)?;
                dirs.insert(rel.clone());
            }
            continue;
        }

        if let Some((parent, _)) = rel.rsplit_once('/') {
            let parent_abs = repo_root.join(parent);
            if !fs.exists(&parent_abs) {
                create_dir(fs, &parent_abs)?;
                dirs.insert(parent.to_string());
            }
        }
        if !fs.exists(&abs) {
            fs.write(&abs, "").map_err(|source| GuardError::Io {
                action: "create placeholder file",
                path: abs.clone(),
                source,
            })?;
            debug!(path = %rel, "created placeholder file");
            files.insert(rel.clone());
        }
    }

    let created =
        Created { dirs: dirs.into_iter().collect(), files: files.into_iter().collect() };
    info!(dirs = created.dirs.len(), files = created.files.len(), "materialized missing paths");
    Ok(created)
}

fn create_dir(fs: &dyn FileSystem, path: &Path) -> Result<(), GuardError> {
    fs.create_dir_all(path).map_err(|source| GuardError::Io {
        action: "create directory",
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "created directory");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemFs;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn file_heuristic() {
        assert!(is_probably_file("apps/x/page.tsx"));
        assert!(is_probably_file("master_build.md"));
        assert!(is_probably_file("apps/x/Dockerfile"));
        assert!(is_probably_file("apps/x/.gitignore"));
        assert!(!is_probably_file("apps/x/components"));
        assert!(!is_probably_file("apps/x/v1.2/"));
    }

    #[test]
    fn creates_files_with_parents_and_directories() {
        let fs = MemFs::new().with_dir("/repo");
        let enforced = strings(&["apps/x/components", "apps/x/lib/db.ts", "scripts/a.js"]);

        let created = materialize(&fs, Path::new("/repo"), &enforced).unwrap();
        assert_eq!(created.dirs, vec!["apps/x/components", "apps/x/lib", "scripts"]);
        assert_eq!(created.files, vec!["apps/x/lib/db.ts", "scripts/a.js"]);
        assert_eq!(fs.read_to_string(Path::new("/repo/scripts/a.js")).unwrap(), "");
        assert!(fs.exists(Path::new("/repo/apps/x/components")));
    }

    #[test]
    fn existing_paths_are_left_alone() {
        let fs = MemFs::new().with_file("/repo/scripts/a.js", "console.log(1)");
        let enforced = strings(&["scripts/a.js"]);

        let created = materialize(&fs, Path::new("/repo"), &enforced).unwrap();
        assert!(created.is_empty());
        assert_eq!(fs.read_to_string(Path::new("/repo/scripts/a.js")).unwrap(), "console.log(1)");
    }

    #[test]
    fn second_pass_creates_nothing() {
        let fs = MemFs::new().with_dir("/repo");
        let enforced = strings(&["apps/x/page.tsx", "db/sql/", "PHASE_LOG.md"]);

        let first = materialize(&fs, Path::new("/repo"), &enforced).unwrap();
        assert_eq!(first.files, vec!["PHASE_LOG.md", "apps/x/page.tsx"]);
        assert_eq!(first.dirs, vec!["apps/x", "db/sql/"]);

        let second = materialize(&fs, Path::new("/repo"), &enforced).unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn only_enforced_paths_are_created() {
        let fs = MemFs::new().with_file("/repo/scripts/rogue.js", "");
        let created = materialize(&fs, Path::new("/repo"), &strings(&["scripts/a.js"])).unwrap();
        assert_eq!(created.files, vec!["scripts/a.js"]);
        assert_eq!(
            fs.file_paths(),
            vec![
                std::path::PathBuf::from("/repo/scripts/a.js"),
                std::path::PathBuf::from("/repo/scripts/rogue.js"),
            ]
        );
    }
}
