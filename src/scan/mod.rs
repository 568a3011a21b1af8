//! Filesystem scanning beneath the watched roots.
//!
//! Ignore rules are evaluated on repo-relative paths and are fixed: they name
//! artifacts that are never plan-tracked (build output, dependency caches,
//! lock files, OS metadata, local environment files).

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::GuardError;
use crate::ports::FileSystem;

/// Directory names ignored at any depth.
pub const IGNORED_DIRS: [&str; 8] =
    ["node_modules", ".next", "dist", "build", ".turbo", ".cache", ".vercel", ".netlify"];

/// File base names that are always ignored.
pub const IGNORED_FILES: [&str; 5] =
    ["package-lock.json", "pnpm-lock.yaml", "yarn.lock", ".DS_Store", "Thumbs.db"];

/// Environment-secrets files that are always ignored.
pub const ENV_FILES: [&str; 4] = [".env", ".env.local", ".env.development", ".env.production"];

/// Any base name with this prefix is treated as an environment file.
pub const ENV_FILE_PREFIX: &str = ".env.";

/// Returns `true` if a directory at `rel` (or anything above it) is ignored.
#[must_use]
pub fn is_ignored_dir(rel: &str) -> bool {
    rel.split('/').any(|segment| IGNORED_DIRS.contains(&segment))
}

/// Returns `true` if a file at `rel` is ignored.
#[must_use]
pub fn is_ignored_file(rel: &str) -> bool {
    let (parent, base) = rel.rsplit_once('/').unwrap_or(("", rel));
    if !parent.is_empty() && is_ignored_dir(parent) {
        return true;
    }
    IGNORED_FILES.contains(&base) || ENV_FILES.contains(&base) || base.starts_with(ENV_FILE_PREFIX)
}

/// Renders `path` relative to `repo_root` with forward slashes.
///
/// Paths outside the repo, or that climb out of it through `..`, are
/// rendered in full.
#[must_use]
pub fn to_repo_relative(repo_root: &Path, path: &Path) -> String {
    let Ok(rel) = path.strip_prefix(repo_root) else {
        return path.display().to_string();
    };
    let parts: Option<Vec<_>> = rel
        .components()
        .map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    match parts {
        Some(parts) => parts.join("/"),
        None => path.display().to_string(),
    }
}

/// Lists every non-ignored file beneath `root`, as absolute paths.
///
/// A root that does not exist contributes nothing. Ignored directories are
/// pruned rather than walked.
///
/// # Errors
///
/// Returns [`GuardError::Scan`] if any part of the tree cannot be read.
pub fn scan_root(
    fs: &dyn FileSystem,
    root: &Path,
    repo_root: &Path,
) -> Result<Vec<PathBuf>, GuardError> {
    if !fs.exists(root) {
        debug!(root = %root.display(), "watched root absent, nothing to scan");
        return Ok(Vec::new());
    }

    let skip = |path: &Path, is_dir: bool| {
        let rel = to_repo_relative(repo_root, path);
        if is_dir {
            is_ignored_dir(&rel)
        } else {
            is_ignored_file(&rel)
        }
    };
    let files = fs
        .walk_files(root, &skip)
        .map_err(|source| GuardError::Scan { path: root.to_path_buf(), source })?;

    debug!(root = %root.display(), files = files.len(), "scanned watched root");
    Ok(files)
}

/// Scans each watched root and returns the union as sorted repo-relative paths.
///
/// # Errors
///
/// Returns the first [`GuardError::Scan`] encountered.
pub fn scan_watched_roots(
    fs: &dyn FileSystem,
    repo_root: &Path,
    watched_roots: &[String],
) -> Result<Vec<String>, GuardError> {
    let mut snapshot = BTreeSet::new();
    for root in watched_roots {
        for file in scan_root(fs, &repo_root.join(root), repo_root)? {
            snapshot.insert(to_repo_relative(repo_root, &file));
        }
    }
    Ok(snapshot.into_iter().collect())
}
