//! Run manifests: the audit record of one guard run.
//!
//! Manifests live in the guard-state directory at the repository root:
//!
//! ```text
//! <repo>/.plan_guard/
//!   ├── manifest.json          # latest run, overwritten every time
//!   └── manifest.<name>.json   # named snapshots, one per --snapshot name
//! ```

pub mod diff;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::context::ServiceContext;
use crate::error::GuardError;
use crate::scaffold::Created;

pub use diff::{diff_manifests, format_diff, ManifestDiff};

/// Name of the guard-state directory under the repository root.
pub const GUARD_DIR: &str = ".plan_guard";

/// File name of the latest-run manifest.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Complete audit record of one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RunManifest {
    /// When the run happened.
    pub generated_at: DateTime<Utc>,
    /// Absolute repository root.
    pub repo_root: String,
    /// Plan location, repo-relative when inside the repo.
    pub plan: String,
    /// SHA-256 of the plan text.
    pub plan_hash: String,
    /// How the required set was chosen.
    pub enforcement: EnforcementRecord,
    /// Roots scanned for drift.
    pub watched_roots: Vec<String>,
    /// Every path in the plan (drift baseline).
    pub plan_allowlist_paths: Vec<String>,
    /// Paths enforced by the missing check.
    pub required_paths: Vec<String>,
    /// Required paths with nothing on disk.
    pub missing_paths: Vec<String>,
    /// Files under watched roots the plan never mentions.
    pub extra_paths: Vec<String>,
    /// Placeholders written by `--create`, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Created>,
}

/// Serialized form of the enforcement mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnforcementRecord {
    /// `ALL`, `ALL_DEFAULT` or `PHASE_<n>`.
    pub mode: String,
    /// Enforced phase, if any.
    pub phase: Option<u32>,
    /// Whether `--all` was given.
    pub all: bool,
}

/// Checks that a snapshot name can be embedded in a file name.
///
/// # Errors
///
/// Returns [`GuardError::InvalidSnapshotName`] for empty names, `.` or `..`,
/// and names containing a path separator.
pub fn validate_snapshot_name(name: &str) -> Result<(), GuardError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." || name.contains(['/', '\\']) {
        return Err(GuardError::InvalidSnapshotName(name.to_string()));
    }
    Ok(())
}

/// Where a run's manifests ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenManifest {
    /// Latest-run manifest.
    pub primary: PathBuf,
    /// Named snapshot copy, if one was requested.
    pub snapshot: Option<PathBuf>,
}

/// Reads and writes manifests in the guard-state directory.
///
/// All I/O goes through `ctx.fs`.
pub struct ManifestStore<'a> {
    ctx: &'a ServiceContext,
    dir: PathBuf,
}

impl<'a> ManifestStore<'a> {
    /// Creates a store for the repository rooted at `repo_root`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, repo_root: &Path) -> Self {
        Self { ctx, dir: repo_root.join(GUARD_DIR) }
    }

    /// Location of the latest-run manifest.
    #[must_use]
    pub fn primary_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    /// Location of the snapshot called `name`.
    #[must_use]
    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("manifest.{name}.json"))
    }

    /// Writes `manifest` as the latest run and, with a name, as a snapshot.
    ///
    /// The primary manifest is overwritten. A snapshot only replaces a prior
    /// snapshot of the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or either write fails.
    pub fn write(
        &self,
        manifest: &RunManifest,
        snapshot: Option<&str>,
    ) -> Result<WrittenManifest, GuardError> {
        let json = to_pretty_json(manifest)?;

        let primary = self.primary_path();
        self.write_file(&primary, &json)?;
        info!(path = %primary.display(), "manifest written");

        let snapshot = match snapshot {
            Some(name) => {
                let path = self.snapshot_path(name);
                self.write_file(&path, &json)?;
                info!(snapshot = name, path = %path.display(), "snapshot written");
                Some(path)
            }
            None => None,
        };

        Ok(WrittenManifest { primary, snapshot })
    }

    /// Loads the snapshot called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::SnapshotNotFound`] if it was never written and
    /// [`GuardError::ManifestParse`] if it is not a manifest.
    pub fn load_snapshot(&self, name: &str) -> Result<RunManifest, GuardError> {
        let path = self.snapshot_path(name);
        if !self.ctx.fs.exists(&path) {
            return Err(GuardError::SnapshotNotFound { name: name.to_string(), path });
        }
        self.load(&path)
    }

    /// Loads the latest-run manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if it cannot be read or parsed.
    pub fn load_primary(&self) -> Result<RunManifest, GuardError> {
        self.load(&self.primary_path())
    }

    fn load(&self, path: &Path) -> Result<RunManifest, GuardError> {
        let contents = self.ctx.fs.read_to_string(path).map_err(|source| GuardError::Io {
            action: "read manifest",
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents)
            .map_err(|source| GuardError::ManifestParse { path: path.to_path_buf(), source })
    }

    fn write_file(&self, path: &Path, contents: &str) -> Result<(), GuardError> {
        self.ctx.fs.write(path, contents).map_err(|source| GuardError::Io {
            action: "write manifest",
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Renders a manifest as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`GuardError::Serialize`] if serialization fails.
pub fn to_pretty_json(manifest: &RunManifest) -> Result<String, GuardError> {
    serde_json::to_string_pretty(manifest)
        .map_err(|e| GuardError::Serialize { what: "manifest", message: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Clock;
    use crate::testing::{context_with, FixedClock, MemFs};

    pub(crate) fn sample_manifest() -> RunManifest {
        RunManifest {
            generated_at: FixedClock::default_instant().now(),
            repo_root: "/repo".into(),
            plan: "master_build.md".into(),
            plan_hash: "abc123".into(),
            enforcement: EnforcementRecord { mode: "PHASE_1".into(), phase: Some(1), all: false },
            watched_roots: vec!["scripts".into()],
            plan_allowlist_paths: vec!["scripts/a.js".into(), "scripts/b.js".into()],
            required_paths: vec!["scripts/a.js".into()],
            missing_paths: vec![],
            extra_paths: vec!["scripts/z.js".into()],
            created: None,
        }
    }

    #[test]
    fn serializes_camel_case_and_omits_created() {
        let json = to_pretty_json(&sample_manifest()).unwrap();
        assert!(json.contains("\"generatedAt\""));
        assert!(json.contains("\"planAllowlistPaths\""));
        assert!(json.contains("\"missingPaths\": []"));
        assert!(json.contains("\"phase\": 1"));
        assert!(!json.contains("created"));
    }

    #[test]
    fn created_is_serialized_when_present() {
        let mut manifest = sample_manifest();
        manifest.created =
            Some(Created { dirs: vec!["scripts".into()], files: vec!["scripts/a.js".into()] });
        let json = to_pretty_json(&manifest).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["created"]["dirs"][0], "scripts");
        assert_eq!(value["created"]["files"][0], "scripts/a.js");
    }

    #[test]
    fn write_primary_and_snapshot() {
        let ctx = context_with(MemFs::new());
        let store = ManifestStore::new(&ctx, Path::new("/repo"));
        let manifest = sample_manifest();

        let written = store.write(&manifest, Some("phase-1")).unwrap();
        assert_eq!(written.primary, PathBuf::from("/repo/.plan_guard/manifest.json"));
        assert_eq!(
            written.snapshot,
            Some(PathBuf::from("/repo/.plan_guard/manifest.phase-1.json"))
        );

        let primary = ctx.fs.read_to_string(&written.primary).unwrap();
        let snapshot = ctx.fs.read_to_string(written.snapshot.as_ref().unwrap()).unwrap();
        assert_eq!(primary, snapshot);
        assert_eq!(store.load_primary().unwrap(), manifest);
    }

    #[test]
    fn snapshots_with_other_names_survive() {
        let ctx = context_with(MemFs::new());
        let store = ManifestStore::new(&ctx, Path::new("/repo"));

        let mut first = sample_manifest();
        first.plan_hash = "first".into();
        store.write(&first, Some("a")).unwrap();

        let mut second = sample_manifest();
        second.plan_hash = "second".into();
        store.write(&second, Some("b")).unwrap();

        assert_eq!(store.load_snapshot("a").unwrap().plan_hash, "first");
        assert_eq!(store.load_snapshot("b").unwrap().plan_hash, "second");
        assert_eq!(store.load_primary().unwrap().plan_hash, "second");
    }

    #[test]
    fn missing_snapshot_is_reported() {
        let ctx = context_with(MemFs::new());
        let store = ManifestStore::new(&ctx, Path::new("/repo"));
        let err = store.load_snapshot("never").unwrap_err();
        assert!(matches!(err, GuardError::SnapshotNotFound { ref name, .. } if name == "never"));
    }

    #[test]
    fn corrupt_snapshot_is_a_parse_error() {
        let fs = MemFs::new().with_file("/repo/.plan_guard/manifest.bad.json", "{not json");
        let ctx = context_with(fs);
        let store = ManifestStore::new(&ctx, Path::new("/repo"));
        assert!(matches!(store.load_snapshot("bad"), Err(GuardError::ManifestParse { .. })));
    }

    #[test]
    fn snapshot_names_must_be_plain() {
        assert!(validate_snapshot_name("phase-4-P4-01").is_ok());
        for bad in ["", "  ", ".", "..", "a/b", r"a\b", "../escape"] {
            assert!(validate_snapshot_name(bad).is_err(), "{bad:?}");
        }
    }
}
