//! Comparing a run against an earlier snapshot.

use std::collections::BTreeSet;

use super::RunManifest;

/// How findings moved between a baseline snapshot and the current run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestDiff {
    /// Name of the baseline snapshot.
    pub baseline: String,
    /// Whether the plan text changed since the baseline.
    pub plan_changed: bool,
    /// Missing now, not missing then.
    pub newly_missing: Vec<String>,
    /// Missing then, not missing now.
    pub resolved_missing: Vec<String>,
    /// Drift now, not drift then.
    pub new_drift: Vec<String>,
    /// Drift then, not drift now.
    pub cleared_drift: Vec<String>,
}

impl ManifestDiff {
    /// Returns `true` if findings are identical to the baseline.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        !self.plan_changed
            && self.newly_missing.is_empty()
            && self.resolved_missing.is_empty()
            && self.new_drift.is_empty()
            && self.cleared_drift.is_empty()
    }
}

/// Compares `current` against the snapshot `old` named `baseline`.
#[must_use]
pub fn diff_manifests(baseline: &str, old: &RunManifest, current: &RunManifest) -> ManifestDiff {
    let (newly_missing, resolved_missing) =
        added_removed(&old.missing_paths, &current.missing_paths);
    let (new_drift, cleared_drift) = added_removed(&old.extra_paths, &current.extra_paths);

    ManifestDiff {
        baseline: baseline.to_string(),
        plan_changed: old.plan_hash != current.plan_hash,
        newly_missing,
        resolved_missing,
        new_drift,
        cleared_drift,
    }
}

/// Items only in `new`, then items only in `old`; both sorted.
fn added_removed(old: &[String], new: &[String]) -> (Vec<String>, Vec<String>) {
    let old: BTreeSet<&String> = old.iter().collect();
    let new: BTreeSet<&String> = new.iter().collect();
    (
        new.difference(&old).map(|s| (*s).clone()).collect(),
        old.difference(&new).map(|s| (*s).clone()).collect(),
    )
}

/// Formats a comparison as a human-readable block.
#[must_use]
pub fn format_diff(diff: &ManifestDiff) -> String {
    if diff.is_unchanged() {
        return format!("No changes since snapshot {}.", diff.baseline);
    }

    let mut lines = vec![format!("-- Changes since snapshot {} --", diff.baseline)];
    if diff.plan_changed {
        lines.push("  [PLAN] plan text changed".to_string());
    }
    for path in &diff.newly_missing {
        lines.push(format!("  [NEWLY MISSING] {path}"));
    }
    for path in &diff.resolved_missing {
        lines.push(format!("  [RESOLVED] {path}"));
    }
    for path in &diff.new_drift {
        lines.push(format!("  [NEW DRIFT] {path}"));
    }
    for path in &diff.cleared_drift {
        lines.push(format!("  [CLEARED] {path}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::tests::sample_manifest;

    #[test]
    fn identical_manifests_are_unchanged() {
        let m = sample_manifest();
        let d = diff_manifests("base", &m, &m);
        assert!(d.is_unchanged());
        assert_eq!(format_diff(&d), "No changes since snapshot base.");
    }

    #[test]
    fn movement_in_both_directions() {
        let old = sample_manifest();
        let mut new = sample_manifest();
        new.plan_hash = "changed".into();
        new.missing_paths = vec!["scripts/b.js".into()];
        new.extra_paths = vec!["scripts/y.js".into()];

        let d = diff_manifests("base", &old, &new);
        assert!(d.plan_changed);
        assert_eq!(d.newly_missing, vec!["scripts/b.js"]);
        assert!(d.resolved_missing.is_empty());
        assert_eq!(d.new_drift, vec!["scripts/y.js"]);
        assert_eq!(d.cleared_drift, vec!["scripts/z.js"]);

        let text = format_diff(&d);
        assert!(text.contains("[PLAN] plan text changed"));
        assert!(text.contains("[NEWLY MISSING] scripts/b.js"));
        assert!(text.contains("[NEW DRIFT] scripts/y.js"));
        assert!(text.contains("[CLEARED] scripts/z.js"));
    }

    #[test]
    fn resolved_missing_is_reported() {
        let mut old = sample_manifest();
        old.missing_paths = vec!["scripts/a.js".into()];
        let new = sample_manifest();

        let d = diff_manifests("base", &old, &new);
        assert_eq!(d.resolved_missing, vec!["scripts/a.js"]);
        assert!(format_diff(&d).contains("[RESOLVED] scripts/a.js"));
    }
}
