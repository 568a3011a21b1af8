//! One guard run, end to end.
//!
//! Order matters: every fatal precondition (plan, allowlist, phase, compare
//! baseline) is checked before the first write, so a failed run leaves the
//! guard-state directory exactly as it found it.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info};

use crate::classify::{classify, Classification, Verdict};
use crate::config::{Enforcement, RunConfig};
use crate::context::ServiceContext;
use crate::error::GuardError;
use crate::manifest::{
    diff_manifests, ManifestDiff, ManifestStore, RunManifest, WrittenManifest,
};
use crate::plan::{extract_paths, extract_plan_paths, slice_to_phase, PlanDocument};
use crate::scaffold::{is_probably_file, materialize};
use crate::scan::{is_ignored_dir, is_ignored_file, scan_watched_roots, to_repo_relative};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct GuardOutcome {
    /// The manifest that was written.
    pub manifest: RunManifest,
    /// Where it was written.
    pub written: WrittenManifest,
    /// Comparison against `--compare`, when requested.
    pub diff: Option<ManifestDiff>,
}

impl GuardOutcome {
    /// Overall verdict, derived from the manifest's findings.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        Classification {
            missing: self.manifest.missing_paths.clone(),
            extra: self.manifest.extra_paths.clone(),
        }
        .verdict()
    }
}

/// Runs the guard once against `config`.
///
/// # Errors
///
/// Returns a [`GuardError`] for any failed precondition (before anything is
/// written) and for scan or write failures afterwards.
pub fn run_guard(ctx: &ServiceContext, config: &RunConfig) -> Result<GuardOutcome, GuardError> {
    let repo = config.repo_root.as_path();
    let plan = PlanDocument::load(ctx.fs.as_ref(), &config.plan_path)?;
    let plan_rel = to_repo_relative(repo, plan.path());

    let allowlist = extract_plan_paths(plan.text(), None);
    if allowlist.is_empty() {
        return Err(GuardError::EmptyPlan(plan_rel));
    }
    let enforced = enforced_paths(&plan, config.enforcement, &allowlist)?;
    info!(
        mode = %config.enforcement,
        allowlist = allowlist.len(),
        enforced = enforced.len(),
        "plan paths extracted"
    );

    let store = ManifestStore::new(ctx, repo);
    let baseline = match &config.compare {
        Some(name) => Some((name.as_str(), store.load_snapshot(name)?)),
        None => None,
    };

    let created = if config.create {
        Some(materialize(ctx.fs.as_ref(), repo, &enforced)?)
    } else {
        None
    };

    let present = present_paths(ctx, repo, &enforced)?;
    let snapshot = scan_watched_roots(ctx.fs.as_ref(), repo, &config.watched_roots)?;
    let result = classify(&enforced, &allowlist, &snapshot, |rel| present.contains(rel));

    let manifest = RunManifest {
        generated_at: ctx.clock.now(),
        repo_root: repo.display().to_string(),
        plan: plan_rel,
        plan_hash: plan.hash().to_string(),
        enforcement: config.enforcement.record(),
        watched_roots: config.watched_roots.clone(),
        plan_allowlist_paths: allowlist,
        required_paths: enforced,
        missing_paths: result.missing,
        extra_paths: result.extra,
        created,
    };
    let written = store.write(&manifest, config.snapshot.as_deref())?;
    let diff = baseline.map(|(name, old)| diff_manifests(name, &old, &manifest));

    let outcome = GuardOutcome { manifest, written, diff };
    info!(
        verdict = %outcome.verdict(),
        missing = outcome.manifest.missing_paths.len(),
        extra = outcome.manifest.extra_paths.len(),
        "guard run complete"
    );
    Ok(outcome)
}

fn enforced_paths(
    plan: &PlanDocument,
    enforcement: Enforcement,
    allowlist: &[String],
) -> Result<Vec<String>, GuardError> {
    let Some(phase) = enforcement.phase() else {
        return Ok(without_ignored(allowlist.to_vec()));
    };
    let slice =
        slice_to_phase(plan.text(), phase).ok_or(GuardError::PhaseNotFound(phase.get()))?;
    let paths = without_ignored(extract_paths(&slice));
    if paths.is_empty() {
        return Err(GuardError::EmptyPhase(phase.get()));
    }
    Ok(paths)
}

/// Drops plan paths the scanner would never report, so they are neither
/// required nor created.
fn without_ignored(mut paths: Vec<String>) -> Vec<String> {
    paths.retain(|path| {
        let ignored = if is_probably_file(path) {
            is_ignored_file(path)
        } else {
            is_ignored_dir(path.trim_end_matches('/'))
        };
        if ignored {
            debug!(path = %path, "ignored path is not enforced");
        }
        !ignored
    });
    paths
}

/// Checks each enforced path on disk. An inaccessible path is an error, not
/// a missing path.
fn present_paths<'p>(
    ctx: &ServiceContext,
    repo: &Path,
    enforced: &'p [String],
) -> Result<BTreeSet<&'p str>, GuardError> {
    let mut present = BTreeSet::new();
    for rel in enforced {
        let abs = repo.join(rel);
        let exists = ctx
            .fs
            .try_exists(&abs)
            .map_err(|source| GuardError::Io { action: "check", path: abs, source })?;
        if exists {
            present.insert(rel.as_str());
        }
    }
    Ok(present)
}
