//! Rendering a finished run for stdout.

use std::path::Path;

use crate::cli::OutputFormat;
use crate::error::GuardError;
use crate::guard::GuardOutcome;
use crate::manifest::{format_diff, to_pretty_json};
use crate::scan::to_repo_relative;

/// Renders `outcome` in the requested format.
///
/// Text is the human-readable report. JSON and YAML emit the manifest
/// document itself, for piping into other tools.
///
/// # Errors
///
/// Returns [`GuardError::Serialize`] if the manifest cannot be encoded.
pub fn render(format: OutputFormat, outcome: &GuardOutcome) -> Result<String, GuardError> {
    match format {
        OutputFormat::Text => Ok(format_report(outcome)),
        OutputFormat::Json => to_pretty_json(&outcome.manifest),
        OutputFormat::Yaml => serde_yaml::to_string(&outcome.manifest)
            .map_err(|e| GuardError::Serialize { what: "manifest", message: e.to_string() }),
    }
}

/// Formats the human-readable report.
#[must_use]
pub fn format_report(outcome: &GuardOutcome) -> String {
    let m = &outcome.manifest;
    let repo = Path::new(&m.repo_root);

    let mut lines = vec!["=== PLAN GUARD REPORT ===".to_string(), String::new()];
    lines.push(format!("Repo: {}", m.repo_root));
    lines.push(format!("Plan: {}", m.plan));
    lines.push(format!("Plan hash: {}", m.plan_hash));
    lines.push(format!("Enforcement mode: {}", m.enforcement.mode));
    if let Some(phase) = m.enforcement.phase {
        lines.push(format!("Phase filter: {phase}"));
    }
    lines.push(format!("Watched roots: {}", m.watched_roots.join(", ")));
    lines.push(format!("Allowlist paths detected (full plan): {}", m.plan_allowlist_paths.len()));
    lines.push(format!("Required paths enforced (missing check): {}", m.required_paths.len()));
    lines.push(format!("Manifest saved: {}", to_repo_relative(repo, &outcome.written.primary)));
    if let Some(snapshot) = &outcome.written.snapshot {
        lines.push(format!("Snapshot saved: {}", to_repo_relative(repo, snapshot)));
    }
    lines.push(String::new());

    if let Some(created) = &m.created {
        lines.push("-- Created (enforced set only) --".to_string());
        lines.push(format!("Dirs: {}", created.dirs.len()));
        lines.extend(created.dirs.iter().map(|d| format!("  + {d}")));
        lines.push(format!("Files: {}", created.files.len()));
        lines.extend(created.files.iter().map(|f| format!("  + {f}")));
        lines.push(String::new());
    }

    push_section(
        &mut lines,
        "-- Missing required paths (OFF-PLAN) --",
        "[MISSING]",
        &m.missing_paths,
    );
    push_section(
        &mut lines,
        "-- Extra files under watched roots (DRIFT) --",
        "[DRIFT]",
        &m.extra_paths,
    );

    if let Some(diff) = &outcome.diff {
        lines.push(format_diff(diff));
        lines.push(String::new());
    }

    lines.push(format!("Result: {}", outcome.verdict()));
    lines.join("\n")
}

fn push_section(lines: &mut Vec<String>, title: &str, tag: &str, paths: &[String]) {
    lines.push(title.to_string());
    if paths.is_empty() {
        lines.push("  none".to_string());
    } else {
        lines.extend(paths.iter().map(|p| format!("  {tag} {p}")));
    }
    lines.push(String::new());
}
