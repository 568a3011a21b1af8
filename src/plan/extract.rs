//! Path extraction from free-form plan text.
//!
//! Two lexical forms are recognized: backtick code spans, taken verbatim,
//! and bare tokens that start with one of the known repository roots. Every
//! candidate then goes through [`accept_candidate`], and only candidates
//! rooted in [`PATH_ROOTS`] survive.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use super::phase::{slice_to_phase, Phase};

/// Roots a plan path must start with (or equal) to be accepted.
pub const PATH_ROOTS: [&str; 11] = [
    "apps/",
    "db/",
    "scripts/",
    "public/",
    ".plan_guard/",
    "master_build.md",
    "MASTER_BUILD_DIRECTIONS.md",
    "PHASE_LOG.md",
    "PROTOCOLS.md",
    "PHASE_1_FILELIST.md",
    "PHASE_2_FILELIST.md",
];

/// Extension of the planning document itself.
///
/// Candidates containing whitespace are rejected unless they end with this,
/// so multi-word document titles can still be referenced.
pub const PLAN_DOC_EXTENSION: &str = ".md";

static CODE_SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n\r]+)`").expect("code span pattern is valid"));

// ASCII word boundaries on both ends; the trailing one backs the match off
// any trailing `/`, `.` or `-`.
static BARE_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?-u:\b)(",
        r"apps/[A-Za-z0-9._/-]+",
        r"|db/[A-Za-z0-9._/-]+",
        r"|scripts/[A-Za-z0-9._/-]+",
        r"|public/[A-Za-z0-9._/-]+",
        r"|\.plan_guard/[A-Za-z0-9._/-]+",
        r"|master_build\.md",
        r"|MASTER_BUILD_DIRECTIONS\.md",
        r"|PHASE_LOG\.md",
        r"|PROTOCOLS\.md",
        r"|PHASE_1_FILELIST\.md",
        r"|PHASE_2_FILELIST\.md",
        r")(?-u:\b)",
    ))
    .expect("bare token pattern is valid")
});

/// Extracts plan paths from `text`, optionally narrowed to one phase.
///
/// With a phase, only that phase's slice is searched; a phase with no header
/// yields an empty result. The output is sorted and deduplicated.
#[must_use]
pub fn extract_plan_paths(text: &str, phase: Option<Phase>) -> Vec<String> {
    match phase {
        None => extract_paths(text),
        Some(phase) => {
            slice_to_phase(text, phase).map(|slice| extract_paths(&slice)).unwrap_or_default()
        }
    }
}

/// Extracts plan paths from the whole of `text`.
#[must_use]
pub fn extract_paths(text: &str) -> Vec<String> {
    let mut found = BTreeSet::new();

    let spans = CODE_SPAN_RE.captures_iter(text).filter_map(|caps| caps.get(1));
    let bare = BARE_TOKEN_RE.captures_iter(text).filter_map(|caps| caps.get(1));
    for candidate in spans.chain(bare) {
        if let Some(path) = accept_candidate(candidate.as_str()) {
            found.insert(path);
        }
    }

    found.into_iter().collect()
}

/// Normalizes a raw candidate, or rejects it as a non-path.
///
/// Order matters: trailing punctuation is stripped before the rejection
/// checks, and the leading `./` only after them.
#[must_use]
pub fn accept_candidate(raw: &str) -> Option<String> {
    let mut path = raw.trim().replace('\\', "/");

    if path.ends_with([')', ',', '.', ';', ':']) {
        path.pop();
    }

    if path.contains("://") || path.contains(['`', '{', '}', ';']) {
        return None;
    }
    if path.contains(char::is_whitespace) && !path.ends_with(PLAN_DOC_EXTENSION) {
        return None;
    }

    let path = path.strip_prefix("./").unwrap_or(path.as_str());

    if !PATH_ROOTS.iter().any(|root| path.starts_with(root)) {
        return None;
    }
    Some(path.to_string())
}
