//! Classification of plan paths against the filesystem snapshot.
//!
//! `missing` is driven by the enforced set alone. `extra` is always computed
//! against the full allowlist, so phase scoping narrows what is required and
//! never what is permitted.

use std::collections::BTreeSet;
use std::fmt;

/// Exit status for runs that fail a precondition.
pub const FATAL_EXIT_CODE: u8 = 1;

/// Result of comparing the plan with the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Enforced paths with nothing on disk, sorted.
    pub missing: Vec<String>,
    /// Scanned files the plan never mentions, sorted.
    pub extra: Vec<String>,
}

impl Classification {
    /// Overall outcome of the run.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if !self.missing.is_empty() {
            Verdict::OffPlan
        } else if !self.extra.is_empty() {
            Verdict::Drifted
        } else {
            Verdict::OnPlan
        }
    }
}

/// Overall outcome of a guard run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing missing, nothing extra.
    OnPlan,
    /// Nothing missing, but unauthorized files exist.
    Drifted,
    /// At least one enforced path is missing. Takes priority over drift.
    OffPlan,
}

impl Verdict {
    /// Process exit code for this verdict.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        match self {
            Self::OnPlan => 0,
            Self::OffPlan => 2,
            Self::Drifted => 3,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnPlan => f.write_str("ON-PLAN (no missing, no drift)"),
            Self::Drifted => f.write_str("ON-PLAN but drift detected (extra files present)"),
            Self::OffPlan => f.write_str("OFF-PLAN (missing required paths)"),
        }
    }
}

/// Classifies the enforced set and the scanned files.
///
/// `exists` reports whether anything is present for an enforced path; it is
/// the only view of the filesystem this function has. `snapshot` holds
/// repo-relative file paths from the watched roots.
#[must_use]
pub fn classify<F>(
    enforced: &[String],
    allowlist: &[String],
    snapshot: &[String],
    exists: F,
) -> Classification
where
    F: Fn(&str) -> bool,
{
    let missing: BTreeSet<&String> = enforced.iter().filter(|path| !exists(path)).collect();

    let allowed: BTreeSet<&str> = allowlist.iter().map(String::as_str).collect();
    let extra: BTreeSet<&String> =
        snapshot.iter().filter(|file| !allowed.contains(file.as_str())).collect();

    Classification {
        missing: missing.into_iter().cloned().collect(),
        extra: extra.into_iter().cloned().collect(),
    }
}
