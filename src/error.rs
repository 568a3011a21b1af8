//! Error types for a guard run.

use std::path::PathBuf;

use thiserror::Error;

use crate::ports::PortError;

/// Every way a guard run can fail.
///
/// Missing paths and drift are not errors; they are reported through the
/// manifest and the exit code. Everything here aborts the run with the
/// fatal exit status, and all precondition variants are raised before any
/// manifest is written.
#[derive(Debug, Error)]
pub enum GuardError {
    /// Argument parsing failed, or help/version output was requested.
    #[error("{0}")]
    Usage(#[from] clap::Error),

    /// `--phase` was not a positive integer.
    #[error("Invalid --phase value: {0:?} (expected a positive integer)")]
    InvalidPhase(String),

    /// `--snapshot` or `--compare` named something that is not a plain file-name fragment.
    #[error("Invalid snapshot name: {0:?} (must be non-empty and contain no path separators)")]
    InvalidSnapshotName(String),

    /// The repository root could not be resolved.
    #[error("Repo root not found: {}: {source}", path.display())]
    RepoNotFound {
        /// Path as given on the command line.
        path: PathBuf,
        /// Underlying resolution failure.
        source: std::io::Error,
    },

    /// The plan file does not exist.
    #[error("Plan not found: {}", .0.display())]
    PlanNotFound(PathBuf),

    /// The plan file exists but could not be read as UTF-8 text.
    #[error("Plan unreadable: {}: {source}", path.display())]
    PlanUnreadable {
        /// Absolute plan path.
        path: PathBuf,
        /// Underlying read failure.
        source: PortError,
    },

    /// Extraction over the whole plan produced nothing.
    #[error("No plan paths were detected in {0}. The guard cannot enforce anything.")]
    EmptyPlan(String),

    /// The plan has no header for the requested phase.
    #[error("No \"# PHASE {0}\" header found in the plan.")]
    PhaseNotFound(u32),

    /// The phase header exists but no paths are referenced under it.
    #[error("No paths found under \"# PHASE {0}\". The phase section references no plan paths.")]
    EmptyPhase(u32),

    /// `--compare` named a snapshot that has never been written.
    #[error("Snapshot {name:?} not found at {}", path.display())]
    SnapshotNotFound {
        /// Snapshot name.
        name: String,
        /// Expected manifest location.
        path: PathBuf,
    },

    /// A stored manifest could not be parsed.
    #[error("Failed to parse manifest {}: {source}", path.display())]
    ManifestParse {
        /// Manifest location.
        path: PathBuf,
        /// Parse failure.
        source: serde_json::Error,
    },

    /// A watched root could not be fully traversed.
    #[error("Failed to scan {}: {source}", path.display())]
    Scan {
        /// Watched root being walked.
        path: PathBuf,
        /// Traversal failure.
        source: PortError,
    },

    /// A read, write or directory creation failed.
    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        /// What was being attempted (e.g. "write manifest").
        action: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Underlying failure.
        source: PortError,
    },

    /// The report could not be written to stdout.
    #[error("Failed to write report: {0}")]
    Output(#[source] std::io::Error),

    /// Report or manifest serialization failed.
    #[error("Failed to serialize {what}: {message}")]
    Serialize {
        /// What was being serialized.
        what: &'static str,
        /// Serializer message.
        message: String,
    },
}
