//! Run configuration resolved from the command line.
//!
//! Everything that can be rejected up front is rejected here, before the
//! guard reads the plan or touches the tree.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::cli::{Cli, OutputFormat, DEFAULT_PLAN};
use crate::error::GuardError;
use crate::manifest::{validate_snapshot_name, EnforcementRecord};
use crate::plan::Phase;

/// Roots scanned for drift, relative to the repository root.
pub const WATCHED_ROOTS: [&str; 3] = ["apps/campaign_compliance", "db/sql", "scripts"];

/// Which plan paths the missing check enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enforcement {
    /// Whole plan, requested with `--all`.
    All,
    /// Whole plan, because nothing narrower was asked for.
    AllDefault,
    /// Only the paths under one phase header.
    Phase(Phase),
}

impl Enforcement {
    /// Resolves enforcement from `--all` and `--phase`.
    ///
    /// `--all` wins; the phase value is then ignored without validation.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidPhase`] if a phase is used and is not a
    /// positive integer.
    pub fn resolve(all: bool, phase: Option<&str>) -> Result<Self, GuardError> {
        match (all, phase) {
            (true, Some(raw)) => {
                warn!(phase = raw, "--all overrides --phase");
                Ok(Self::All)
            }
            (true, None) => Ok(Self::All),
            (false, Some(raw)) => Ok(Self::Phase(Phase::parse(raw)?)),
            (false, None) => Ok(Self::AllDefault),
        }
    }

    /// The enforced phase, if any.
    #[must_use]
    pub fn phase(self) -> Option<Phase> {
        match self {
            Self::Phase(phase) => Some(phase),
            Self::All | Self::AllDefault => None,
        }
    }

    /// Manifest form of this mode.
    #[must_use]
    pub fn record(self) -> EnforcementRecord {
        EnforcementRecord {
            mode: self.to_string(),
            phase: self.phase().map(Phase::get),
            all: self == Self::All,
        }
    }
}

impl fmt::Display for Enforcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::AllDefault => f.write_str("ALL_DEFAULT"),
            Self::Phase(phase) => write!(f, "PHASE_{phase}"),
        }
    }
}

/// Fully validated inputs for one guard run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Absolute repository root.
    pub repo_root: PathBuf,
    /// Plan file location.
    pub plan_path: PathBuf,
    /// Missing-check scope.
    pub enforcement: Enforcement,
    /// Materialize missing enforced paths before checking.
    pub create: bool,
    /// Print the report.
    pub report: bool,
    /// Snapshot name to save the manifest under.
    pub snapshot: Option<String>,
    /// Snapshot to compare findings against.
    pub compare: Option<String>,
    /// Report rendering.
    pub format: OutputFormat,
    /// Roots scanned for drift, repo-relative.
    pub watched_roots: Vec<String>,
}

impl RunConfig {
    /// Default configuration for an already-resolved repository root.
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        let repo_root = repo_root.into();
        Self {
            plan_path: repo_root.join(DEFAULT_PLAN),
            repo_root,
            enforcement: Enforcement::AllDefault,
            create: false,
            report: true,
            snapshot: None,
            compare: None,
            format: OutputFormat::Text,
            watched_roots: WATCHED_ROOTS.iter().map(|r| (*r).to_string()).collect(),
        }
    }

    /// Validates parsed arguments into a run configuration.
    ///
    /// Checks run in order: phase, snapshot names, then the repository root.
    ///
    /// # Errors
    ///
    /// Returns the first failed precondition.
    pub fn resolve(cli: &Cli) -> Result<Self, GuardError> {
        let enforcement = Enforcement::resolve(cli.all, cli.phase.as_deref())?;
        for name in cli.snapshot.iter().chain(cli.compare.iter()) {
            validate_snapshot_name(name)?;
        }
        let repo_root = canonical_repo(&cli.repo)?;

        Ok(Self {
            plan_path: repo_root.join(&cli.plan),
            enforcement,
            create: cli.create,
            report: cli.report || (!cli.create && cli.snapshot.is_none()),
            snapshot: cli.snapshot.clone(),
            compare: cli.compare.clone(),
            format: cli.format,
            ..Self::new(repo_root)
        })
    }
}

fn canonical_repo(path: &Path) -> Result<PathBuf, GuardError> {
    let resolved = std::fs::canonicalize(path)
        .map_err(|source| GuardError::RepoNotFound { path: path.to_path_buf(), source })?;
    if !resolved.is_dir() {
        return Err(GuardError::RepoNotFound {
            path: path.to_path_buf(),
            source: std::io::Error::other("not a directory"),
        });
    }
    Ok(resolved)
}
