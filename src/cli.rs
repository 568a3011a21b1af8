//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Default plan location, resolved against the repository root.
pub const DEFAULT_PLAN: &str = "master_build.md";

/// Top-level CLI parser for `plan-guard`.
///
/// There are no subcommands: every run classifies the tree, writes the
/// manifest, and exits with a code describing the verdict.
#[derive(Debug, Parser)]
#[command(
    name = "plan-guard",
    version,
    about = "Keep a repository's file tree in line with its phase-structured plan"
)]
pub struct Cli {
    /// Print findings (the default when neither --create nor --snapshot is given).
    #[arg(long)]
    pub report: bool,

    /// Create missing enforced paths as empty placeholders.
    #[arg(long)]
    pub create: bool,

    /// Also save the manifest as `.plan_guard/manifest.<NAME>.json`.
    #[arg(long, value_name = "NAME")]
    pub snapshot: Option<String>,

    /// Enforce only the paths under `# PHASE <N>` for the missing check.
    #[arg(long, value_name = "N", allow_hyphen_values = true)]
    pub phase: Option<String>,

    /// Enforce the whole plan (overrides --phase).
    #[arg(long)]
    pub all: bool,

    /// Plan file, resolved against the repository root.
    #[arg(long, value_name = "PATH", env = "PLAN_GUARD_PLAN", default_value = DEFAULT_PLAN)]
    pub plan: PathBuf,

    /// Repository root.
    #[arg(long, value_name = "PATH", env = "PLAN_GUARD_REPO", default_value = ".")]
    pub repo: PathBuf,

    /// How the report is rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Compare findings against a previously saved snapshot.
    #[arg(long, value_name = "NAME")]
    pub compare: Option<String>,

    /// Raise log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Report rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    Text,
    /// The manifest as pretty JSON.
    Json,
    /// The manifest as YAML.
    Yaml,
}

#[cfg(test)]
mod tests {
    use super::{Cli, OutputFormat};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::try_parse_from(["plan-guard"]).unwrap();
        assert!(!cli.report);
        assert!(!cli.create);
        assert!(!cli.all);
        assert_eq!(cli.phase, None);
        assert_eq!(cli.snapshot, None);
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn parses_full_flag_set() {
        let cli = Cli::try_parse_from([
            "plan-guard",
            "--repo",
            "/tmp/r",
            "--plan",
            "docs/plan.md",
            "--phase",
            "4",
            "--create",
            "--report",
            "--snapshot",
            "phase-4-P4-01",
            "--format",
            "json",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.repo, PathBuf::from("/tmp/r"));
        assert_eq!(cli.plan, PathBuf::from("docs/plan.md"));
        assert_eq!(cli.phase.as_deref(), Some("4"));
        assert!(cli.create && cli.report);
        assert_eq!(cli.snapshot.as_deref(), Some("phase-4-P4-01"));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn negative_phase_reaches_validation() {
        let cli = Cli::try_parse_from(["plan-guard", "--phase", "-1"]).unwrap();
        assert_eq!(cli.phase.as_deref(), Some("-1"));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["plan-guard", "--format", "xml"]).is_err());
    }
}
