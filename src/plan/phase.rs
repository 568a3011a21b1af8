//! Phase slicing: narrowing plan text to one `# PHASE <n>` section.

use std::fmt;
use std::num::NonZeroU32;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::GuardError;

static PHASE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#\s*PHASE\s+([0-9]+)(?-u:\b)").expect("phase header pattern is valid")
});

/// A positive phase number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Phase(NonZeroU32);

impl Phase {
    /// Returns `None` for zero.
    #[must_use]
    pub fn new(number: u32) -> Option<Self> {
        NonZeroU32::new(number).map(Self)
    }

    /// Parses a `--phase` argument.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::InvalidPhase`] unless `raw` is a positive integer.
    pub fn parse(raw: &str) -> Result<Self, GuardError> {
        raw.trim()
            .parse::<u32>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| GuardError::InvalidPhase(raw.to_string()))
    }

    /// The phase number.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns the lines of `text` belonging to `phase`.
///
/// The slice starts at the first header for exactly this phase and stops
/// before the next phase header of any number. Headers are matched on the
/// trimmed line, case-insensitively, with the number as a whole token.
/// Returns `None` when the plan has no header for the phase.
#[must_use]
pub fn slice_to_phase(text: &str, phase: Phase) -> Option<String> {
    let lines: Vec<&str> =
        text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line)).collect();
    let wanted = phase.to_string();

    let start = lines.iter().position(|line| header_number(line) == Some(wanted.as_str()))?;
    let end = lines[start + 1..]
        .iter()
        .position(|line| header_number(line).is_some())
        .map_or(lines.len(), |offset| start + 1 + offset);

    Some(lines[start..end].join("\n"))
}

/// Digits of the phase header on this line, if it is one.
fn header_number(line: &str) -> Option<&str> {
    PHASE_HEADER_RE.captures(line.trim()).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}
