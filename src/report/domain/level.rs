//! Severity taxonomy for report records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome category of one report record.
///
/// Levels are ordered by severity, `Info` lowest and `Problem` highest, so
/// renderers can filter with a minimum level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportLevel {
    /// Informational note; never affects the outcome.
    Info,
    /// Something was checked and found to be fine.
    Correct,
    /// A finding worth reviewing that does not fail the check.
    Warning,
    /// A finding that fails the check.
    Problem,
}

impl ReportLevel {
    /// Returns the upper-case label used in exports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Correct => "CORRECT",
            Self::Warning => "WARNING",
            Self::Problem => "PROBLEM",
        }
    }

    /// Returns `true` for [`ReportLevel::Problem`].
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Problem)
    }
}

impl fmt::Display for ReportLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
