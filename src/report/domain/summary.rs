//! Roll-up of per-check outcomes into a suite result.

use serde::{Deserialize, Serialize};

/// Final outcome of one check against one database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckVerdict {
    check: String,
    database: String,
    passed: bool,
    problems: usize,
    warnings: usize,
}

impl CheckVerdict {
    /// Creates a verdict.
    ///
    /// A verdict with any problem is never a pass, whatever the check
    /// returned.
    #[must_use]
    pub fn new(
        check: impl Into<String>,
        database: impl Into<String>,
        returned: bool,
        problems: usize,
        warnings: usize,
    ) -> Self {
        Self {
            check: check.into(),
            database: database.into(),
            passed: returned && problems == 0,
            problems,
            warnings,
        }
    }

    /// Returns the check name.
    #[must_use]
    pub fn check(&self) -> &str {
        &self.check
    }

    /// Returns the database the check ran against.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns `true` when the check passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.passed
    }

    /// Returns the number of PROBLEM records.
    #[must_use]
    pub const fn problems(&self) -> usize {
        self.problems
    }

    /// Returns the number of WARNING records.
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.warnings
    }
}

/// Suite-level totals over every executed (check, database) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    passed: usize,
    failed: usize,
    warnings: usize,
    verdicts: Vec<CheckVerdict>,
}

impl SuiteSummary {
    /// Builds the summary, keeping verdicts in the given order.
    #[must_use]
    pub fn from_verdicts(verdicts: impl IntoIterator<Item = CheckVerdict>) -> Self {
        verdicts
            .into_iter()
            .fold(Self::default(), |mut summary, verdict| {
                if verdict.passed() {
                    summary.passed = summary.passed.saturating_add(1);
                } else {
                    summary.failed = summary.failed.saturating_add(1);
                }
                summary.warnings = summary.warnings.saturating_add(verdict.warnings());
                summary.verdicts.push(verdict);
                summary
            })
    }

    /// Returns the number of passing pairs.
    #[must_use]
    pub const fn passed(&self) -> usize {
        self.passed
    }

    /// Returns the number of failing pairs.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Returns the total number of WARNING records.
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.warnings
    }

    /// Returns every verdict in execution order.
    #[must_use]
    pub fn verdicts(&self) -> &[CheckVerdict] {
        &self.verdicts
    }

    /// Returns `true` when no pair failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.failed == 0
    }
}
