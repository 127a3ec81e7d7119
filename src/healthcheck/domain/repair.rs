//! Repair plans and their execution outcome.

use serde::Serialize;

/// Ordered SQL statements that would remove an anomaly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepairPlan {
    statements: Vec<String>,
}

impl RepairPlan {
    /// Creates a plan from statements, kept in order.
    #[must_use]
    pub fn new(statements: impl IntoIterator<Item = String>) -> Self {
        Self {
            statements: statements.into_iter().collect(),
        }
    }

    /// Returns the statements.
    #[must_use]
    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    /// Returns `true` when there is nothing to repair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Tally of an executed repair.
///
/// Failed statements do not stop the run, so a partial repair is reported
/// here and can be completed by running the repair again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RepairOutcome {
    executed: usize,
    failed: usize,
    rows_affected: usize,
}

impl RepairOutcome {
    /// Records a statement that succeeded.
    #[must_use]
    pub const fn with_success(mut self, rows: usize) -> Self {
        self.executed = self.executed.saturating_add(1);
        self.rows_affected = self.rows_affected.saturating_add(rows);
        self
    }

    /// Records a statement that failed.
    #[must_use]
    pub const fn with_failure(mut self) -> Self {
        self.failed = self.failed.saturating_add(1);
        self
    }

    /// Returns the number of statements that succeeded.
    #[must_use]
    pub const fn executed(&self) -> usize {
        self.executed
    }

    /// Returns the number of statements that failed.
    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Returns the total rows affected by successful statements.
    #[must_use]
    pub const fn rows_affected(&self) -> usize {
        self.rows_affected
    }

    /// Returns `true` when every statement succeeded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed == 0
    }
}
