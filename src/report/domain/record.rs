//! A single finding emitted by a check.

use super::ReportLevel;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One outcome record for a (check, database) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    check: String,
    database: String,
    level: ReportLevel,
    message: String,
    recorded_at: DateTime<Utc>,
}

impl ReportRecord {
    /// Creates a record stamped with the clock's current UTC time.
    #[must_use]
    pub fn new(
        check: impl Into<String>,
        database: impl Into<String>,
        level: ReportLevel,
        message: impl Into<String>,
        clock: &(impl Clock + ?Sized),
    ) -> Self {
        Self {
            check: check.into(),
            database: database.into(),
            level,
            message: message.into(),
            recorded_at: clock.utc(),
        }
    }

    /// Returns the name of the reporting check.
    #[must_use]
    pub fn check(&self) -> &str {
        &self.check
    }

    /// Returns the database the finding concerns.
    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Returns the severity.
    #[must_use]
    pub const fn level(&self) -> ReportLevel {
        self.level
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns when the record was appended.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Returns `true` when the record belongs to the given pair.
    #[must_use]
    pub fn concerns(&self, check: &str, database: &str) -> bool {
        self.check == check && self.database == database
    }
}
