//! Append-only, thread-safe collector of report records.

use crate::report::domain::{ReportLevel, ReportRecord};
use mockable::{Clock, DefaultClock};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while exporting or rendering a report.
#[derive(Debug, Clone, Error)]
pub enum ReportError {
    /// Records could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialization(Arc<serde_json::Error>),

    /// The text template failed to render.
    #[error("failed to render report: {0}")]
    Render(String),
}

impl ReportError {
    /// Wraps a serialization error.
    #[must_use]
    pub fn serialization(err: serde_json::Error) -> Self {
        Self::Serialization(Arc::new(err))
    }
}

#[derive(Serialize)]
struct ReportExport<'a> {
    run_id: Uuid,
    records: &'a [ReportRecord],
}

/// Collects records from every check of one run.
///
/// The sink is created empty at the start of a run and never cleared.
/// Appends are serialized by a mutex, so records for one (check, database)
/// pair are kept in emission order even when other pairs append
/// concurrently.
pub struct ReportSink {
    run_id: Uuid,
    clock: Arc<dyn Clock>,
    records: Mutex<Vec<ReportRecord>>,
}

impl fmt::Debug for ReportSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportSink")
            .field("run_id", &self.run_id)
            .field("records", &self.len())
            .finish_non_exhaustive()
    }
}

impl Default for ReportSink {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl ReportSink {
    /// Creates an empty sink for a new run.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            clock,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Returns the identifier of this run.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Appends one record.
    pub fn append(
        &self,
        level: ReportLevel,
        check: &str,
        database: &str,
        message: impl Into<String>,
    ) {
        let record = ReportRecord::new(check, database, level, message, &*self.clock);
        self.lock().push(record);
    }

    /// Records that something was found to be fine.
    pub fn correct(&self, check: &str, database: &str, message: impl Into<String>) {
        self.append(ReportLevel::Correct, check, database, message);
    }

    /// Records a finding that fails the check.
    pub fn problem(&self, check: &str, database: &str, message: impl Into<String>) {
        self.append(ReportLevel::Problem, check, database, message);
    }

    /// Records a finding that does not fail the check.
    pub fn warning(&self, check: &str, database: &str, message: impl Into<String>) {
        self.append(ReportLevel::Warning, check, database, message);
    }

    /// Records an informational note.
    pub fn info(&self, check: &str, database: &str, message: impl Into<String>) {
        self.append(ReportLevel::Info, check, database, message);
    }

    /// Returns the records of one (check, database) pair in append order.
    #[must_use]
    pub fn records_for(&self, check: &str, database: &str) -> Vec<ReportRecord> {
        self.lock()
            .iter()
            .filter(|record| record.concerns(check, database))
            .cloned()
            .collect()
    }

    /// Counts the records of one pair at the given level.
    #[must_use]
    pub fn count_for(&self, check: &str, database: &str, level: ReportLevel) -> usize {
        self.lock()
            .iter()
            .filter(|record| record.level() == level && record.concerns(check, database))
            .count()
    }

    /// Returns a snapshot of every record in append order.
    #[must_use]
    pub fn records(&self) -> Vec<ReportRecord> {
        self.lock().clone()
    }

    /// Returns the number of records appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Serializes the run id and every record as a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Serialization`] if encoding fails.
    pub fn export_json(&self) -> Result<String, ReportError> {
        let records = self.records();
        serde_json::to_string_pretty(&ReportExport {
            run_id: self.run_id,
            records: &records,
        })
        .map_err(ReportError::serialization)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<ReportRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
