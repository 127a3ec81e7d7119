//! Per-invocation context handed to a check.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::Settings;
use crate::database::{
    domain::ConnectionDescriptor,
    ports::SqlExecutor,
    services::{CompanionLookup, DatabaseRegistry, RegistryResult},
};
use crate::healthcheck::ports::FileProbe;
use crate::report::{domain::ReportLevel, services::ReportSink};

/// Collaborators shared by every check of a run.
#[derive(Clone)]
pub struct CheckEnvironment {
    registry: Arc<DatabaseRegistry>,
    sink: Arc<ReportSink>,
    settings: Arc<Settings>,
    files: Option<Arc<dyn FileProbe>>,
}

impl fmt::Debug for CheckEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckEnvironment")
            .field("registry", &self.registry)
            .field("sink", &self.sink)
            .field("file_probe", &self.files.is_some())
            .finish_non_exhaustive()
    }
}

impl CheckEnvironment {
    /// Creates an environment without a file probe.
    #[must_use]
    pub const fn new(
        registry: Arc<DatabaseRegistry>,
        sink: Arc<ReportSink>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            registry,
            sink,
            settings,
            files: None,
        }
    }

    /// Adds a file probe for checks that verify files on disk.
    #[must_use]
    pub fn with_file_probe(mut self, probe: Arc<dyn FileProbe>) -> Self {
        self.files = Some(probe);
        self
    }

    /// Returns the database registry.
    #[must_use]
    pub fn registry(&self) -> &DatabaseRegistry {
        &self.registry
    }

    /// Returns the report sink.
    #[must_use]
    pub fn sink(&self) -> &ReportSink {
        &self.sink
    }

    /// Returns the run settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the file probe, if configured.
    #[must_use]
    pub fn file_probe(&self) -> Option<&dyn FileProbe> {
        self.files.as_deref()
    }

    /// Binds the environment to one check and one connected database.
    #[must_use]
    pub fn context_for<'a>(
        &'a self,
        check: &'a str,
        database: Arc<ConnectionDescriptor>,
        sql: Arc<dyn SqlExecutor>,
    ) -> CheckContext<'a> {
        CheckContext {
            check,
            label: database.to_string(),
            database,
            sql,
            environment: self,
            written: LevelCounts::default(),
        }
    }
}

#[derive(Debug, Default)]
struct LevelCounts {
    info: AtomicUsize,
    correct: AtomicUsize,
    warning: AtomicUsize,
    problem: AtomicUsize,
}

impl LevelCounts {
    const fn slot(&self, level: ReportLevel) -> &AtomicUsize {
        match level {
            ReportLevel::Info => &self.info,
            ReportLevel::Correct => &self.correct,
            ReportLevel::Warning => &self.warning,
            ReportLevel::Problem => &self.problem,
        }
    }
}

/// Everything one check invocation can see: its database, the registry for
/// companions, and report helpers bound to the (check, database) pair.
///
/// The sink outlives a single run, so the context tallies the records it
/// writes itself.
pub struct CheckContext<'a> {
    check: &'a str,
    label: String,
    database: Arc<ConnectionDescriptor>,
    sql: Arc<dyn SqlExecutor>,
    environment: &'a CheckEnvironment,
    written: LevelCounts,
}

impl fmt::Debug for CheckContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckContext")
            .field("check", &self.check)
            .field("database", &self.label)
            .finish_non_exhaustive()
    }
}

impl CheckContext<'_> {
    /// Returns the reporting check's name.
    #[must_use]
    pub const fn check_name(&self) -> &str {
        self.check
    }

    /// Returns the database under test.
    #[must_use]
    pub fn database(&self) -> &ConnectionDescriptor {
        &self.database
    }

    /// Returns the label records are filed under (`host:port/schema`).
    #[must_use]
    pub fn database_label(&self) -> &str {
        &self.label
    }

    /// Returns the connection to the database under test.
    #[must_use]
    pub fn sql(&self) -> &dyn SqlExecutor {
        self.sql.as_ref()
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &DatabaseRegistry {
        self.environment.registry()
    }

    /// Returns the run settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        self.environment.settings()
    }

    /// Returns the file probe, if configured.
    #[must_use]
    pub fn file_probe(&self) -> Option<&dyn FileProbe> {
        self.environment.file_probe()
    }

    /// Resolves the core database of the same species and release.
    #[must_use]
    pub fn core_database(&self) -> CompanionLookup {
        self.registry().core_database_for(&self.database)
    }

    /// Opens a companion database through the registry.
    ///
    /// # Errors
    ///
    /// Returns the registry error when the companion cannot be opened.
    pub fn open(&self, companion: &ConnectionDescriptor) -> RegistryResult<Arc<dyn SqlExecutor>> {
        self.registry().open(companion)
    }

    /// Records that something was found to be fine.
    pub fn correct(&self, message: impl Into<String>) {
        self.append(ReportLevel::Correct, message);
    }

    /// Records a finding that fails the check.
    pub fn problem(&self, message: impl Into<String>) {
        self.append(ReportLevel::Problem, message);
    }

    /// Records a finding that does not fail the check.
    pub fn warning(&self, message: impl Into<String>) {
        self.append(ReportLevel::Warning, message);
    }

    /// Records an informational note.
    pub fn info(&self, message: impl Into<String>) {
        self.append(ReportLevel::Info, message);
    }

    /// Counts the records at `level` written through this context.
    ///
    /// Records left in the sink by earlier runs of the same pair are not
    /// included.
    #[must_use]
    pub fn count(&self, level: ReportLevel) -> usize {
        self.written.slot(level).load(Ordering::Relaxed)
    }

    fn append(&self, level: ReportLevel, message: impl Into<String>) {
        self.environment
            .sink()
            .append(level, self.check, &self.label, message);
        self.written.slot(level).fetch_add(1, Ordering::Relaxed);
    }
}
