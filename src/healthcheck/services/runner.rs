//! Executes a group of checks against every registered database.

use std::sync::Arc;

use super::{CheckEnvironment, CheckFactory, GroupOfTests};
use crate::database::domain::ConnectionDescriptor;
use crate::healthcheck::ports::Healthcheck;
use crate::report::domain::{CheckVerdict, ReportLevel, SuiteSummary};

/// Runs checks database by database.
///
/// Each database gets its own task; checks against one database run one
/// after another, so a connection serves one query at a time. Databases
/// run in parallel.
#[derive(Debug, Clone)]
pub struct SuiteRunner {
    environment: CheckEnvironment,
    skip_long_running: bool,
}

impl SuiteRunner {
    /// Creates a runner.
    #[must_use]
    pub const fn new(environment: CheckEnvironment) -> Self {
        Self {
            environment,
            skip_long_running: false,
        }
    }

    /// Skips checks advertised as long-running.
    #[must_use]
    pub const fn skipping_long_running(mut self) -> Self {
        self.skip_long_running = true;
        self
    }

    /// Returns the shared environment.
    #[must_use]
    pub const fn environment(&self) -> &CheckEnvironment {
        &self.environment
    }

    /// Runs every check of the group against every database under test.
    pub async fn run_group(&self, group: &GroupOfTests) -> SuiteSummary {
        let checks: Vec<Arc<dyn Healthcheck>> = group
            .set_of_tests()
            .iter()
            .map(CheckFactory::instantiate)
            .collect();
        tracing::info!(group = group.name(), checks = checks.len(), "running group");
        self.run_checks(checks).await
    }

    /// Runs the given checks against every database under test.
    ///
    /// Verdicts are ordered by database registration order, then check
    /// order.
    pub async fn run_checks(&self, checks: Vec<Arc<dyn Healthcheck>>) -> SuiteSummary {
        let shared: Arc<[Arc<dyn Healthcheck>]> = checks
            .into_iter()
            .filter(|check| !(self.skip_long_running && check.metadata().is_long_running()))
            .collect();

        let handles: Vec<_> = self
            .environment
            .registry()
            .get_all(None)
            .into_iter()
            .map(|database| {
                let environment = self.environment.clone();
                let database_checks = Arc::clone(&shared);
                let label = database.to_string();
                let handle = tokio::spawn(async move {
                    run_database(&environment, &database_checks, database).await
                });
                (label, handle)
            })
            .collect();

        let mut verdicts = Vec::new();
        for (label, handle) in handles {
            match handle.await {
                Ok(database_verdicts) => verdicts.extend(database_verdicts),
                Err(err) => {
                    tracing::error!(database = %label, error = %err, "database task aborted");
                    self.environment.sink().problem(
                        "SuiteRunner",
                        &label,
                        format!("checks aborted: {err}"),
                    );
                    verdicts.push(CheckVerdict::new("SuiteRunner", label, false, 1, 0));
                }
            }
        }

        let summary = SuiteSummary::from_verdicts(verdicts);
        tracing::info!(
            passed = summary.passed(),
            failed = summary.failed(),
            warnings = summary.warnings(),
            "run finished"
        );
        summary
    }
}

async fn run_database(
    environment: &CheckEnvironment,
    checks: &[Arc<dyn Healthcheck>],
    database: Arc<ConnectionDescriptor>,
) -> Vec<CheckVerdict> {
    let applicable: Vec<&Arc<dyn Healthcheck>> = checks
        .iter()
        .filter(|check| check.applies_to(database.database_type()))
        .collect();
    if applicable.is_empty() {
        return Vec::new();
    }

    let label = database.to_string();
    let connection = match environment.registry().open(&database) {
        Ok(connection) => connection,
        Err(err) => {
            tracing::warn!(database = %label, error = %err, "cannot connect");
            return applicable
                .iter()
                .map(|check| {
                    let name = check.metadata().name();
                    environment
                        .sink()
                        .problem(name, &label, format!("cannot connect to database: {err}"));
                    CheckVerdict::new(name, label.clone(), false, 1, 0)
                })
                .collect();
        }
    };

    let mut verdicts = Vec::with_capacity(applicable.len());
    for check in applicable {
        let name = check.metadata().name();
        let ctx = environment.context_for(name, Arc::clone(&database), Arc::clone(&connection));
        tracing::debug!(check = name, database = %label, "running check");
        let returned = check.run(&ctx).await;
        let mut problems = ctx.count(ReportLevel::Problem);
        if !returned && problems == 0 {
            ctx.problem("check failed without reporting a problem");
            problems = 1;
        }
        verdicts.push(CheckVerdict::new(
            name,
            label.clone(),
            returned,
            problems,
            ctx.count(ReportLevel::Warning),
        ));
    }
    verdicts
}
