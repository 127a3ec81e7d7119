//! The contract every healthcheck implements.

use async_trait::async_trait;

use crate::database::{domain::DatabaseType, ports::SqlResult};
use crate::healthcheck::{
    domain::{CheckMetadata, RepairOutcome, RepairPlan},
    services::{CheckContext, execute_repair, show_repair},
};

/// A check run against one database at a time.
///
/// `run` returns `true` iff no problem was found. The report records
/// written through the context are the real output; the boolean alone is
/// not expected to be informative. SQL failures are caught inside `run` and
/// reported, never propagated.
#[async_trait]
pub trait Healthcheck: Send + Sync {
    /// Returns the check's static metadata.
    fn metadata(&self) -> &CheckMetadata;

    /// Returns `true` when the check should run against `kind`.
    ///
    /// The runner evaluates this before calling [`Healthcheck::run`].
    fn applies_to(&self, kind: DatabaseType) -> bool {
        self.metadata().applies_to(kind)
    }

    /// Runs the check. Must not modify the database.
    async fn run(&self, ctx: &CheckContext<'_>) -> bool;

    /// Returns the repair capability, if the check has one.
    fn as_repair(&self) -> Option<&dyn Repair> {
        None
    }
}

/// A check type that can be named and built without arguments.
///
/// Groups and the catalogue are assembled from these types.
pub trait HealthcheckType: Healthcheck + Sized + 'static {
    /// Creates an instance.
    fn create() -> Self;
}

/// Optional capability of checks that can fix what they detect.
///
/// Implementors only compute the plan; reporting and execution are shared.
#[async_trait]
pub trait Repair: Send + Sync {
    /// Computes the statements that would remove the anomaly.
    async fn plan(&self, ctx: &CheckContext<'_>) -> SqlResult<RepairPlan>;

    /// Reports the planned statements as INFO records without executing
    /// them. Returns the plan, empty when planning failed.
    async fn show(&self, ctx: &CheckContext<'_>) -> RepairPlan {
        show_repair(ctx, self.plan(ctx).await)
    }

    /// Executes the planned statements, continuing past failures.
    async fn repair(&self, ctx: &CheckContext<'_>) -> RepairOutcome {
        match self.plan(ctx).await {
            Ok(plan) => execute_repair(ctx, &plan).await,
            Err(err) => {
                ctx.problem(format!("cannot plan repair: {err}"));
                RepairOutcome::default().with_failure()
            }
        }
    }
}
