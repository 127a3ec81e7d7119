//! Shared repair reporting, execution and duplicate-removal planning.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use super::CheckContext;
use crate::database::ports::{KeyedId, SqlResult};
use crate::healthcheck::domain::{RepairOutcome, RepairPlan};

/// Reports a plan as INFO records without executing it.
///
/// A planning failure is reported as a PROBLEM and yields an empty plan.
pub fn show_repair(ctx: &CheckContext<'_>, planned: SqlResult<RepairPlan>) -> RepairPlan {
    match planned {
        Ok(plan) if plan.is_empty() => {
            ctx.info("nothing to repair");
            plan
        }
        Ok(plan) => {
            for statement in plan.statements() {
                ctx.info(format!("would execute: {statement}"));
            }
            plan
        }
        Err(err) => {
            ctx.problem(format!("cannot plan repair: {err}"));
            RepairPlan::default()
        }
    }
}

/// Executes every statement of a plan in order.
///
/// A failing statement is logged and reported, and the remaining statements
/// are still attempted. There is no rollback; re-running the repair
/// finishes a partial one.
pub async fn execute_repair(ctx: &CheckContext<'_>, plan: &RepairPlan) -> RepairOutcome {
    let mut outcome = RepairOutcome::default();
    for statement in plan.statements() {
        match ctx.sql().execute(statement).await {
            Ok(rows) => {
                outcome = outcome.with_success(rows);
            }
            Err(err) => {
                tracing::warn!(
                    check = ctx.check_name(),
                    database = ctx.database_label(),
                    error = %err,
                    "repair statement failed"
                );
                ctx.problem(format!("repair statement failed: {statement}: {err}"));
                outcome = outcome.with_failure();
            }
        }
    }
    if outcome.executed() > 0 {
        ctx.info(format!(
            "repair executed {} statements affecting {} rows",
            outcome.executed(),
            outcome.rows_affected()
        ));
    }
    outcome
}

/// Plans removal of rows sharing a natural key.
///
/// Within each key group the row with the lowest primary key survives. The
/// other ids, across all groups, are deleted in `IN (...)` batches of at
/// most `batch_size` ids, which bounds statement size independently of the
/// data volume.
///
/// # Examples
///
/// ```
/// use std::num::NonZeroUsize;
/// use ensembl_healthchecks::database::ports::KeyedId;
/// use ensembl_healthchecks::healthcheck::services::DuplicateRemovalPlanner;
///
/// let planner = DuplicateRemovalPlanner::new("meta", "meta_id", NonZeroUsize::MIN);
/// let plan = planner.plan(&[
///     KeyedId::new("species.alias=human", 7),
///     KeyedId::new("species.alias=human", 3),
/// ]);
/// assert_eq!(plan.statements(), ["DELETE FROM meta WHERE meta_id IN (7)"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRemovalPlanner {
    table: String,
    id_column: String,
    batch_size: NonZeroUsize,
}

impl DuplicateRemovalPlanner {
    /// Creates a planner for one table.
    #[must_use]
    pub fn new(
        table: impl Into<String>,
        id_column: impl Into<String>,
        batch_size: NonZeroUsize,
    ) -> Self {
        Self {
            table: table.into(),
            id_column: id_column.into(),
            batch_size,
        }
    }

    /// Returns the ids to delete, grouped by key order then id order.
    #[must_use]
    pub fn redundant_ids(rows: &[KeyedId]) -> Vec<i64> {
        let mut groups: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
        for row in rows {
            groups.entry(row.key.as_str()).or_default().push(row.id);
        }
        groups
            .into_values()
            .flat_map(|mut ids| {
                ids.sort_unstable();
                ids.dedup();
                ids.into_iter().skip(1)
            })
            .collect()
    }

    /// Builds the plan for the given rows.
    #[must_use]
    pub fn plan(&self, rows: &[KeyedId]) -> RepairPlan {
        let redundant = Self::redundant_ids(rows);
        RepairPlan::new(redundant.chunks(self.batch_size.get()).map(|batch| {
            let ids = batch
                .iter()
                .map(i64::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "DELETE FROM {} WHERE {} IN ({ids})",
                self.table, self.id_column
            )
        }))
    }
}
