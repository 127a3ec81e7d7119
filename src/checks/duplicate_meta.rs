//! Duplicate rows in the `meta` table.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::database::{
    domain::DatabaseType,
    ports::{KeyedId, SqlResult},
};
use crate::healthcheck::{
    domain::{CheckMetadata, DatabaseTypeSet, RepairPlan, Team},
    ports::{Healthcheck, HealthcheckType, Repair},
    services::{CheckContext, DuplicateRemovalPlanner},
};

pub(super) const META_ROWS_SQL: &str = "SELECT \
     CONCAT_WS(':', IFNULL(species_id, 'NULL'), meta_key, meta_value) \
     AS entity_key, meta_id AS row_id FROM meta";

const META_TYPES: DatabaseTypeSet = DatabaseTypeSet::except(&[
    DatabaseType::Compara,
    DatabaseType::Ontology,
    DatabaseType::Production,
    DatabaseType::Unknown,
]);

/// Detects `meta` rows repeating the same species, key and value, and can
/// delete all but the first of each.
#[derive(Debug)]
pub struct DuplicateMetaEntries {
    metadata: CheckMetadata,
}

impl HealthcheckType for DuplicateMetaEntries {
    fn create() -> Self {
        Self {
            metadata: CheckMetadata::new(
                "DuplicateMetaEntries",
                "Check that no meta entry is repeated",
                Team::Core,
            )
            .with_second_team(Team::Production)
            .applying_to(META_TYPES)
            .with_fix("Run the repair to delete the later copies"),
        }
    }
}

fn duplicate_counts(rows: &[KeyedId]) -> BTreeMap<&str, usize> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for row in rows {
        let seen = counts.entry(row.key.as_str()).or_insert(0);
        *seen = seen.saturating_add(1);
    }
    counts.retain(|_, seen| *seen > 1);
    counts
}

#[async_trait]
impl Healthcheck for DuplicateMetaEntries {
    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> bool {
        let rows = match ctx.sql().keyed_ids(META_ROWS_SQL).await {
            Ok(rows) => rows,
            Err(err) => {
                ctx.problem(format!("cannot read meta table: {err}"));
                return false;
            }
        };
        let duplicates = duplicate_counts(&rows);
        if duplicates.is_empty() {
            ctx.correct("no duplicate meta entries");
            return true;
        }
        for (key, copies) in &duplicates {
            ctx.problem(format!("meta entry {key} appears {copies} times"));
        }
        false
    }

    fn as_repair(&self) -> Option<&dyn Repair> {
        Some(self)
    }
}

#[async_trait]
impl Repair for DuplicateMetaEntries {
    async fn plan(&self, ctx: &CheckContext<'_>) -> SqlResult<RepairPlan> {
        let rows = ctx.sql().keyed_ids(META_ROWS_SQL).await?;
        let planner =
            DuplicateRemovalPlanner::new("meta", "meta_id", ctx.settings().repair_batch_size());
        Ok(planner.plan(&rows))
    }
}
