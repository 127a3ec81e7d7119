//! Funcgen sequence regions must exist in the matching core database.

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::database::{
    domain::{ConnectionDescriptor, DatabaseType},
    services::CompanionLookup,
};
use crate::healthcheck::{
    domain::{CheckMetadata, DatabaseTypeSet, Priority, Team},
    ports::{Healthcheck, HealthcheckType},
    services::CheckContext,
};

pub(super) const FUNCGEN_REGION_IDS_SQL: &str =
    "SELECT DISTINCT CAST(core_seq_region_id AS CHAR) AS value FROM seq_region";
pub(super) const CORE_REGION_IDS_SQL: &str =
    "SELECT CAST(seq_region_id AS CHAR) AS value FROM seq_region";

pub(super) fn orphan_count_sql(funcgen: &str, core: &str) -> String {
    format!(
        "SELECT COUNT(*) AS value FROM `{funcgen}`.seq_region f \
         LEFT JOIN `{core}`.seq_region c ON c.seq_region_id = f.core_seq_region_id \
         WHERE c.seq_region_id IS NULL"
    )
}

/// Checks that every sequence region referenced by a funcgen database is
/// present in its core database.
///
/// When both databases share a server the check runs one cross-database
/// join; otherwise it compares the two id lists itself.
#[derive(Debug)]
pub struct FuncgenCoreSeqRegions {
    metadata: CheckMetadata,
}

impl HealthcheckType for FuncgenCoreSeqRegions {
    fn create() -> Self {
        Self {
            metadata: CheckMetadata::new(
                "FuncgenCoreSeqRegions",
                "Check funcgen seq_regions against the core database",
                Team::Funcgen,
            )
            .with_priority(Priority::Red)
            .applying_to(DatabaseTypeSet::only(&[DatabaseType::Funcgen])),
        }
    }
}

impl FuncgenCoreSeqRegions {
    async fn orphans_by_join(
        ctx: &CheckContext<'_>,
        core: &ConnectionDescriptor,
    ) -> Result<u64, String> {
        let sql = orphan_count_sql(ctx.database().name(), core.name());
        ctx.sql()
            .count(&sql)
            .await
            .map_err(|err| format!("cannot compare seq_regions with {core}: {err}"))
    }

    async fn orphans_by_lists(
        ctx: &CheckContext<'_>,
        core: &ConnectionDescriptor,
    ) -> Result<u64, String> {
        let referenced = ctx
            .sql()
            .strings(FUNCGEN_REGION_IDS_SQL)
            .await
            .map_err(|err| format!("cannot read funcgen seq_regions: {err}"))?;
        let connection = ctx
            .open(core)
            .map_err(|err| format!("cannot open core database {core}: {err}"))?;
        let known: BTreeSet<String> = connection
            .strings(CORE_REGION_IDS_SQL)
            .await
            .map_err(|err| format!("cannot read core seq_regions from {core}: {err}"))?
            .into_iter()
            .collect();
        let missing = referenced.iter().filter(|id| !known.contains(*id)).count();
        Ok(u64::try_from(missing).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl Healthcheck for FuncgenCoreSeqRegions {
    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> bool {
        let core = match ctx.core_database() {
            CompanionLookup::Found(core) => core,
            CompanionLookup::NotFound(reason) => {
                ctx.problem(format!("cannot find core database: {reason}"));
                return false;
            }
        };

        let orphans = if core.same_server(ctx.database()) {
            Self::orphans_by_join(ctx, &core).await
        } else {
            Self::orphans_by_lists(ctx, &core).await
        };

        match orphans {
            Ok(0) => {
                ctx.correct(format!("all seq_regions present in {core}"));
                true
            }
            Ok(count) => {
                ctx.problem(format!("{count} seq_regions missing from {core}"));
                false
            }
            Err(message) => {
                ctx.problem(message);
                false
            }
        }
    }
}
