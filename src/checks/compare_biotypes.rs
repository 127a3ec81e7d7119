//! Gene counts per biotype against the previous release.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::database::{
    domain::DatabaseType,
    ports::{SqlExecutor, SqlResult},
};
use crate::healthcheck::{
    domain::{CheckMetadata, ComparisonPolicy, DatabaseTypeSet, Priority, Team, Threshold},
    ports::{CountFetcher, Healthcheck, HealthcheckType},
    services::{CheckContext, PreviousVersionComparator, SqlCountFetcher},
};

pub(super) const BIOTYPE_COUNTS_SQL: &str =
    "SELECT biotype AS entity_key, COUNT(*) AS entity_count FROM gene GROUP BY biotype";
pub(super) const GENE_COUNT_SQL: &str = "SELECT COUNT(*) AS value FROM gene";

const POLICY: ComparisonPolicy =
    ComparisonPolicy::new("genes of biotype", Threshold::clamped(9_000));

struct BiotypeCounts {
    query: SqlCountFetcher,
}

#[async_trait]
impl CountFetcher for BiotypeCounts {
    async fn fetch(&self, sql: &dyn SqlExecutor) -> SqlResult<BTreeMap<String, u64>> {
        self.query.fetch(sql).await
    }

    async fn skip_reason(&self, ctx: &CheckContext<'_>) -> Option<String> {
        match ctx.sql().count(GENE_COUNT_SQL).await {
            Ok(0) => Some("no genes yet; nothing to compare".to_owned()),
            _ => None,
        }
    }
}

/// Flags biotypes whose gene count dropped by more than 10% since the
/// previous release. Growth is expected and never flagged.
#[derive(Debug)]
pub struct ComparePreviousVersionBiotypes {
    metadata: CheckMetadata,
    comparator: PreviousVersionComparator,
}

impl HealthcheckType for ComparePreviousVersionBiotypes {
    fn create() -> Self {
        Self {
            metadata: CheckMetadata::new(
                "ComparePreviousVersionBiotypes",
                "Compare gene counts per biotype with the previous release",
                Team::Genebuild,
            )
            .with_second_team(Team::ReleaseCoordinator)
            .with_priority(Priority::Red)
            .applying_to(DatabaseTypeSet::only(&[DatabaseType::Core]))
            .with_effect("Genes silently lost between releases")
            .with_fix("Check the gene build for dropped biotypes"),
            comparator: PreviousVersionComparator::new(
                POLICY,
                BiotypeCounts {
                    query: SqlCountFetcher::new(BIOTYPE_COUNTS_SQL),
                },
            ),
        }
    }
}

#[async_trait]
impl Healthcheck for ComparePreviousVersionBiotypes {
    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> bool {
        self.comparator.run(ctx).await
    }
}
