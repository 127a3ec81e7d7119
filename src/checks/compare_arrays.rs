//! Probe counts per microarray against the previous release.

use async_trait::async_trait;

use crate::database::domain::DatabaseType;
use crate::healthcheck::{
    domain::{
        BreachSeverity, CheckMetadata, ComparisonDirection, ComparisonPolicy, DatabaseTypeSet,
        Team, Threshold,
    },
    ports::{Healthcheck, HealthcheckType},
    services::{CheckContext, PreviousVersionComparator, SqlCountFetcher},
};

pub(super) const ARRAY_PROBE_COUNTS_SQL: &str = "SELECT a.name AS entity_key, \
     COUNT(*) AS entity_count \
     FROM array a JOIN probe p ON p.array_id = a.array_id GROUP BY a.name";

const POLICY: ComparisonPolicy = ComparisonPolicy::new("probes on array", Threshold::clamped(9_500))
    .with_direction(ComparisonDirection::Both)
    .with_severity(BreachSeverity::Warning);

/// Warns when the probe count of an array moved more than 5% in either
/// direction. Array updates make these counts fluctuate, so a breach never
/// fails the check; a vanished array still does.
#[derive(Debug)]
pub struct ComparePreviousVersionArrays {
    metadata: CheckMetadata,
    comparator: PreviousVersionComparator,
}

impl HealthcheckType for ComparePreviousVersionArrays {
    fn create() -> Self {
        Self {
            metadata: CheckMetadata::new(
                "ComparePreviousVersionArrays",
                "Compare probe counts per array with the previous release",
                Team::Funcgen,
            )
            .applying_to(DatabaseTypeSet::only(&[DatabaseType::Funcgen])),
            comparator: PreviousVersionComparator::new(
                POLICY,
                SqlCountFetcher::new(ARRAY_PROBE_COUNTS_SQL),
            ),
        }
    }
}

#[async_trait]
impl Healthcheck for ComparePreviousVersionArrays {
    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> bool {
        self.comparator.run(ctx).await
    }
}
