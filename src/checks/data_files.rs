//! Files registered in a funcgen database must exist on disk.

use async_trait::async_trait;
use camino::Utf8Path;

use crate::database::domain::DatabaseType;
use crate::healthcheck::{
    domain::{CheckMetadata, DatabaseTypeSet, Team},
    ports::{Healthcheck, HealthcheckType},
    services::CheckContext,
};

pub(super) const DATA_FILE_PATHS_SQL: &str = "SELECT path AS value FROM dbfile_registry";

/// Checks that every path in `dbfile_registry` resolves under the data-file
/// root.
#[derive(Debug)]
pub struct DataFilesExist {
    metadata: CheckMetadata,
}

impl HealthcheckType for DataFilesExist {
    fn create() -> Self {
        Self {
            metadata: CheckMetadata::new(
                "DataFilesExist",
                "Check that registered data files exist",
                Team::Funcgen,
            )
            .applying_to(DatabaseTypeSet::only(&[DatabaseType::Funcgen]))
            .long_running()
            .with_effect("Browser tracks backed by missing files fail to load"),
        }
    }
}

#[async_trait]
impl Healthcheck for DataFilesExist {
    fn metadata(&self) -> &CheckMetadata {
        &self.metadata
    }

    async fn run(&self, ctx: &CheckContext<'_>) -> bool {
        let Some(probe) = ctx.file_probe() else {
            ctx.warning("data.file.root is not configured; data files not checked");
            return true;
        };
        let paths = match ctx.sql().strings(DATA_FILE_PATHS_SQL).await {
            Ok(paths) => paths,
            Err(err) => {
                ctx.problem(format!("cannot read dbfile_registry: {err}"));
                return false;
            }
        };

        let mut missing = 0_usize;
        for path in &paths {
            if !probe.exists(Utf8Path::new(path)) {
                missing = missing.saturating_add(1);
                ctx.problem(format!("data file {path} does not exist"));
            }
        }
        if missing == 0 {
            ctx.correct(format!("all {} registered data files exist", paths.len()));
        }
        missing == 0
    }
}
