//! Source of named counts for previous-version comparisons.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::database::ports::{SqlExecutor, SqlResult};
use crate::healthcheck::services::CheckContext;

/// Computes the key to count mapping compared between releases.
#[async_trait]
pub trait CountFetcher: Send + Sync {
    /// Fetches counts from one database.
    async fn fetch(&self, sql: &dyn SqlExecutor) -> SqlResult<BTreeMap<String, u64>>;

    /// Returns a reason to skip the comparison for this database, such as a
    /// first build with nothing to compare against.
    async fn skip_reason(&self, _ctx: &CheckContext<'_>) -> Option<String> {
        None
    }
}
