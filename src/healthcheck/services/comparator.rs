//! Release-over-release count comparison.
//!
//! One engine serves every "did we lose data since last release" check:
//! the check supplies a [`CountFetcher`] and a [`ComparisonPolicy`], the
//! engine resolves the previous release through the registry, compares the
//! counts key by key and reports.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::fmt;

use super::CheckContext;
use crate::database::{
    domain::ConnectionDescriptor,
    ports::{SqlExecutor, SqlResult},
    services::CompanionLookup,
};
use crate::healthcheck::{
    domain::{BreachSeverity, ComparisonDirection, ComparisonPolicy, format_basis_points},
    ports::CountFetcher,
};
use crate::report::domain::ReportLevel;

/// Outcome of comparing one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyFinding {
    /// The ratio is within tolerance.
    Within {
        /// Compared key.
        key: String,
        /// Count in the database under test.
        current: u64,
        /// Count in the previous release.
        previous: u64,
    },
    /// The key is gone from the database under test.
    Vanished {
        /// Compared key.
        key: String,
        /// Count in the previous release.
        previous: u64,
    },
    /// The count dropped below the threshold.
    Shrank {
        /// Compared key.
        key: String,
        /// Count in the database under test.
        current: u64,
        /// Count in the previous release.
        previous: u64,
    },
    /// The count grew beyond the tolerance.
    Grew {
        /// Compared key.
        key: String,
        /// Count in the database under test.
        current: u64,
        /// Count in the previous release.
        previous: u64,
    },
}

/// Compares counts key by key.
///
/// Only keys with a non-zero previous count are considered, in key order.
/// A vanished key is a finding whatever the policy says; growth is only a
/// finding when the policy checks both directions.
#[must_use]
pub fn compare_counts(
    current: &BTreeMap<String, u64>,
    previous: &BTreeMap<String, u64>,
    policy: &ComparisonPolicy,
) -> Vec<KeyFinding> {
    let threshold = policy.threshold();
    previous
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(key, &previous_count)| {
            let Some(&current_count) = current.get(key) else {
                return KeyFinding::Vanished {
                    key: key.clone(),
                    previous: previous_count,
                };
            };
            if threshold.is_shrinkage_breach(current_count, previous_count) {
                KeyFinding::Shrank {
                    key: key.clone(),
                    current: current_count,
                    previous: previous_count,
                }
            } else if policy.direction() == ComparisonDirection::Both
                && threshold.is_growth_breach(current_count, previous_count)
            {
                KeyFinding::Grew {
                    key: key.clone(),
                    current: current_count,
                    previous: previous_count,
                }
            } else {
                KeyFinding::Within {
                    key: key.clone(),
                    current: current_count,
                    previous: previous_count,
                }
            }
        })
        .collect()
}

/// Fetches counts with one `entity_key`/`entity_count` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlCountFetcher {
    sql: String,
}

impl SqlCountFetcher {
    /// Creates a fetcher for the given query.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }
}

#[async_trait]
impl CountFetcher for SqlCountFetcher {
    async fn fetch(&self, sql: &dyn SqlExecutor) -> SqlResult<BTreeMap<String, u64>> {
        let rows = sql.keyed_counts(&self.sql).await?;
        Ok(rows.into_iter().fold(BTreeMap::new(), |mut counts, row| {
            let total = counts.entry(row.key).or_insert(0_u64);
            *total = total.saturating_add(row.count);
            counts
        }))
    }
}

/// The comparison engine.
pub struct PreviousVersionComparator {
    policy: ComparisonPolicy,
    fetcher: Box<dyn CountFetcher>,
}

impl fmt::Debug for PreviousVersionComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviousVersionComparator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl PreviousVersionComparator {
    /// Creates a comparator.
    #[must_use]
    pub fn new(policy: ComparisonPolicy, fetcher: impl CountFetcher + 'static) -> Self {
        Self {
            policy,
            fetcher: Box::new(fetcher),
        }
    }

    /// Returns the policy.
    #[must_use]
    pub const fn policy(&self) -> &ComparisonPolicy {
        &self.policy
    }

    /// Runs the comparison for the context's database.
    ///
    /// Skips (returns `true` without a report) when previous-version checks
    /// are disabled, the fetcher asks to skip, or there is no previous
    /// release to compare with. Fails on query errors and on any PROBLEM
    /// finding; warnings never fail.
    pub async fn run(&self, ctx: &CheckContext<'_>) -> bool {
        if ctx.settings().skip_previous_checks() {
            tracing::debug!(check = ctx.check_name(), "previous-version checks disabled");
            return true;
        }
        if let Some(reason) = self.fetcher.skip_reason(ctx).await {
            tracing::debug!(
                check = ctx.check_name(),
                database = ctx.database_label(),
                reason = %reason,
                "comparison skipped"
            );
            return true;
        }
        let previous = match ctx.registry().get_equivalent_from_secondary_server(ctx.database()) {
            CompanionLookup::Found(descriptor) => descriptor,
            CompanionLookup::NotFound(reason) => {
                tracing::warn!(
                    check = ctx.check_name(),
                    database = ctx.database_label(),
                    reason = %reason,
                    "no previous release to compare with; skipping"
                );
                return true;
            }
        };

        let current_counts = match self.fetcher.fetch(ctx.sql()).await {
            Ok(counts) => counts,
            Err(err) => {
                ctx.problem(format!("cannot count {}: {err}", self.policy.entity_description()));
                return false;
            }
        };
        let previous_counts = match self.fetch_previous(ctx, &previous).await {
            Ok(counts) => counts,
            Err(message) => {
                ctx.problem(message);
                return false;
            }
        };

        let findings = compare_counts(&current_counts, &previous_counts, &self.policy);
        self.report(ctx, &previous.to_string(), &findings)
    }

    async fn fetch_previous(
        &self,
        ctx: &CheckContext<'_>,
        previous: &ConnectionDescriptor,
    ) -> Result<BTreeMap<String, u64>, String> {
        let connection = ctx
            .open(previous)
            .map_err(|err| format!("cannot open previous release {previous}: {err}"))?;
        self.fetcher.fetch(connection.as_ref()).await.map_err(|err| {
            format!(
                "cannot count {} in {previous}: {err}",
                self.policy.entity_description()
            )
        })
    }

    fn report(&self, ctx: &CheckContext<'_>, previous: &str, findings: &[KeyFinding]) -> bool {
        let entity = self.policy.entity_description();
        let warning_limit = ctx.settings().max_comparison_warnings();
        let mut problems = 0_usize;
        let mut suppressed = 0_usize;

        for finding in findings {
            let (level, message) = match finding {
                KeyFinding::Within { .. } => continue,
                KeyFinding::Vanished { key, previous: count } => (
                    ReportLevel::Problem,
                    format!("{entity} '{key}' is missing; {count} in {previous}"),
                ),
                KeyFinding::Shrank { key, current, previous: count } => (
                    self.breach_level(),
                    self.breach_message(key, "decreased", *current, *count, previous),
                ),
                KeyFinding::Grew { key, current, previous: count } => (
                    self.breach_level(),
                    self.breach_message(key, "increased", *current, *count, previous),
                ),
            };
            if level == ReportLevel::Problem {
                problems = problems.saturating_add(1);
                ctx.problem(message);
            } else if ctx.count(ReportLevel::Warning) < warning_limit {
                ctx.warning(message);
            } else {
                suppressed = suppressed.saturating_add(1);
            }
        }

        if suppressed > 0 {
            ctx.info(format!(
                "{suppressed} further {entity} warnings suppressed after {warning_limit}"
            ));
        }
        if problems == 0 {
            ctx.correct(format!(
                "{entity} counts within tolerance of {previous} ({} keys compared)",
                findings.len()
            ));
        }
        problems == 0
    }

    const fn breach_level(&self) -> ReportLevel {
        match self.policy.severity() {
            BreachSeverity::Problem => ReportLevel::Problem,
            BreachSeverity::Warning => ReportLevel::Warning,
        }
    }

    fn breach_message(
        &self,
        key: &str,
        change: &str,
        current: u64,
        previous_count: u64,
        previous: &str,
    ) -> String {
        let ratio = u128::from(current)
            .saturating_mul(10_000)
            .checked_div(u128::from(previous_count))
            .and_then(|value| u64::try_from(value).ok())
            .unwrap_or(u64::MAX);
        format!(
            "{} '{key}' {change} from {previous_count} in {previous} to {current} ({} of previous, threshold {})",
            self.policy.entity_description(),
            format_basis_points(ratio),
            self.policy.threshold(),
        )
    }
}
