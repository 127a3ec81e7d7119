//! When steps for previous-release comparison scenarios.

use super::world::{COUNTS_SQL, ComparisonWorld, run_async};
use ensembl_healthchecks::healthcheck::{
    domain::{ComparisonPolicy, Threshold},
    services::{PreviousVersionComparator, SqlCountFetcher},
};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::when;

#[when("the counts are compared at a threshold of {percent:u32} percent")]
fn compare_counts(world: &mut ComparisonWorld, percent: u32) -> Result<(), eyre::Report> {
    let threshold = Threshold::from_percent(percent).wrap_err("threshold")?;
    let comparator = PreviousVersionComparator::new(
        ComparisonPolicy::new("genes of biotype", threshold),
        SqlCountFetcher::new(COUNTS_SQL),
    );

    let environment = world.build_environment()?;
    let outcome = {
        let registry = environment.registry();
        let database = registry
            .get_all(None)
            .into_iter()
            .next()
            .ok_or_else(|| eyre!("no database registered"))?;
        let connection = registry.open(&database).wrap_err("open database under test")?;
        let ctx = environment.context_for("GeneComparison", database, connection);
        run_async(comparator.run(&ctx))
    };

    world.outcome = Some(outcome);
    world.environment = Some(environment);
    Ok(())
}
