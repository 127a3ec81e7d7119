//! Then steps for previous-release comparison scenarios.

use super::world::ComparisonWorld;
use ensembl_healthchecks::healthcheck::services::CheckEnvironment;
use ensembl_healthchecks::report::domain::ReportLevel;
use eyre::eyre;
use rstest_bdd_macros::then;

fn environment(world: &ComparisonWorld) -> Result<&CheckEnvironment, eyre::Report> {
    world
        .environment
        .as_ref()
        .ok_or_else(|| eyre!("comparison has not run"))
}

fn expect_outcome(world: &ComparisonWorld, expected: bool) -> Result<(), eyre::Report> {
    match world.outcome {
        Some(outcome) if outcome == expected => Ok(()),
        Some(outcome) => Err(eyre!("expected comparison to return {expected}, got {outcome}")),
        None => Err(eyre!("comparison has not run")),
    }
}

#[then("the comparison fails")]
fn comparison_fails(world: &ComparisonWorld) -> Result<(), eyre::Report> {
    expect_outcome(world, false)
}

#[then("the comparison passes")]
fn comparison_passes(world: &ComparisonWorld) -> Result<(), eyre::Report> {
    expect_outcome(world, true)
}

#[then("{count:usize} problem is reported")]
fn one_problem_reported(world: &ComparisonWorld, count: usize) -> Result<(), eyre::Report> {
    problems_reported(world, count)
}

#[then("{count:usize} problems are reported")]
fn problems_reported(world: &ComparisonWorld, count: usize) -> Result<(), eyre::Report> {
    let found = environment(world)?
        .sink()
        .records()
        .iter()
        .filter(|record| record.level() == ReportLevel::Problem)
        .count();
    if found != count {
        return Err(eyre!("expected {count} problems, found {found}"));
    }
    Ok(())
}

#[then(r#"the report mentions "{text}""#)]
fn report_mentions(world: &ComparisonWorld, text: String) -> Result<(), eyre::Report> {
    let records = environment(world)?.sink().records();
    if records.iter().any(|record| record.message().contains(&text)) {
        return Ok(());
    }
    Err(eyre!("no record mentions '{text}'"))
}

#[then("nothing is reported")]
fn nothing_reported(world: &ComparisonWorld) -> Result<(), eyre::Report> {
    let sink_len = environment(world)?.sink().len();
    if sink_len != 0 {
        return Err(eyre!("expected no records, found {sink_len}"));
    }
    Ok(())
}
