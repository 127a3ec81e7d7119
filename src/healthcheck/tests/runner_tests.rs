//! Tests for the suite runner.

use std::sync::Arc;

use super::stub_checks::{AlwaysPasses, FailsSilently, FuncgenOnly, ProblemButPasses, SlowCheck};
use super::{STAGING, Servers, descriptor, settings};
use crate::database::adapters::memory::InMemorySqlExecutor;
use crate::healthcheck::{
    ports::{Healthcheck, HealthcheckType},
    services::{CheckEnvironment, GroupOfTests, SuiteRunner},
};
use crate::report::domain::ReportLevel;
use rstest::{fixture, rstest};

const CORE: &str = "homo_sapiens_core_110_38";
const FUNCGEN: &str = "homo_sapiens_funcgen_110_38";

fn label(name: &str) -> String {
    descriptor(STAGING, name).to_string()
}

#[fixture]
fn environment() -> CheckEnvironment {
    Servers::default()
        .primary(CORE, InMemorySqlExecutor::new())
        .primary(FUNCGEN, InMemorySqlExecutor::new())
        .environment(settings())
}

fn checks<const N: usize>(built: [Arc<dyn Healthcheck>; N]) -> Vec<Arc<dyn Healthcheck>> {
    built.into()
}

fn build<T: HealthcheckType>() -> Arc<dyn Healthcheck> {
    Arc::new(T::create())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verdicts_follow_database_then_check_order(environment: CheckEnvironment) {
    let runner = SuiteRunner::new(environment);
    let summary = runner
        .run_checks(checks([build::<AlwaysPasses>(), build::<FuncgenOnly>()]))
        .await;

    let order: Vec<(&str, &str)> = summary
        .verdicts()
        .iter()
        .map(|verdict| (verdict.check(), verdict.database()))
        .collect();
    let core = label(CORE);
    let funcgen = label(FUNCGEN);
    assert_eq!(
        order,
        [
            ("AlwaysPasses", core.as_str()),
            ("AlwaysPasses", funcgen.as_str()),
            ("FuncgenOnly", funcgen.as_str()),
        ]
    );
    assert!(summary.is_success());
    assert_eq!(summary.warnings(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn silent_failure_gains_a_problem(environment: CheckEnvironment) {
    let runner = SuiteRunner::new(environment);
    let summary = runner.run_checks(checks([build::<FailsSilently>()])).await;

    assert_eq!(summary.failed(), 2);
    let records = runner
        .environment()
        .sink()
        .records_for("FailsSilently", &label(CORE));
    assert_eq!(records.len(), 1);
    assert!(records.iter().all(|record| record.level() == ReportLevel::Problem));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reported_problem_fails_a_passing_check(environment: CheckEnvironment) {
    let runner = SuiteRunner::new(environment);
    let summary = runner.run_checks(checks([build::<ProblemButPasses>()])).await;

    assert_eq!(summary.passed(), 0);
    assert!(summary.verdicts().iter().all(|verdict| verdict.problems() == 1));
    assert!(!summary.is_success());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_runs_count_only_their_own_records(environment: CheckEnvironment) {
    let runner = SuiteRunner::new(environment);
    let group = GroupOfTests::new("contract")
        .add_test::<ProblemButPasses>()
        .add_test::<FailsSilently>();

    let first = runner.run_group(&group).await;
    let second = runner.run_group(&group).await;

    assert_eq!(first, second);
    assert!(second.verdicts().iter().all(|verdict| verdict.problems() == 1));
    let records = runner
        .environment()
        .sink()
        .records_for("FailsSilently", &label(CORE));
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|record| record.level() == ReportLevel::Problem));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_database_fails_each_applicable_check() {
    let environment = Servers::default()
        .primary(CORE, InMemorySqlExecutor::new())
        .unreachable("mus_musculus_core_110_39")
        .environment(settings());
    let runner = SuiteRunner::new(environment);
    let summary = runner
        .run_checks(checks([build::<AlwaysPasses>(), build::<FuncgenOnly>()]))
        .await;

    assert_eq!(summary.passed(), 1);
    assert_eq!(summary.failed(), 1);
    let records = runner
        .environment()
        .sink()
        .records_for("AlwaysPasses", &label("mus_musculus_core_110_39"));
    assert!(matches!(
        records.as_slice(),
        [record] if record.message().starts_with("cannot connect to database")
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn long_running_checks_can_be_skipped(environment: CheckEnvironment) {
    let group = GroupOfTests::new("mixed")
        .add_test::<AlwaysPasses>()
        .add_test::<SlowCheck>();

    let everything = SuiteRunner::new(environment.clone()).run_group(&group).await;
    let quick = SuiteRunner::new(environment)
        .skipping_long_running()
        .run_group(&group)
        .await;

    assert_eq!(everything.verdicts().len(), 4);
    assert_eq!(quick.verdicts().len(), 2);
    assert!(quick.verdicts().iter().all(|verdict| verdict.check() == "AlwaysPasses"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_registry_yields_an_empty_summary() {
    let runner = SuiteRunner::new(Servers::default().environment(settings()));
    let summary = runner.run_checks(checks([build::<AlwaysPasses>()])).await;
    assert!(summary.verdicts().is_empty());
    assert!(summary.is_success());
}
