//! Tests for duplicate meta detection and repair.

use std::sync::Arc;

use super::{Release, levels, messages, run_check};
use crate::checks::DuplicateMetaEntries;
use crate::checks::duplicate_meta::META_ROWS_SQL;
use crate::database::{adapters::memory::InMemorySqlExecutor, ports::KeyedId};
use crate::healthcheck::{
    ports::{Healthcheck, HealthcheckType},
    services::CheckEnvironment,
};
use crate::report::domain::ReportLevel;
use rstest::{fixture, rstest};

const CORE: &str = "homo_sapiens_core_110_38";
const CHECK: &str = "DuplicateMetaEntries";

fn meta_rows() -> Vec<KeyedId> {
    vec![
        KeyedId::new("1:species.production_name:homo_sapiens", 1),
        KeyedId::new("1:assembly.default:GRCh38", 2),
        KeyedId::new("1:species.alias:human", 3),
        KeyedId::new("1:species.alias:human", 7),
        KeyedId::new("1:assembly.default:GRCh38", 9),
        KeyedId::new("1:species.alias:human", 5),
    ]
}

struct Scripted {
    executor: Arc<InMemorySqlExecutor>,
    environment: CheckEnvironment,
}

#[fixture]
fn duplicated() -> Scripted {
    let executor = Arc::new(
        InMemorySqlExecutor::new()
            .with_keyed_ids(META_ROWS_SQL, meta_rows())
            .with_affected("DELETE FROM meta WHERE meta_id IN (9, 5, 7)", 3),
    );
    let environment = Release::default()
        .staging(CORE, Arc::clone(&executor))
        .environment();
    Scripted {
        executor,
        environment,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_duplicated_key_is_a_problem(duplicated: Scripted) {
    let summary = run_check::<DuplicateMetaEntries>(&duplicated.environment).await;

    assert_eq!(summary.failed(), 1);
    assert_eq!(
        messages(&duplicated.environment, CHECK, CORE),
        [
            "meta entry 1:assembly.default:GRCh38 appears 2 times",
            "meta entry 1:species.alias:human appears 3 times",
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unique_meta_passes() {
    let executor = InMemorySqlExecutor::new().with_keyed_ids(
        META_ROWS_SQL,
        vec![KeyedId::new("1:a:b", 1), KeyedId::new("1:a:c", 2)],
    );
    let environment = Release::default()
        .staging(CORE, Arc::new(executor))
        .environment();

    let summary = run_check::<DuplicateMetaEntries>(&environment).await;

    assert!(summary.is_success());
    assert_eq!(levels(&environment, CHECK, CORE), [ReportLevel::Correct]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn show_lists_statements_without_running_them(duplicated: Scripted) {
    let registry = duplicated.environment.registry();
    let database = registry.get_by_exact_name(CORE).expect("registered core");
    let connection = registry.open(&database).expect("open core");
    let ctx = duplicated.environment.context_for(CHECK, database, connection);
    let check = DuplicateMetaEntries::create();

    let plan = check.as_repair().expect("repairable").show(&ctx).await;

    assert_eq!(plan.statements(), ["DELETE FROM meta WHERE meta_id IN (9, 5, 7)"]);
    assert!(
        duplicated
            .executor
            .statements()
            .iter()
            .all(|statement| !statement.starts_with("DELETE"))
    );
    assert_eq!(levels(&duplicated.environment, CHECK, CORE), [ReportLevel::Info]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repair_deletes_all_but_the_first_copy(duplicated: Scripted) {
    let registry = duplicated.environment.registry();
    let database = registry.get_by_exact_name(CORE).expect("registered core");
    let connection = registry.open(&database).expect("open core");
    let ctx = duplicated.environment.context_for(CHECK, database, connection);
    let check = DuplicateMetaEntries::create();

    let outcome = check.as_repair().expect("repairable").repair(&ctx).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.rows_affected(), 3);
    assert_eq!(
        duplicated.executor.statements().last().map(String::as_str),
        Some("DELETE FROM meta WHERE meta_id IN (9, 5, 7)")
    );
}
