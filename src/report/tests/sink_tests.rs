//! Tests for the report sink.

use std::sync::Arc;

use super::FixedClock;
use crate::report::domain::ReportLevel;
use crate::report::services::ReportSink;
use rstest::{fixture, rstest};

const CHECK: &str = "ComparePreviousVersionBiotypes";
const DATABASE: &str = "ens-staging:3306/homo_sapiens_core_110_38";

#[fixture]
fn sink() -> ReportSink {
    ReportSink::new(Arc::new(FixedClock::at_release()))
}

#[rstest]
fn sink_starts_empty(sink: ReportSink) {
    assert!(sink.is_empty());
    assert!(sink.records_for(CHECK, DATABASE).is_empty());
}

#[rstest]
fn records_keep_level_and_timestamp(sink: ReportSink) {
    sink.problem(CHECK, DATABASE, "protein_coding lost 12%");
    sink.info(CHECK, DATABASE, "compared 3 biotypes");

    let records = sink.records_for(CHECK, DATABASE);
    let levels: Vec<ReportLevel> = records.iter().map(|record| record.level()).collect();
    assert_eq!(levels, [ReportLevel::Problem, ReportLevel::Info]);
    assert!(records
        .iter()
        .all(|record| record.recorded_at() == FixedClock::at_release().0));
    assert_eq!(
        records.first().map(|record| record.message()),
        Some("protein_coding lost 12%")
    );
}

#[rstest]
fn records_are_filtered_by_pair(sink: ReportSink) {
    sink.correct(CHECK, DATABASE, "ok");
    sink.warning(CHECK, "ens-staging:3306/mus_musculus_core_110_39", "odd");
    sink.problem("DuplicateMetaEntries", DATABASE, "duplicates");

    assert_eq!(sink.records_for(CHECK, DATABASE).len(), 1);
    assert_eq!(sink.count_for(CHECK, DATABASE, ReportLevel::Correct), 1);
    assert_eq!(sink.count_for(CHECK, DATABASE, ReportLevel::Problem), 0);
    assert_eq!(sink.len(), 3);
}

#[rstest]
fn levels_are_ordered_by_severity() {
    assert!(ReportLevel::Info < ReportLevel::Correct);
    assert!(ReportLevel::Correct < ReportLevel::Warning);
    assert!(ReportLevel::Warning < ReportLevel::Problem);
    assert!(ReportLevel::Problem.is_failure());
    assert!(!ReportLevel::Warning.is_failure());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_keep_per_pair_order() {
    let sink = Arc::new(ReportSink::new(Arc::new(FixedClock::at_release())));
    let databases: Vec<String> = (0..8)
        .map(|index| format!("ens-staging:3306/db_{index}"))
        .collect();

    let handles: Vec<_> = databases
        .iter()
        .cloned()
        .map(|database| {
            let shared = Arc::clone(&sink);
            tokio::spawn(async move {
                for step in 0..50 {
                    shared.info(CHECK, &database, format!("step {step}"));
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.expect("appender task");
    }

    assert_eq!(sink.len(), 400);
    for database in &databases {
        let messages: Vec<String> = sink
            .records_for(CHECK, database)
            .iter()
            .map(|record| record.message().to_owned())
            .collect();
        let expected: Vec<String> = (0..50).map(|step| format!("step {step}")).collect();
        assert_eq!(messages, expected, "order for {database}");
    }
}

#[rstest]
fn export_contains_run_id_and_records(sink: ReportSink) {
    sink.problem(CHECK, DATABASE, "vanished");

    let exported = sink.export_json().expect("export");
    let value: serde_json::Value = serde_json::from_str(&exported).expect("valid json");

    assert_eq!(
        value.get("run_id").and_then(serde_json::Value::as_str),
        Some(sink.run_id().to_string().as_str())
    );
    let first = value
        .get("records")
        .and_then(|records| records.get(0))
        .expect("one record");
    assert_eq!(first.get("level").and_then(serde_json::Value::as_str), Some("PROBLEM"));
    assert_eq!(first.get("check").and_then(serde_json::Value::as_str), Some(CHECK));
}
