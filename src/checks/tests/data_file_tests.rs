//! Tests for the data file existence check.

use std::sync::Arc;

use super::{Release, levels, messages, run_check};
use crate::checks::DataFilesExist;
use crate::checks::data_files::DATA_FILE_PATHS_SQL;
use crate::database::adapters::memory::InMemorySqlExecutor;
use crate::healthcheck::{adapters::files::InMemoryFileProbe, services::CheckEnvironment};
use crate::report::domain::ReportLevel;
use rstest::{fixture, rstest};

const FUNCGEN: &str = "mus_musculus_funcgen_110_39";
const CHECK: &str = "DataFilesExist";

#[fixture]
fn registered_files() -> CheckEnvironment {
    Release::default()
        .staging(
            FUNCGEN,
            Arc::new(InMemorySqlExecutor::new().with_strings(
                DATA_FILE_PATHS_SQL,
                ["/data/funcgen/peaks.bb", "/data/funcgen/signal.bw"],
            )),
        )
        .environment()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn every_missing_file_is_reported(registered_files: CheckEnvironment) {
    let environment = registered_files
        .with_file_probe(Arc::new(InMemoryFileProbe::new(["/data/funcgen/peaks.bb"])));

    let summary = run_check::<DataFilesExist>(&environment).await;

    assert_eq!(summary.failed(), 1);
    assert_eq!(
        messages(&environment, CHECK, FUNCGEN),
        ["data file /data/funcgen/signal.bw does not exist"]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn present_files_pass(registered_files: CheckEnvironment) {
    let environment = registered_files.with_file_probe(Arc::new(InMemoryFileProbe::new([
        "/data/funcgen/peaks.bb",
        "/data/funcgen/signal.bw",
    ])));

    let summary = run_check::<DataFilesExist>(&environment).await;

    assert!(summary.is_success());
    assert_eq!(levels(&environment, CHECK, FUNCGEN), [ReportLevel::Correct]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unconfigured_root_warns_and_passes(registered_files: CheckEnvironment) {
    let summary = run_check::<DataFilesExist>(&registered_files).await;

    assert!(summary.is_success());
    assert_eq!(summary.warnings(), 1);
    assert_eq!(levels(&registered_files, CHECK, FUNCGEN), [ReportLevel::Warning]);
}
