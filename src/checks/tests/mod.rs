//! Unit tests for the concrete checks.

mod data_file_tests;
mod duplicate_meta_tests;

use std::sync::Arc;

use crate::config::{ServerSettings, Settings};
use crate::database::{
    adapters::memory::{InMemoryConnector, InMemorySqlExecutor},
    domain::{ConnectionDescriptor, Credentials, ServerAddress, SpeciesCatalog},
    services::DatabaseRegistry,
};
use crate::healthcheck::{
    ports::{Healthcheck, HealthcheckType},
    services::{CheckEnvironment, SuiteRunner},
};
use crate::report::domain::{ReportLevel, ReportRecord, SuiteSummary};
use crate::report::services::ReportSink;

const STAGING: &str = "ens-staging";
const LIVE: &str = "ens-live";

fn descriptor(host: &str, name: &str) -> ConnectionDescriptor {
    ConnectionDescriptor::new(
        ServerAddress::new(host, 3306).expect("valid server"),
        Credentials::new("ensro", None),
        name,
        &SpeciesCatalog::standard(),
    )
    .expect("valid descriptor")
}

/// Label records are filed under for a staging database.
fn staging_label(name: &str) -> String {
    descriptor(STAGING, name).to_string()
}

fn settings() -> Settings {
    Settings::new(
        ServerSettings::new(
            ServerAddress::new(STAGING, 3306).expect("valid server"),
            Credentials::default(),
            [".*"],
        )
        .expect("valid server settings"),
    )
}

/// Databases on the staging (under test) and live (previous release)
/// servers, each answering from a scripted executor.
#[derive(Default)]
struct Release {
    connector: InMemoryConnector,
    staging: Vec<ConnectionDescriptor>,
    live: Vec<ConnectionDescriptor>,
}

impl Release {
    fn staging(mut self, name: &str, executor: Arc<InMemorySqlExecutor>) -> Self {
        let database = descriptor(STAGING, name);
        self.connector = self
            .connector
            .with_database(database.server(), name, executor);
        self.staging.push(database);
        self
    }

    fn live(mut self, name: &str, executor: Arc<InMemorySqlExecutor>) -> Self {
        let database = descriptor(LIVE, name);
        self.connector = self
            .connector
            .with_database(database.server(), name, executor);
        self.live.push(database);
        self
    }

    fn environment(self) -> CheckEnvironment {
        let mut registry = DatabaseRegistry::new(
            Arc::new(SpeciesCatalog::standard()),
            Arc::new(self.connector),
        );
        for database in self.staging {
            registry.register(database);
        }
        for database in self.live {
            registry.register_secondary(database);
        }
        CheckEnvironment::new(
            Arc::new(registry),
            Arc::new(ReportSink::default()),
            Arc::new(settings()),
        )
    }
}

async fn run_check<T: HealthcheckType>(environment: &CheckEnvironment) -> SuiteSummary {
    let check: Arc<dyn Healthcheck> = Arc::new(T::create());
    SuiteRunner::new(environment.clone())
        .run_checks(vec![check])
        .await
}

/// Levels recorded for one check against one staging database, in order.
fn levels(environment: &CheckEnvironment, check: &str, database: &str) -> Vec<ReportLevel> {
    environment
        .sink()
        .records_for(check, &staging_label(database))
        .iter()
        .map(ReportRecord::level)
        .collect()
}

fn messages(environment: &CheckEnvironment, check: &str, database: &str) -> Vec<String> {
    environment
        .sink()
        .records_for(check, &staging_label(database))
        .iter()
        .map(|record| record.message().to_owned())
        .collect()
}
