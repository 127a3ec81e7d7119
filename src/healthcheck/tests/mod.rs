//! Unit tests for the healthcheck context.

mod runner_tests;
mod stub_checks;

use std::sync::Arc;

use crate::config::{ServerSettings, Settings};
use crate::database::{
    adapters::memory::{InMemoryConnector, InMemorySqlExecutor},
    domain::{ConnectionDescriptor, Credentials, ServerAddress, SpeciesCatalog},
    services::DatabaseRegistry,
};
use crate::healthcheck::services::CheckEnvironment;
use crate::report::services::ReportSink;

pub(super) const STAGING: &str = "ens-staging";
pub(super) const LIVE: &str = "ens-live";

pub(super) fn server(host: &str) -> ServerAddress {
    ServerAddress::new(host, 3306).expect("valid server")
}

pub(super) fn descriptor(host: &str, name: &str) -> ConnectionDescriptor {
    ConnectionDescriptor::new(
        server(host),
        Credentials::new("ensro", None),
        name,
        &SpeciesCatalog::standard(),
    )
    .expect("valid descriptor")
}

pub(super) fn settings() -> Settings {
    Settings::new(
        ServerSettings::new(server(STAGING), Credentials::default(), [".*"])
            .expect("valid server settings"),
    )
}

/// Scripted databases on the staging (primary) and live (secondary)
/// servers.
#[derive(Default)]
pub(super) struct Servers {
    connector: InMemoryConnector,
    primary: Vec<ConnectionDescriptor>,
    secondary: Vec<ConnectionDescriptor>,
}

impl Servers {
    pub(super) fn primary(mut self, name: &str, executor: InMemorySqlExecutor) -> Self {
        self.connector = self
            .connector
            .with_database(&server(STAGING), name, Arc::new(executor));
        self.primary.push(descriptor(STAGING, name));
        self
    }

    pub(super) fn secondary(mut self, name: &str, executor: InMemorySqlExecutor) -> Self {
        self.connector = self
            .connector
            .with_database(&server(LIVE), name, Arc::new(executor));
        self.secondary.push(descriptor(LIVE, name));
        self
    }

    /// Registers a primary database the connector cannot open.
    pub(super) fn unreachable(mut self, name: &str) -> Self {
        self.primary.push(descriptor(STAGING, name));
        self
    }

    pub(super) fn environment(self, run_settings: Settings) -> CheckEnvironment {
        let mut registry = DatabaseRegistry::new(
            Arc::new(SpeciesCatalog::standard()),
            Arc::new(self.connector),
        );
        for database in self.primary {
            registry.register(database);
        }
        for database in self.secondary {
            registry.register_secondary(database);
        }
        CheckEnvironment::new(
            Arc::new(registry),
            Arc::new(ReportSink::default()),
            Arc::new(run_settings),
        )
    }
}
