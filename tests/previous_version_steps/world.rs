//! Shared world state for previous-release comparison scenarios.

use std::sync::Arc;

use ensembl_healthchecks::config::{ServerSettings, Settings};
use ensembl_healthchecks::database::{
    adapters::memory::{InMemoryConnector, InMemorySqlExecutor},
    domain::{ConnectionDescriptor, Credentials, ServerAddress, SpeciesCatalog},
    ports::DatabaseConnector,
    services::DatabaseRegistry,
};
use ensembl_healthchecks::healthcheck::services::CheckEnvironment;
use ensembl_healthchecks::report::services::ReportSink;
use rstest::fixture;

/// Query every scripted database answers with per-biotype gene counts.
pub const COUNTS_SQL: &str =
    "SELECT biotype AS entity_key, COUNT(*) AS entity_count FROM gene GROUP BY biotype";

/// One scripted database awaiting registration.
pub struct ScriptedDatabase {
    /// Schema name.
    pub name: String,
    /// Counts returned for [`COUNTS_SQL`].
    pub counts: Vec<(String, u64)>,
}

/// Scenario world for previous-release comparisons.
#[derive(Default)]
pub struct ComparisonWorld {
    /// Database on the staging server.
    pub current: Option<ScriptedDatabase>,
    /// Database on the live server, if any.
    pub previous: Option<ScriptedDatabase>,
    /// Whether previous-release checks are switched off.
    pub skip_previous: bool,
    /// Environment the comparison ran in.
    pub environment: Option<CheckEnvironment>,
    /// Value returned by the comparison.
    pub outcome: Option<bool>,
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ComparisonWorld {
    ComparisonWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

fn register(
    host: &str,
    database: &ScriptedDatabase,
    connector: InMemoryConnector,
) -> eyre::Result<(InMemoryConnector, ConnectionDescriptor)> {
    let server = ServerAddress::new(host, 3306)?;
    let executor = InMemorySqlExecutor::new()
        .with_keyed_counts(COUNTS_SQL, database.counts.iter().cloned());
    let descriptor = ConnectionDescriptor::new(
        server.clone(),
        Credentials::default(),
        &database.name,
        &SpeciesCatalog::standard(),
    )?;
    Ok((
        connector.with_database(&server, &database.name, Arc::new(executor)),
        descriptor,
    ))
}

impl ComparisonWorld {
    /// Builds the registry and environment from the scripted databases.
    pub fn build_environment(&self) -> eyre::Result<CheckEnvironment> {
        let current = self
            .current
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no database under test in scenario world"))?;
        let (connector, current_descriptor) =
            register("ens-staging", current, InMemoryConnector::new())?;
        let (full_connector, previous_descriptor) = match &self.previous {
            Some(previous) => {
                let (extended, descriptor) = register("ens-live", previous, connector)?;
                (extended, Some(descriptor))
            }
            None => (connector, None),
        };

        let shared: Arc<dyn DatabaseConnector> = Arc::new(full_connector);
        let mut registry = DatabaseRegistry::new(Arc::new(SpeciesCatalog::standard()), shared);
        registry.register(current_descriptor);
        if let Some(descriptor) = previous_descriptor {
            registry.register_secondary(descriptor);
        }

        let settings = Settings::new(ServerSettings::new(
            ServerAddress::new("ens-staging", 3306)?,
            Credentials::default(),
            [".*"],
        )?)
        .with_skip_previous_checks(self.skip_previous);

        Ok(CheckEnvironment::new(
            Arc::new(registry),
            Arc::new(ReportSink::default()),
            Arc::new(settings),
        ))
    }
}
