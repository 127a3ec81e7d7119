//! Directory of configured databases and the companion-resolution rules.
//!
//! Provides [`DatabaseRegistry`], the only way a check reaches a database
//! other than the one it was invoked on.

use crate::config::{ServerSettings, Settings};
use crate::database::{
    domain::{ConnectionDescriptor, DatabaseDomainError, DatabaseType, SpeciesCatalog},
    ports::{DatabaseConnector, SqlError, SqlExecutor},
};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Which configured server a descriptor was registered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerRole {
    /// The server holding the databases under test.
    Primary,
    /// The server holding the previous release.
    Secondary,
}

/// Outcome of resolving a companion database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanionLookup {
    /// A companion was found.
    Found(Arc<ConnectionDescriptor>),
    /// No companion exists; the reason is suitable for a report message.
    NotFound(String),
}

impl CompanionLookup {
    fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound(reason.into())
    }

    /// Returns the companion, if found.
    #[must_use]
    pub fn found(&self) -> Option<&Arc<ConnectionDescriptor>> {
        match self {
            Self::Found(descriptor) => Some(descriptor),
            Self::NotFound(_) => None,
        }
    }

    /// Converts into the companion, if found.
    #[must_use]
    pub fn into_found(self) -> Option<Arc<ConnectionDescriptor>> {
        match self {
            Self::Found(descriptor) => Some(descriptor),
            Self::NotFound(_) => None,
        }
    }
}

/// Errors returned by registry operations.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The descriptor is not part of this registry.
    #[error("database not registered: {0}")]
    NotRegistered(String),

    /// A lookup pattern is not a valid regular expression.
    #[error("invalid schema pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Offending pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// A schema name listed by a server failed validation.
    #[error(transparent)]
    Domain(#[from] DatabaseDomainError),

    /// Opening a connection or listing a server failed.
    #[error(transparent)]
    Connection(#[from] SqlError),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

struct RegistryEntry {
    descriptor: Arc<ConnectionDescriptor>,
    role: ServerRole,
    connection: Mutex<Option<Arc<dyn SqlExecutor>>>,
}

impl RegistryEntry {
    fn matches(&self, descriptor: &ConnectionDescriptor) -> bool {
        self.descriptor.same_server(descriptor) && self.descriptor.name() == descriptor.name()
    }
}

/// Registry of configured databases with lazily opened, shared connections.
///
/// Lookups iterate descriptors in registration order, so they are
/// deterministic for a given population. Each descriptor is opened at most
/// once for the registry's lifetime.
pub struct DatabaseRegistry {
    catalog: Arc<SpeciesCatalog>,
    connector: Arc<dyn DatabaseConnector>,
    entries: Vec<RegistryEntry>,
}

impl fmt::Debug for DatabaseRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseRegistry")
            .field(
                "databases",
                &self
                    .entries
                    .iter()
                    .map(|entry| (entry.descriptor.to_string(), entry.role))
                    .collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

impl DatabaseRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(catalog: Arc<SpeciesCatalog>, connector: Arc<dyn DatabaseConnector>) -> Self {
        Self {
            catalog,
            connector,
            entries: Vec::new(),
        }
    }

    /// Builds a registry from the servers named in the settings.
    ///
    /// Every schema listed by the primary server that matches its patterns
    /// is registered first, followed by matching schemas on the secondary
    /// server, each in server listing order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Connection`] when a server cannot be listed.
    pub async fn populate(
        settings: &Settings,
        catalog: Arc<SpeciesCatalog>,
        connector: Arc<dyn DatabaseConnector>,
    ) -> RegistryResult<Self> {
        let mut registry = Self::new(catalog, connector);
        registry
            .register_server(settings.primary(), ServerRole::Primary)
            .await?;
        if let Some(secondary) = settings.secondary() {
            registry
                .register_server(secondary, ServerRole::Secondary)
                .await?;
        }
        tracing::info!(databases = registry.entries.len(), "database registry populated");
        Ok(registry)
    }

    async fn register_server(
        &mut self,
        server: &ServerSettings,
        role: ServerRole,
    ) -> RegistryResult<()> {
        let schemas = self
            .connector
            .list_schemas(server.address(), server.credentials())
            .await?;
        for schema in schemas.iter().filter(|name| server.selects(name)) {
            let descriptor = ConnectionDescriptor::new(
                server.address().clone(),
                server.credentials().clone(),
                schema,
                &self.catalog,
            )?;
            self.register_with_role(descriptor, role);
        }
        Ok(())
    }

    /// Returns the species catalogue used to parse schema names.
    #[must_use]
    pub fn catalog(&self) -> &SpeciesCatalog {
        &self.catalog
    }

    /// Registers a database under test.
    ///
    /// Registering the same server and schema twice returns the existing
    /// descriptor.
    pub fn register(&mut self, descriptor: ConnectionDescriptor) -> Arc<ConnectionDescriptor> {
        self.register_with_role(descriptor, ServerRole::Primary)
    }

    /// Registers a database on the secondary (previous release) server.
    pub fn register_secondary(
        &mut self,
        descriptor: ConnectionDescriptor,
    ) -> Arc<ConnectionDescriptor> {
        self.register_with_role(descriptor, ServerRole::Secondary)
    }

    fn register_with_role(
        &mut self,
        descriptor: ConnectionDescriptor,
        role: ServerRole,
    ) -> Arc<ConnectionDescriptor> {
        if let Some(existing) = self.entries.iter().find(|entry| entry.matches(&descriptor)) {
            return Arc::clone(&existing.descriptor);
        }
        let shared = Arc::new(descriptor);
        self.entries.push(RegistryEntry {
            descriptor: Arc::clone(&shared),
            role,
            connection: Mutex::new(None),
        });
        shared
    }

    /// Returns the databases under test in registration order, optionally
    /// restricted to one type. Secondary-server databases are excluded.
    #[must_use]
    pub fn get_all(&self, database_type: Option<DatabaseType>) -> Vec<Arc<ConnectionDescriptor>> {
        self.entries
            .iter()
            .filter(|entry| entry.role == ServerRole::Primary)
            .filter(|entry| {
                database_type.is_none_or(|kind| entry.descriptor.database_type() == kind)
            })
            .map(|entry| Arc::clone(&entry.descriptor))
            .collect()
    }

    /// Returns the role a descriptor was registered with.
    #[must_use]
    pub fn role_of(&self, descriptor: &ConnectionDescriptor) -> Option<ServerRole> {
        self.entry_for(descriptor).map(|entry| entry.role)
    }

    /// Finds the first registered database whose schema name equals `name`.
    #[must_use]
    pub fn get_by_exact_name(&self, name: &str) -> Option<Arc<ConnectionDescriptor>> {
        self.entries
            .iter()
            .find(|entry| entry.descriptor.name() == name)
            .map(|entry| Arc::clone(&entry.descriptor))
    }

    /// Returns every registered database whose whole schema name matches the
    /// regular expression, in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidPattern`] when the pattern does not
    /// compile.
    pub fn get_by_pattern(&self, pattern: &str) -> RegistryResult<Vec<Arc<ConnectionDescriptor>>> {
        let compiled = Regex::new(&format!("^(?:{pattern})$")).map_err(|err| {
            RegistryError::InvalidPattern {
                pattern: pattern.to_owned(),
                reason: err.to_string(),
            }
        })?;
        Ok(self
            .entries
            .iter()
            .filter(|entry| compiled.is_match(entry.descriptor.name()))
            .map(|entry| Arc::clone(&entry.descriptor))
            .collect())
    }

    /// Resolves a pattern to a single database.
    ///
    /// When several databases match, the first in registration order wins
    /// and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidPattern`] when the pattern does not
    /// compile.
    pub fn resolve_pattern(&self, pattern: &str) -> RegistryResult<CompanionLookup> {
        let matches = self.get_by_pattern(pattern)?;
        Ok(pick_first(matches, pattern))
    }

    /// Resolves the core database of the same species and release.
    ///
    /// The name `{species}_core_{schemaVersion}_{geneBuildVersion}` is built
    /// from the descriptor and looked up on the same server first, then on
    /// any server. A core database is its own companion.
    #[must_use]
    pub fn core_database_for(&self, descriptor: &ConnectionDescriptor) -> CompanionLookup {
        if descriptor.database_type() == DatabaseType::Core {
            return self.entry_for(descriptor).map_or_else(
                || CompanionLookup::not_found(format!("{} is not registered", descriptor.name())),
                |entry| CompanionLookup::Found(Arc::clone(&entry.descriptor)),
            );
        }

        let Some(core_name) = descriptor.schema().sibling_name(DatabaseType::Core) else {
            return CompanionLookup::not_found(format!(
                "cannot derive a core database name from {}",
                descriptor.name()
            ));
        };

        let candidates: Vec<Arc<ConnectionDescriptor>> = self
            .entries
            .iter()
            .filter(|entry| entry.descriptor.name() == core_name)
            .map(|entry| Arc::clone(&entry.descriptor))
            .collect();
        let (local, remote): (Vec<_>, Vec<_>) = candidates
            .into_iter()
            .partition(|candidate| candidate.same_server(descriptor));
        let preferred = if local.is_empty() { remote } else { local };

        match pick_first(preferred, &core_name) {
            CompanionLookup::NotFound(_) => CompanionLookup::not_found(format!(
                "no core database {core_name} registered for {}",
                descriptor.name()
            )),
            found @ CompanionLookup::Found(_) => found,
        }
    }

    /// Finds the previous-release copy of a database on the secondary
    /// server.
    ///
    /// Candidates share the species and type. The highest schema version not
    /// newer than the descriptor's wins, preferring a matching gene-build
    /// version, then registration order. Absence, including when no
    /// secondary server is configured, is never an error.
    #[must_use]
    pub fn get_equivalent_from_secondary_server(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> CompanionLookup {
        let mut secondaries = self
            .entries
            .iter()
            .filter(|entry| entry.role == ServerRole::Secondary)
            .peekable();
        if secondaries.peek().is_none() {
            return CompanionLookup::not_found("no secondary server configured");
        }
        if !descriptor.species().is_known() {
            return CompanionLookup::not_found(format!(
                "species of {} is unknown",
                descriptor.name()
            ));
        }

        let current = descriptor.schema();
        let best = secondaries
            .filter(|entry| {
                entry.descriptor.species() == descriptor.species()
                    && entry.descriptor.database_type() == descriptor.database_type()
            })
            .filter_map(|entry| {
                let candidate = entry.descriptor.schema();
                let version_rank = match (candidate.schema_version(), current.schema_version()) {
                    (Some(found), Some(wanted)) if found <= wanted => Some(found),
                    (None, None) => Some(0),
                    _ => None,
                }?;
                let same_build = candidate.gene_build_version() == current.gene_build_version();
                Some(((version_rank, same_build), &entry.descriptor))
            })
            .fold(None, |best: Option<((u32, bool), &Arc<ConnectionDescriptor>)>, item| {
                match best {
                    Some(kept) if kept.0 >= item.0 => Some(kept),
                    _ => Some(item),
                }
            });

        best.map_or_else(
            || {
                CompanionLookup::not_found(format!(
                    "no equivalent of {} on the secondary server",
                    descriptor.name()
                ))
            },
            |(_, found)| CompanionLookup::Found(Arc::clone(found)),
        )
    }

    /// Returns the shared connection for a registered database, opening it
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotRegistered`] for unknown descriptors and
    /// [`RegistryError::Connection`] when the connector fails.
    pub fn open(&self, descriptor: &ConnectionDescriptor) -> RegistryResult<Arc<dyn SqlExecutor>> {
        let entry = self
            .entry_for(descriptor)
            .ok_or_else(|| RegistryError::NotRegistered(descriptor.to_string()))?;
        let mut slot = entry
            .connection
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.as_ref() {
            return Ok(Arc::clone(existing));
        }
        let opened = self.connector.open(&entry.descriptor)?;
        tracing::debug!(database = %entry.descriptor, "opened database connection");
        *slot = Some(Arc::clone(&opened));
        Ok(opened)
    }

    fn entry_for(&self, descriptor: &ConnectionDescriptor) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.matches(descriptor))
    }
}

fn pick_first(matches: Vec<Arc<ConnectionDescriptor>>, pattern: &str) -> CompanionLookup {
    if matches.len() > 1 {
        tracing::warn!(
            pattern,
            candidates = matches.len(),
            chosen = %matches.first().map(|m| m.to_string()).unwrap_or_default(),
            "ambiguous database lookup; using first registered match"
        );
    }
    matches.into_iter().next().map_or_else(
        || CompanionLookup::not_found(format!("no database matches {pattern}")),
        CompanionLookup::Found,
    )
}
