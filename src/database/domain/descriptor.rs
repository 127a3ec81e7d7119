//! Immutable description of one reachable database.

use super::{DatabaseDomainError, DatabaseType, SchemaName, Species, SpeciesCatalog};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Host and port of a database server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ServerAddress {
    host: String,
    port: u16,
}

impl ServerAddress {
    /// Creates a validated server address. The host is trimmed and
    /// lowercased.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseDomainError::EmptyHost`] when the host is blank.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, DatabaseDomainError> {
        let normalized = host.into().trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(DatabaseDomainError::EmptyHost);
        }
        Ok(Self {
            host: normalized,
            port,
        })
    }

    /// Returns the host name.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Login credentials for a server.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Credentials {
    user: String,
    #[serde(skip_serializing, default)]
    password: Option<String>,
}

impl Credentials {
    /// Creates credentials; an empty password is treated as absent.
    #[must_use]
    pub fn new(user: impl Into<String>, password: Option<String>) -> Self {
        Self {
            user: user.into(),
            password: password.filter(|value| !value.is_empty()),
        }
    }

    /// Returns the user name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A configured database: where it lives, how to log in, and what its name
/// says about it.
///
/// Descriptors are built once while the registry is populated and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    server: ServerAddress,
    credentials: Credentials,
    schema: SchemaName,
}

impl ConnectionDescriptor {
    /// Creates a descriptor, inferring species, type and versions from the
    /// schema name.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseDomainError::EmptySchemaName`] when the schema name
    /// is blank.
    pub fn new(
        server: ServerAddress,
        credentials: Credentials,
        schema_name: &str,
        catalog: &SpeciesCatalog,
    ) -> Result<Self, DatabaseDomainError> {
        let trimmed = schema_name.trim();
        if trimmed.is_empty() {
            return Err(DatabaseDomainError::EmptySchemaName);
        }
        Ok(Self {
            server,
            credentials,
            schema: SchemaName::parse(trimmed, catalog),
        })
    }

    /// Returns the server address.
    #[must_use]
    pub const fn server(&self) -> &ServerAddress {
        &self.server
    }

    /// Returns the login credentials.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the parsed schema name.
    #[must_use]
    pub const fn schema(&self) -> &SchemaName {
        &self.schema
    }

    /// Returns the schema name as registered.
    #[must_use]
    pub fn name(&self) -> &str {
        self.schema.as_str()
    }

    /// Returns the inferred species.
    #[must_use]
    pub const fn species(&self) -> &Species {
        self.schema.species()
    }

    /// Returns the inferred database type.
    #[must_use]
    pub const fn database_type(&self) -> DatabaseType {
        self.schema.database_type()
    }

    /// Returns `true` when both descriptors live on the same server, which
    /// is when cross-database joins between them are legal.
    #[must_use]
    pub fn same_server(&self, other: &Self) -> bool {
        self.server == other.server
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.server, self.schema)
    }
}
