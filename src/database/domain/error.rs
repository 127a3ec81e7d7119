//! Error types for database domain validation.

use thiserror::Error;

/// Errors returned while constructing database domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatabaseDomainError {
    /// The server host is empty after trimming.
    #[error("server host must not be empty")]
    EmptyHost,

    /// The schema name is empty after trimming.
    #[error("schema name must not be empty")]
    EmptySchemaName,
}
