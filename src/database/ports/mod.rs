//! Port contracts for database access.
//!
//! Ports define infrastructure-agnostic interfaces used by the registry and
//! by individual checks.

pub mod connector;
pub mod sql;

pub use connector::DatabaseConnector;
pub use sql::{KeyedCount, KeyedId, SqlError, SqlExecutor, SqlResult};
