//! SQL executor port: the narrow surface through which checks query a
//! database.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Result type for SQL executor operations.
pub type SqlResult<T> = Result<T, SqlError>;

/// A `(key, count)` row, e.g. a biotype and its gene count.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyedCount {
    /// Entity key.
    pub key: String,
    /// Number of rows for the key.
    pub count: u64,
}

impl KeyedCount {
    /// Creates a keyed count.
    #[must_use]
    pub fn new(key: impl Into<String>, count: u64) -> Self {
        Self {
            key: key.into(),
            count,
        }
    }
}

/// A `(natural key, primary key)` row used for duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyedId {
    /// Natural key shared by duplicate rows.
    pub key: String,
    /// Primary key of the row.
    pub id: i64,
}

impl KeyedId {
    /// Creates a keyed id.
    #[must_use]
    pub fn new(key: impl Into<String>, id: i64) -> Self {
        Self {
            key: key.into(),
            id,
        }
    }
}

/// Read and write access to one database.
///
/// Result columns are bound by alias, so queries must name their columns:
///
/// - [`count`](Self::count): a single row with column `value`
/// - [`keyed_counts`](Self::keyed_counts): columns `entity_key`, `entity_count`
/// - [`keyed_ids`](Self::keyed_ids): columns `entity_key`, `row_id`
/// - [`strings`](Self::strings): column `value`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    /// Runs a query returning one integer.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError`] when the query fails or the result cannot be
    /// decoded.
    async fn count(&self, sql: &str) -> SqlResult<u64>;

    /// Runs a query returning `(key, count)` rows.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError`] when the query fails or the result cannot be
    /// decoded.
    async fn keyed_counts(&self, sql: &str) -> SqlResult<Vec<KeyedCount>>;

    /// Runs a query returning `(natural key, primary key)` rows.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError`] when the query fails or the result cannot be
    /// decoded.
    async fn keyed_ids(&self, sql: &str) -> SqlResult<Vec<KeyedId>>;

    /// Runs a query returning a single text column.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError`] when the query fails or the result cannot be
    /// decoded.
    async fn strings(&self, sql: &str) -> SqlResult<Vec<String>>;

    /// Executes a data-modifying statement and returns the affected row
    /// count.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError`] when the statement fails.
    async fn execute(&self, sql: &str) -> SqlResult<usize>;
}

/// Errors returned by SQL executor implementations.
#[derive(Debug, Clone, Error)]
pub enum SqlError {
    /// The statement was rejected or failed while running.
    #[error("query failed: {sql}: {cause}")]
    Query {
        /// Statement text.
        sql: String,
        /// Underlying driver error.
        cause: Arc<dyn std::error::Error + Send + Sync>,
    },

    /// The result could not be converted into the requested shape.
    #[error("could not decode result of {sql}: {reason}")]
    Decode {
        /// Statement text.
        sql: String,
        /// Description of the mismatch.
        reason: String,
    },

    /// No connection to the database could be obtained.
    #[error("connection error: {0}")]
    Connection(Arc<dyn std::error::Error + Send + Sync>),
}

impl SqlError {
    /// Wraps a driver error raised by a statement.
    pub fn query(
        sql: impl Into<String>,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Query {
            sql: sql.into(),
            cause: Arc::new(err),
        }
    }

    /// Reports a result-shape mismatch.
    pub fn decode(sql: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            sql: sql.into(),
            reason: reason.into(),
        }
    }

    /// Wraps a connection failure.
    pub fn connection(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Connection(Arc::new(err))
    }
}
