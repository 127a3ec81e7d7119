//! In-memory SQL executor and connector for tests and dry runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::database::{
    domain::{ConnectionDescriptor, Credentials, ServerAddress},
    ports::{DatabaseConnector, KeyedCount, KeyedId, SqlError, SqlExecutor, SqlResult},
};

#[derive(Debug, Clone)]
enum ScriptedResponse {
    Count(u64),
    KeyedCounts(Vec<KeyedCount>),
    KeyedIds(Vec<KeyedId>),
    Strings(Vec<String>),
    Affected(usize),
    Failure(String),
}

/// SQL executor answering from scripted responses keyed by statement text.
///
/// Read queries without a scripted response fail with a query error.
/// Unscripted statements passed to [`SqlExecutor::execute`] succeed and
/// affect zero rows. Every statement is recorded in call order.
#[derive(Debug, Default)]
pub struct InMemorySqlExecutor {
    responses: HashMap<String, ScriptedResponse>,
    statements: Mutex<Vec<String>>,
}

impl InMemorySqlExecutor {
    /// Creates an executor with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts a single-value response.
    #[must_use]
    pub fn with_count(self, sql: impl Into<String>, value: u64) -> Self {
        self.with_response(sql, ScriptedResponse::Count(value))
    }

    /// Scripts a `(key, count)` response.
    #[must_use]
    pub fn with_keyed_counts<K: Into<String>>(
        self,
        sql: impl Into<String>,
        rows: impl IntoIterator<Item = (K, u64)>,
    ) -> Self {
        let counts = rows
            .into_iter()
            .map(|(key, count)| KeyedCount::new(key, count))
            .collect();
        self.with_response(sql, ScriptedResponse::KeyedCounts(counts))
    }

    /// Scripts a `(natural key, primary key)` response.
    #[must_use]
    pub fn with_keyed_ids(self, sql: impl Into<String>, rows: Vec<KeyedId>) -> Self {
        self.with_response(sql, ScriptedResponse::KeyedIds(rows))
    }

    /// Scripts a single-text-column response.
    #[must_use]
    pub fn with_strings(
        self,
        sql: impl Into<String>,
        rows: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        let values = rows.into_iter().map(str::to_owned).collect();
        self.with_response(sql, ScriptedResponse::Strings(values))
    }

    /// Scripts the affected-row count of a modifying statement.
    #[must_use]
    pub fn with_affected(self, sql: impl Into<String>, rows: usize) -> Self {
        self.with_response(sql, ScriptedResponse::Affected(rows))
    }

    /// Scripts a failure for a statement.
    #[must_use]
    pub fn with_failure(self, sql: impl Into<String>, message: impl Into<String>) -> Self {
        self.with_response(sql, ScriptedResponse::Failure(message.into()))
    }

    /// Returns every statement received so far, in call order.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn with_response(mut self, sql: impl Into<String>, response: ScriptedResponse) -> Self {
        self.responses.insert(sql.into(), response);
        self
    }

    fn lookup(&self, sql: &str) -> Option<ScriptedResponse> {
        self.statements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sql.to_owned());
        self.responses.get(sql).cloned()
    }

    fn respond(&self, sql: &str) -> SqlResult<ScriptedResponse> {
        match self.lookup(sql) {
            Some(ScriptedResponse::Failure(message)) => {
                Err(SqlError::query(sql, std::io::Error::other(message)))
            }
            Some(response) => Ok(response),
            None => Err(SqlError::query(
                sql,
                std::io::Error::other("no scripted response"),
            )),
        }
    }
}

fn shape_mismatch(sql: &str, expected: &str) -> SqlError {
    SqlError::decode(sql, format!("scripted response is not {expected}"))
}

#[async_trait]
impl SqlExecutor for InMemorySqlExecutor {
    async fn count(&self, sql: &str) -> SqlResult<u64> {
        match self.respond(sql)? {
            ScriptedResponse::Count(value) => Ok(value),
            _ => Err(shape_mismatch(sql, "a single value")),
        }
    }

    async fn keyed_counts(&self, sql: &str) -> SqlResult<Vec<KeyedCount>> {
        match self.respond(sql)? {
            ScriptedResponse::KeyedCounts(rows) => Ok(rows),
            _ => Err(shape_mismatch(sql, "keyed counts")),
        }
    }

    async fn keyed_ids(&self, sql: &str) -> SqlResult<Vec<KeyedId>> {
        match self.respond(sql)? {
            ScriptedResponse::KeyedIds(rows) => Ok(rows),
            _ => Err(shape_mismatch(sql, "keyed ids")),
        }
    }

    async fn strings(&self, sql: &str) -> SqlResult<Vec<String>> {
        match self.respond(sql)? {
            ScriptedResponse::Strings(rows) => Ok(rows),
            _ => Err(shape_mismatch(sql, "text values")),
        }
    }

    async fn execute(&self, sql: &str) -> SqlResult<usize> {
        match self.lookup(sql) {
            Some(ScriptedResponse::Affected(rows)) => Ok(rows),
            Some(ScriptedResponse::Failure(message)) => {
                Err(SqlError::query(sql, std::io::Error::other(message)))
            }
            Some(_) => Err(shape_mismatch(sql, "an affected-row count")),
            None => Ok(0),
        }
    }
}

type DatabaseKey = (ServerAddress, String);

/// Connector serving [`InMemorySqlExecutor`]s registered per server and
/// schema name.
#[derive(Debug, Default)]
pub struct InMemoryConnector {
    schemas: HashMap<ServerAddress, Vec<String>>,
    executors: HashMap<DatabaseKey, Arc<InMemorySqlExecutor>>,
    opened: Mutex<HashMap<DatabaseKey, usize>>,
}

impl InMemoryConnector {
    /// Creates a connector with no servers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema to a server, served by the given executor.
    ///
    /// Schemas are listed in the order they are added.
    #[must_use]
    pub fn with_database(
        mut self,
        server: &ServerAddress,
        schema_name: impl Into<String>,
        executor: Arc<InMemorySqlExecutor>,
    ) -> Self {
        let name = schema_name.into();
        self.schemas
            .entry(server.clone())
            .or_default()
            .push(name.clone());
        self.executors.insert((server.clone(), name), executor);
        self
    }

    /// Returns how many times a connection was opened for a descriptor.
    #[must_use]
    pub fn open_count(&self, descriptor: &ConnectionDescriptor) -> usize {
        let key = (descriptor.server().clone(), descriptor.name().to_owned());
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl DatabaseConnector for InMemoryConnector {
    fn open(&self, descriptor: &ConnectionDescriptor) -> SqlResult<Arc<dyn SqlExecutor>> {
        let key = (descriptor.server().clone(), descriptor.name().to_owned());
        let executor: Arc<dyn SqlExecutor> = self.executors.get(&key).cloned().ok_or_else(|| {
            SqlError::connection(std::io::Error::other(format!(
                "unknown database {descriptor}"
            )))
        })?;
        let mut opened = self.opened.lock().unwrap_or_else(PoisonError::into_inner);
        let count = opened.entry(key).or_insert(0);
        *count = count.saturating_add(1);
        Ok(executor)
    }

    async fn list_schemas(
        &self,
        server: &ServerAddress,
        _credentials: &Credentials,
    ) -> SqlResult<Vec<String>> {
        self.schemas.get(server).cloned().ok_or_else(|| {
            SqlError::connection(std::io::Error::other(format!("unknown server {server}")))
        })
    }
}
