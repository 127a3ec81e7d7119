//! MySQL adapters built on Diesel with one lazily-connected pool per
//! database.

use async_trait::async_trait;
use diesel::mysql::MysqlConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{BigInt, Text};
use std::sync::Arc;

use crate::database::{
    domain::{ConnectionDescriptor, Credentials, ServerAddress},
    ports::{DatabaseConnector, KeyedCount, KeyedId, SqlError, SqlExecutor, SqlResult},
};

/// MySQL connection pool type used by the executor.
pub type MysqlPool = Pool<ConnectionManager<MysqlConnection>>;

const SCHEMA_LISTING: &str =
    "SELECT schema_name AS value FROM information_schema.schemata ORDER BY schema_name";

#[derive(QueryableByName)]
struct ValueRow {
    #[diesel(sql_type = BigInt)]
    value: i64,
}

#[derive(QueryableByName)]
struct KeyedCountRow {
    #[diesel(sql_type = Text)]
    entity_key: String,
    #[diesel(sql_type = BigInt)]
    entity_count: i64,
}

#[derive(QueryableByName)]
struct KeyedIdRow {
    #[diesel(sql_type = Text)]
    entity_key: String,
    #[diesel(sql_type = BigInt)]
    row_id: i64,
}

#[derive(QueryableByName)]
struct TextRow {
    #[diesel(sql_type = Text)]
    value: String,
}

/// MySQL-backed SQL executor.
///
/// The pool holds at most one connection, so one statement is in flight per
/// database at a time.
#[derive(Debug, Clone)]
pub struct MysqlSqlExecutor {
    pool: MysqlPool,
}

impl MysqlSqlExecutor {
    /// Creates an executor from a pool.
    #[must_use]
    pub const fn new(pool: MysqlPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, operation: F) -> SqlResult<T>
    where
        F: FnOnce(&mut MysqlConnection) -> SqlResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(SqlError::connection)?;
            operation(&mut connection)
        })
        .await
        .map_err(SqlError::connection)?
    }

    async fn load<R>(&self, sql: &str) -> SqlResult<Vec<R>>
    where
        R: QueryableByName<diesel::mysql::Mysql> + Send + 'static,
    {
        let statement = sql.to_owned();
        self.run_blocking(move |connection| {
            diesel::sql_query(&statement)
                .load::<R>(connection)
                .map_err(|err| SqlError::query(&statement, err))
        })
        .await
    }
}

fn non_negative(sql: &str, value: i64) -> SqlResult<u64> {
    u64::try_from(value).map_err(|_| SqlError::decode(sql, format!("negative count {value}")))
}

#[async_trait]
impl SqlExecutor for MysqlSqlExecutor {
    async fn count(&self, sql: &str) -> SqlResult<u64> {
        let rows = self.load::<ValueRow>(sql).await?;
        let first = rows
            .into_iter()
            .next()
            .ok_or_else(|| SqlError::decode(sql, "query returned no rows"))?;
        non_negative(sql, first.value)
    }

    async fn keyed_counts(&self, sql: &str) -> SqlResult<Vec<KeyedCount>> {
        self.load::<KeyedCountRow>(sql)
            .await?
            .into_iter()
            .map(|row| Ok(KeyedCount::new(row.entity_key, non_negative(sql, row.entity_count)?)))
            .collect()
    }

    async fn keyed_ids(&self, sql: &str) -> SqlResult<Vec<KeyedId>> {
        Ok(self
            .load::<KeyedIdRow>(sql)
            .await?
            .into_iter()
            .map(|row| KeyedId::new(row.entity_key, row.row_id))
            .collect())
    }

    async fn strings(&self, sql: &str) -> SqlResult<Vec<String>> {
        Ok(self
            .load::<TextRow>(sql)
            .await?
            .into_iter()
            .map(|row| row.value)
            .collect())
    }

    async fn execute(&self, sql: &str) -> SqlResult<usize> {
        let statement = sql.to_owned();
        self.run_blocking(move |connection| {
            diesel::sql_query(&statement)
                .execute(connection)
                .map_err(|err| SqlError::query(&statement, err))
        })
        .await
    }
}

/// Connector creating [`MysqlSqlExecutor`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlConnector;

impl MysqlConnector {
    /// Creates a connector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DatabaseConnector for MysqlConnector {
    fn open(&self, descriptor: &ConnectionDescriptor) -> SqlResult<Arc<dyn SqlExecutor>> {
        let url = connection_url(
            descriptor.server(),
            descriptor.credentials(),
            Some(descriptor.name()),
        );
        let pool = Pool::builder()
            .max_size(1)
            .build_unchecked(ConnectionManager::<MysqlConnection>::new(url));
        Ok(Arc::new(MysqlSqlExecutor::new(pool)))
    }

    async fn list_schemas(
        &self,
        server: &ServerAddress,
        credentials: &Credentials,
    ) -> SqlResult<Vec<String>> {
        let url = connection_url(server, credentials, None);
        tokio::task::spawn_blocking(move || {
            let mut connection =
                MysqlConnection::establish(&url).map_err(SqlError::connection)?;
            diesel::sql_query(SCHEMA_LISTING)
                .load::<TextRow>(&mut connection)
                .map(|rows| rows.into_iter().map(|row| row.value).collect())
                .map_err(|err| SqlError::query(SCHEMA_LISTING, err))
        })
        .await
        .map_err(SqlError::connection)?
    }
}

fn connection_url(
    server: &ServerAddress,
    credentials: &Credentials,
    schema_name: Option<&str>,
) -> String {
    let user = encode_component(credentials.user());
    let login = match credentials.password() {
        Some(password) => format!("{user}:{}", encode_component(password)),
        None => user,
    };
    format!(
        "mysql://{login}@{}:{}/{}",
        server.host(),
        server.port(),
        schema_name.unwrap_or_default()
    )
}

fn encode_component(value: &str) -> String {
    value
        .bytes()
        .map(|byte| {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
                char::from(byte).to_string()
            } else {
                format!("%{byte:02X}")
            }
        })
        .collect()
}
