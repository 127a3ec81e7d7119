//! Adapter implementations for database access.

pub mod memory;
#[cfg(feature = "mysql")]
pub mod mysql;

pub use memory::{InMemoryConnector, InMemorySqlExecutor};
#[cfg(feature = "mysql")]
pub use mysql::{MysqlConnector, MysqlSqlExecutor};
