//! Connector port: opens connections and lists schemas on a server.

use crate::database::{
    domain::{ConnectionDescriptor, Credentials, ServerAddress},
    ports::sql::{SqlExecutor, SqlResult},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Creates live connections for descriptors.
#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    /// Opens a connection for the descriptor.
    ///
    /// Implementations may defer the network handshake to the first query.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError::Connection`](super::SqlError::Connection) when no
    /// connection can be prepared.
    fn open(&self, descriptor: &ConnectionDescriptor) -> SqlResult<Arc<dyn SqlExecutor>>;

    /// Lists the schema names present on a server, in server order.
    ///
    /// # Errors
    ///
    /// Returns [`SqlError`](super::SqlError) when the server cannot be
    /// queried.
    async fn list_schemas(
        &self,
        server: &ServerAddress,
        credentials: &Credentials,
    ) -> SqlResult<Vec<String>>;
}
