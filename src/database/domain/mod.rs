//! Domain model for configured databases.
//!
//! Schema names are parsed into species, type and version metadata by a
//! total function; descriptors bundle that metadata with the server and
//! credentials needed to reach the database.

mod database_type;
mod descriptor;
mod error;
mod schema_name;
mod species;

pub use database_type::DatabaseType;
pub use descriptor::{ConnectionDescriptor, Credentials, ServerAddress};
pub use error::DatabaseDomainError;
pub use schema_name::SchemaName;
pub use species::{Species, SpeciesCatalog, SpeciesEntry};
