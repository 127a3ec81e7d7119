//! Application services for database resolution.

mod registry;

pub use registry::{
    CompanionLookup, DatabaseRegistry, RegistryError, RegistryResult, ServerRole,
};
