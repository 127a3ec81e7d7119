//! Configured databases and how checks reach them.
//!
//! This module turns schema names into species/type/version metadata, keeps
//! the registry of configured databases with their shared connections, and
//! resolves companion databases (the matching core database, the previous
//! release on the secondary server). It follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Resolution services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
