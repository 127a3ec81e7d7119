//! Healthcheck contract and the shared machinery checks are built from.
//!
//! A check is a [`ports::Healthcheck`] carrying [`domain::CheckMetadata`].
//! The runner hands it a [`services::CheckContext`] bound to one database;
//! the check reads through the context's SQL connection, resolves companion
//! databases through the registry, and writes its findings to the report
//! sink. Release-over-release comparisons and duplicate-row repairs are
//! provided as reusable services rather than base types.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
