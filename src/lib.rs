//! Ensembl healthchecks: validation of genome-annotation databases.
//!
//! Healthchecks run SQL against configured databases, compare the results
//! with hand-coded rules, and report correct, problem, warning and info
//! findings into a shared sink. Checks are grouped into named suites that a
//! runner executes against a registry of database connections.
//!
//! # Architecture
//!
//! Each context follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (`MySQL`, in-memory,
//!   filesystem)
//! - **Services**: Shared machinery built on the ports
//!
//! # Modules
//!
//! - [`database`]: Schema naming, species catalogue and the database registry
//! - [`report`]: Report levels, the report sink and run summaries
//! - [`healthcheck`]: The check contract, comparator, repair planning,
//!   groups and the suite runner
//! - [`checks`]: Concrete checks, groups and the check catalogue
//! - [`config`]: Typed run settings

pub mod checks;
pub mod config;
pub mod database;
pub mod healthcheck;
pub mod report;
