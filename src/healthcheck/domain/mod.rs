//! Domain model for healthcheck metadata and policies.

mod applicability;
mod error;
mod metadata;
mod policy;
mod repair;

pub use applicability::DatabaseTypeSet;
pub use error::HealthcheckDomainError;
pub use metadata::{CheckMetadata, Priority, Team};
pub(crate) use policy::format_basis_points;
pub use policy::{BreachSeverity, ComparisonDirection, ComparisonPolicy, Threshold};
pub use repair::{RepairOutcome, RepairPlan};
