//! Error types for healthcheck domain validation.

use thiserror::Error;

/// Errors returned while building healthcheck policies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthcheckDomainError {
    /// Thresholds must lie in `(0, 10000]` basis points.
    #[error("threshold must be between 1 and 10000 basis points, got {0}")]
    InvalidThreshold(u32),
}
