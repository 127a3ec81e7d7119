//! Tolerance policy for release-over-release count comparisons.

use super::HealthcheckDomainError;
use serde::Serialize;
use std::fmt;

const FULL_SCALE: u32 = 10_000;

/// Minimum acceptable ratio of current to previous count, in basis points.
///
/// A threshold of `9500` (95%) tolerates a 5% deviation. Ratios are compared
/// with integer arithmetic, so a value exactly on the boundary passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Threshold(u16);

impl Threshold {
    /// Creates a threshold from basis points.
    ///
    /// # Errors
    ///
    /// Returns [`HealthcheckDomainError::InvalidThreshold`] unless
    /// `0 < basis_points <= 10000`.
    pub fn from_basis_points(basis_points: u32) -> Result<Self, HealthcheckDomainError> {
        if basis_points == 0 || basis_points > FULL_SCALE {
            return Err(HealthcheckDomainError::InvalidThreshold(basis_points));
        }
        u16::try_from(basis_points)
            .map(Self)
            .map_err(|_| HealthcheckDomainError::InvalidThreshold(basis_points))
    }

    /// Creates a threshold from a whole percentage, e.g. `97` for 0.97.
    ///
    /// # Errors
    ///
    /// Returns [`HealthcheckDomainError::InvalidThreshold`] unless
    /// `0 < percent <= 100`.
    pub fn from_percent(percent: u32) -> Result<Self, HealthcheckDomainError> {
        Self::from_basis_points(percent.saturating_mul(100))
    }

    /// Creates a threshold, clamping `basis_points` into `1..=10000`.
    #[must_use]
    pub const fn clamped(basis_points: u16) -> Self {
        if basis_points == 0 {
            Self(1)
        } else if basis_points > 10_000 {
            Self(10_000)
        } else {
            Self(basis_points)
        }
    }

    /// Returns the threshold in basis points.
    #[must_use]
    pub const fn basis_points(self) -> u16 {
        self.0
    }

    /// Returns the tolerated deviation in basis points.
    #[must_use]
    pub const fn tolerance(self) -> u16 {
        // Construction guarantees `self.0 <= FULL_SCALE`.
        10_000_u16.saturating_sub(self.0)
    }

    /// Returns `true` when `current` fell below the threshold share of
    /// `previous`.
    #[must_use]
    pub fn is_shrinkage_breach(self, current: u64, previous: u64) -> bool {
        scaled(current, FULL_SCALE) < scaled(previous, u32::from(self.0))
    }

    /// Returns `true` when `current` grew beyond the tolerated share of
    /// `previous`.
    #[must_use]
    pub fn is_growth_breach(self, current: u64, previous: u64) -> bool {
        let ceiling = FULL_SCALE.saturating_add(u32::from(self.tolerance()));
        scaled(current, FULL_SCALE) > scaled(previous, ceiling)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_basis_points(u64::from(self.0)))
    }
}

fn scaled(count: u64, factor: u32) -> u128 {
    u128::from(count).saturating_mul(u128::from(factor))
}

/// Formats basis points as a percentage with two decimals, e.g. `95.24%`.
pub(crate) fn format_basis_points(basis_points: u64) -> String {
    let whole = basis_points.checked_div(100).unwrap_or_default();
    let fraction = basis_points.checked_rem(100).unwrap_or_default();
    format!("{whole}.{fraction:02}%")
}

/// Which deviations count as a breach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonDirection {
    /// Only a drop below the threshold is a breach; growth is expected.
    #[default]
    ShrinkageOnly,
    /// Growth or shrinkage beyond the tolerance is a breach.
    Both,
}

/// What a breach produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BreachSeverity {
    /// A PROBLEM record; the check fails.
    #[default]
    Problem,
    /// A WARNING record; the check still passes.
    Warning,
}

/// Parameters of one previous-version comparison.
///
/// All four direction and severity combinations are valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonPolicy {
    entity_description: &'static str,
    threshold: Threshold,
    direction: ComparisonDirection,
    severity: BreachSeverity,
}

impl ComparisonPolicy {
    /// Creates a policy that flags shrinkage as a problem.
    #[must_use]
    pub const fn new(entity_description: &'static str, threshold: Threshold) -> Self {
        Self {
            entity_description,
            threshold,
            direction: ComparisonDirection::ShrinkageOnly,
            severity: BreachSeverity::Problem,
        }
    }

    /// Sets the breach direction.
    #[must_use]
    pub const fn with_direction(mut self, direction: ComparisonDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Sets the breach severity.
    #[must_use]
    pub const fn with_severity(mut self, severity: BreachSeverity) -> Self {
        self.severity = severity;
        self
    }

    /// Returns the human description of the compared entities, e.g.
    /// `genes of biotype`.
    #[must_use]
    pub const fn entity_description(&self) -> &'static str {
        self.entity_description
    }

    /// Returns the threshold.
    #[must_use]
    pub const fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Returns the breach direction.
    #[must_use]
    pub const fn direction(&self) -> ComparisonDirection {
        self.direction
    }

    /// Returns the breach severity.
    #[must_use]
    pub const fn severity(&self) -> BreachSeverity {
        self.severity
    }
}
