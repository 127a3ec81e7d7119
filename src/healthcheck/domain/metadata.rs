//! Descriptive metadata every check carries.

use super::DatabaseTypeSet;
use crate::database::domain::DatabaseType;
use serde::Serialize;
use std::fmt;

/// Team responsible for a check's failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    /// Core schema and annotation.
    Core,
    /// Gene build.
    Genebuild,
    /// Comparative genomics.
    Compara,
    /// Functional genomics.
    Funcgen,
    /// Variation.
    Variation,
    /// Production.
    Production,
    /// Release coordination.
    ReleaseCoordinator,
}

impl Team {
    /// Returns the team label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Genebuild => "genebuild",
            Self::Compara => "compara",
            Self::Funcgen => "funcgen",
            Self::Variation => "variation",
            Self::Production => "production",
            Self::ReleaseCoordinator => "release_coordinator",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How urgently a failure must be addressed before release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Should be fixed, but may be signed off.
    #[default]
    Amber,
    /// Blocks the release.
    Red,
}

/// Static description of a check: ownership, scope and hints for the
/// runner.
///
/// Group membership is not stored here; groups are defined apart from the
/// checks they hold, so the catalogue answers it with
/// `CheckCatalogue::groups_containing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckMetadata {
    name: &'static str,
    description: &'static str,
    team: Team,
    second_team: Option<Team>,
    priority: Priority,
    applies_to: DatabaseTypeSet,
    long_running: bool,
    effect: Option<&'static str>,
    fix: Option<&'static str>,
}

impl CheckMetadata {
    /// Creates metadata applying to every database type.
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str, team: Team) -> Self {
        Self {
            name,
            description,
            team,
            second_team: None,
            priority: Priority::Amber,
            applies_to: DatabaseTypeSet::all(),
            long_running: false,
            effect: None,
            fix: None,
        }
    }

    /// Adds a second responsible team.
    #[must_use]
    pub const fn with_second_team(mut self, team: Team) -> Self {
        self.second_team = Some(team);
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Restricts the check to the given database types.
    #[must_use]
    pub const fn applying_to(mut self, types: DatabaseTypeSet) -> Self {
        self.applies_to = types;
        self
    }

    /// Marks the check as long-running.
    #[must_use]
    pub const fn long_running(mut self) -> Self {
        self.long_running = true;
        self
    }

    /// Describes what a failure breaks downstream.
    #[must_use]
    pub const fn with_effect(mut self, effect: &'static str) -> Self {
        self.effect = Some(effect);
        self
    }

    /// Describes how to fix a failure.
    #[must_use]
    pub const fn with_fix(mut self, fix: &'static str) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Returns the short check name used in reports.
    ///
    /// This must equal the check's type name without its module path;
    /// `CheckCatalogue::verify` rejects checks where it does not.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the one-line description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Returns the primary responsible team.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.team
    }

    /// Returns the secondary responsible team, if any.
    #[must_use]
    pub const fn second_team(&self) -> Option<Team> {
        self.second_team
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the set of applicable database types.
    #[must_use]
    pub const fn applicable_types(&self) -> DatabaseTypeSet {
        self.applies_to
    }

    /// Returns `true` when the check should run against `kind`.
    #[must_use]
    pub const fn applies_to(&self, kind: DatabaseType) -> bool {
        self.applies_to.contains(kind)
    }

    /// Returns `true` when the check is advertised as long-running.
    ///
    /// This is a scheduling hint only; nothing enforces a time limit.
    #[must_use]
    pub const fn is_long_running(&self) -> bool {
        self.long_running
    }

    /// Returns the downstream effect of a failure, if documented.
    #[must_use]
    pub const fn effect(&self) -> Option<&'static str> {
        self.effect
    }

    /// Returns the documented fix, if any.
    #[must_use]
    pub const fn fix(&self) -> Option<&'static str> {
        self.fix
    }
}
