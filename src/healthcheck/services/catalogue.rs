//! Explicit table of every known check type and group.

use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;

use super::{CheckFactory, GroupOfTests};
use crate::healthcheck::ports::HealthcheckType;

/// Errors returned by catalogue lookups.
#[derive(Debug, Clone, Error)]
pub enum CatalogueError {
    /// No check is registered under the name.
    #[error("unknown check: {0}")]
    UnknownCheck(String),

    /// No group is registered under the name.
    #[error("unknown group: {0}")]
    UnknownGroup(String),

    /// A check reports under a name other than its type name.
    #[error("check {qualified} reports as '{reported}'; expected '{expected}'")]
    NameMismatch {
        /// Fully qualified type name.
        qualified: &'static str,
        /// Name found in the check's metadata.
        reported: &'static str,
        /// Short type name.
        expected: &'static str,
    },

    /// Two registered check types share a report name.
    #[error("report name '{0}' is used by more than one check")]
    DuplicateReportName(&'static str),

    /// The listing could not be serialized.
    #[error("failed to serialize catalogue: {0}")]
    Serialization(Arc<serde_json::Error>),
}

/// Registry of check factories and group definitions, populated by explicit
/// registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckCatalogue {
    checks: Vec<CheckFactory>,
    groups: Vec<GroupOfTests>,
}

impl CheckCatalogue {
    /// Creates an empty catalogue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check type. Registering a type twice keeps one entry.
    #[must_use]
    pub fn register<T: HealthcheckType>(mut self) -> Self {
        let factory = CheckFactory::of::<T>();
        if !self.checks.contains(&factory) {
            self.checks.push(factory);
        }
        self
    }

    /// Registers a group, replacing any group with the same name.
    #[must_use]
    pub fn with_group(mut self, group: GroupOfTests) -> Self {
        self.groups.retain(|existing| existing.name() != group.name());
        self.groups.push(group);
        self
    }

    /// Returns every registered check in registration order.
    #[must_use]
    pub fn checks(&self) -> &[CheckFactory] {
        &self.checks
    }

    /// Returns every registered group in registration order.
    #[must_use]
    pub fn groups(&self) -> &[GroupOfTests] {
        &self.groups
    }

    /// Finds a check by short or fully qualified name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::UnknownCheck`] when nothing matches.
    pub fn find_check(&self, name: &str) -> Result<CheckFactory, CatalogueError> {
        self.checks
            .iter()
            .find(|factory| factory.name() == name || factory.qualified_name() == name)
            .copied()
            .ok_or_else(|| CatalogueError::UnknownCheck(name.to_owned()))
    }

    /// Finds a group by name.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::UnknownGroup`] when nothing matches.
    pub fn find_group(&self, name: &str) -> Result<&GroupOfTests, CatalogueError> {
        self.groups
            .iter()
            .find(|group| group.name() == name)
            .ok_or_else(|| CatalogueError::UnknownGroup(name.to_owned()))
    }

    /// Returns the names of the groups containing a check, in registration
    /// order.
    ///
    /// Membership follows the flattened set, so a check reached through a
    /// nested group belongs to the outer group too, and a check the group
    /// removed does not.
    #[must_use]
    pub fn groups_containing(&self, factory: &CheckFactory) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|group| group.set_of_tests().contains(factory))
            .map(GroupOfTests::name)
            .collect()
    }

    /// Confirms every registered check reports under its short type name
    /// and that no two checks share that name.
    ///
    /// Records are keyed by the metadata name while groups and the
    /// catalogue key by type, so the two must agree.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::NameMismatch`] or
    /// [`CatalogueError::DuplicateReportName`] for the first offending check.
    pub fn verify(&self) -> Result<(), CatalogueError> {
        let mut seen = BTreeSet::new();
        for factory in &self.checks {
            let reported = factory.instantiate().metadata().name();
            if reported != factory.name() {
                return Err(CatalogueError::NameMismatch {
                    qualified: factory.qualified_name(),
                    reported,
                    expected: factory.name(),
                });
            }
            if !seen.insert(reported) {
                return Err(CatalogueError::DuplicateReportName(reported));
            }
        }
        Ok(())
    }

    /// Returns the fully qualified check names as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Serialization`] if encoding fails.
    pub fn check_names_json(&self) -> Result<String, CatalogueError> {
        let names: Vec<&str> = self.checks.iter().map(CheckFactory::qualified_name).collect();
        to_json(&names)
    }

    /// Returns the group names as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Serialization`] if encoding fails.
    pub fn group_names_json(&self) -> Result<String, CatalogueError> {
        let names: Vec<&str> = self.groups.iter().map(GroupOfTests::name).collect();
        to_json(&names)
    }
}

fn to_json(names: &[&str]) -> Result<String, CatalogueError> {
    serde_json::to_string(names).map_err(|err| CatalogueError::Serialization(Arc::new(err)))
}
