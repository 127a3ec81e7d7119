//! Immutable set of database types a check applies to.

use crate::database::domain::DatabaseType;
use serde::{Serialize, Serializer};
use std::fmt;

/// Set of [`DatabaseType`]s, fixed when a check is constructed.
///
/// The set is a plain value: narrowing it yields a new set rather than
/// mutating a shared one.
///
/// # Examples
///
/// ```
/// use ensembl_healthchecks::database::domain::DatabaseType;
/// use ensembl_healthchecks::healthcheck::domain::DatabaseTypeSet;
///
/// let types = DatabaseTypeSet::except(&[DatabaseType::Unknown]);
/// assert!(types.contains(DatabaseType::Core));
/// assert!(!types.contains(DatabaseType::Unknown));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatabaseTypeSet(u16);

impl DatabaseTypeSet {
    /// Every database type, including [`DatabaseType::Unknown`].
    #[must_use]
    pub const fn all() -> Self {
        Self::only(&DatabaseType::ALL)
    }

    /// No database type.
    #[must_use]
    pub const fn none() -> Self {
        Self(0)
    }

    /// Exactly the listed types.
    #[must_use]
    pub const fn only(types: &[DatabaseType]) -> Self {
        let mut set = Self::none();
        let mut remaining = types;
        while let [first, rest @ ..] = remaining {
            set = set.with(*first);
            remaining = rest;
        }
        set
    }

    /// Every type except the listed ones.
    #[must_use]
    pub const fn except(types: &[DatabaseType]) -> Self {
        Self(Self::all().0 & !Self::only(types).0)
    }

    /// Returns a copy that also contains `kind`.
    #[must_use]
    pub const fn with(self, kind: DatabaseType) -> Self {
        Self(self.0 | kind.bit())
    }

    /// Returns a copy without `kind`.
    #[must_use]
    pub const fn without(self, kind: DatabaseType) -> Self {
        Self(self.0 & !kind.bit())
    }

    /// Returns `true` when `kind` is in the set.
    #[must_use]
    pub const fn contains(self, kind: DatabaseType) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Returns `true` when the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = DatabaseType> {
        DatabaseType::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

impl Default for DatabaseTypeSet {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Debug for DatabaseTypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for DatabaseTypeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
