//! Named, nestable sets of check types.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::healthcheck::ports::{Healthcheck, HealthcheckType};

/// Registration entry for one check type: its names and a constructor.
#[derive(Clone, Copy)]
pub struct CheckFactory {
    name: &'static str,
    qualified_name: &'static str,
    create: fn() -> Arc<dyn Healthcheck>,
}

fn instantiate<T: HealthcheckType>() -> Arc<dyn Healthcheck> {
    Arc::new(T::create())
}

impl CheckFactory {
    /// Creates the factory for a check type.
    #[must_use]
    pub fn of<T: HealthcheckType>() -> Self {
        let qualified_name = std::any::type_name::<T>();
        let name = qualified_name
            .rsplit("::")
            .next()
            .unwrap_or(qualified_name);
        Self {
            name,
            qualified_name,
            create: instantiate::<T>,
        }
    }

    /// Returns the type name without its module path.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the fully qualified type name.
    #[must_use]
    pub const fn qualified_name(&self) -> &'static str {
        self.qualified_name
    }

    /// Builds a fresh instance of the check.
    #[must_use]
    pub fn instantiate(&self) -> Arc<dyn Healthcheck> {
        (self.create)()
    }
}

impl PartialEq for CheckFactory {
    fn eq(&self, other: &Self) -> bool {
        self.qualified_name == other.qualified_name
    }
}

impl Eq for CheckFactory {}

impl fmt::Debug for CheckFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Member {
    Check(CheckFactory),
    Group(GroupOfTests),
}

/// A named set of check types, possibly including other groups.
///
/// Removal applies to the flattened set, so a check removed from a group is
/// excluded even when a nested group brings it in. Removing a check that
/// was never added does nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOfTests {
    name: String,
    members: Vec<Member>,
    excluded: BTreeSet<&'static str>,
}

impl GroupOfTests {
    /// Creates an empty group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            excluded: BTreeSet::new(),
        }
    }

    /// Returns the group name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a check type.
    #[must_use]
    pub fn add_test<T: HealthcheckType>(self) -> Self {
        self.add_factory(CheckFactory::of::<T>())
    }

    /// Adds a check by factory.
    #[must_use]
    pub fn add_factory(mut self, factory: CheckFactory) -> Self {
        self.excluded.remove(factory.qualified_name());
        self.members.push(Member::Check(factory));
        self
    }

    /// Adds every check of another group.
    #[must_use]
    pub fn add_group(mut self, group: Self) -> Self {
        self.members.push(Member::Group(group));
        self
    }

    /// Removes a check type.
    #[must_use]
    pub fn remove_test<T: HealthcheckType>(mut self) -> Self {
        let removed = CheckFactory::of::<T>();
        self.members
            .retain(|member| !matches!(member, Member::Check(factory) if *factory == removed));
        self.excluded.insert(removed.qualified_name());
        self
    }

    /// Returns the flattened, de-duplicated checks in first-added order.
    #[must_use]
    pub fn set_of_tests(&self) -> Vec<CheckFactory> {
        let mut seen = BTreeSet::new();
        let mut flattened = Vec::new();
        self.collect_into(&mut seen, &mut flattened);
        flattened
    }

    /// Returns `true` when the flattened set contains the check type.
    #[must_use]
    pub fn contains<T: HealthcheckType>(&self) -> bool {
        let wanted = CheckFactory::of::<T>();
        self.set_of_tests().contains(&wanted)
    }

    fn collect_into(&self, seen: &mut BTreeSet<&'static str>, flattened: &mut Vec<CheckFactory>) {
        for member in &self.members {
            match member {
                Member::Check(factory) => {
                    let name = factory.qualified_name();
                    if !self.excluded.contains(name) && seen.insert(name) {
                        flattened.push(*factory);
                    }
                }
                Member::Group(group) => {
                    let mut nested = Vec::new();
                    group.collect_into(&mut BTreeSet::new(), &mut nested);
                    for factory in nested {
                        let name = factory.qualified_name();
                        if !self.excluded.contains(name) && seen.insert(name) {
                            flattened.push(factory);
                        }
                    }
                }
            }
        }
    }
}
