//! Named groups and the catalogue of every check in this crate.

use super::{
    ComparePreviousVersionArrays, ComparePreviousVersionBiotypes, DataFilesExist,
    DuplicateMetaEntries, FuncgenCoreSeqRegions,
};
use crate::healthcheck::services::{CheckCatalogue, GroupOfTests};

/// Release comparisons.
#[must_use]
pub fn compare_previous() -> GroupOfTests {
    GroupOfTests::new("compare_previous")
        .add_test::<ComparePreviousVersionBiotypes>()
        .add_test::<ComparePreviousVersionArrays>()
}

/// Checks run after a new gene build.
#[must_use]
pub fn post_genebuild() -> GroupOfTests {
    GroupOfTests::new("post_genebuild")
        .add_test::<ComparePreviousVersionBiotypes>()
        .add_test::<DuplicateMetaEntries>()
}

/// Functional genomics checks.
#[must_use]
pub fn funcgen() -> GroupOfTests {
    GroupOfTests::new("funcgen")
        .add_test::<ComparePreviousVersionArrays>()
        .add_test::<FuncgenCoreSeqRegions>()
        .add_test::<DataFilesExist>()
}

/// Everything run before a release.
#[must_use]
pub fn release() -> GroupOfTests {
    GroupOfTests::new("release")
        .add_group(post_genebuild())
        .add_group(funcgen())
        .add_group(compare_previous())
}

/// Returns the catalogue of every check type and group.
#[must_use]
pub fn catalogue() -> CheckCatalogue {
    CheckCatalogue::new()
        .register::<ComparePreviousVersionBiotypes>()
        .register::<ComparePreviousVersionArrays>()
        .register::<DuplicateMetaEntries>()
        .register::<FuncgenCoreSeqRegions>()
        .register::<DataFilesExist>()
        .with_group(release())
        .with_group(post_genebuild())
        .with_group(funcgen())
        .with_group(compare_previous())
}
